//! Structured parse output, queried by identifier.
//!
//! A [`ParseResult`] borrows the configuration it was parsed against, so the
//! configuration cannot change while results are alive.

use std::path::Path;

use clif_core::{
    CommandLineConfiguration, CommandMetadata, OptionConfiguration, OptionMetadata,
    ParameterConfiguration, ParameterMetadata, Value,
};
use serde::Serialize;

/// A parameter value paired with its metadata.
#[derive(Debug, Clone)]
pub struct ParameterInput<'c> {
    metadata: &'c ParameterMetadata,
    value: Option<Value>,
}

impl<'c> ParameterInput<'c> {
    pub fn new(metadata: &'c ParameterMetadata, value: Option<Value>) -> Self {
        Self { metadata, value }
    }

    pub fn metadata(&self) -> &'c ParameterMetadata {
        self.metadata
    }

    pub fn identifier(&self) -> &'c str {
        &self.metadata.identifier
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// `true` unless the value is absent or an empty list.
    pub fn has_value(&self) -> bool {
        self.value.as_ref().is_some_and(Value::is_present)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value()?.as_str()
    }

    pub fn as_integer(&self) -> Option<i64> {
        self.value()?.as_integer()
    }

    pub fn as_path(&self) -> Option<&Path> {
        self.value()?.as_path()
    }

    pub fn as_file(&self) -> Option<&Path> {
        self.value()?.as_file()
    }

    pub fn as_directory(&self) -> Option<&Path> {
        self.value()?.as_directory()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value()?.as_bool()
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        self.value()?.as_list()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value()?.downcast_ref()
    }

    /// Appends to a list value.
    pub(crate) fn push(&mut self, value: Value) {
        match self.value.as_mut() {
            Some(Value::List(items)) => items.push(value),
            Some(_) => {}
            None => self.value = Some(Value::List(vec![value])),
        }
    }
}

/// An option occurrence paired with its metadata and, if it accepts one,
/// its parameter input.
#[derive(Debug, Clone)]
pub struct OptionInput<'c> {
    metadata: &'c OptionMetadata,
    parameter: Option<ParameterInput<'c>>,
    occurrences: usize,
}

impl<'c> OptionInput<'c> {
    pub fn new(metadata: &'c OptionMetadata, parameter: Option<ParameterInput<'c>>) -> Self {
        Self {
            metadata,
            parameter,
            occurrences: 1,
        }
    }

    pub fn metadata(&self) -> &'c OptionMetadata {
        self.metadata
    }

    /// Short identifier of the option.
    pub fn identifier(&self) -> &'c str {
        &self.metadata.identifier
    }

    pub fn parameter(&self) -> Option<&ParameterInput<'c>> {
        self.parameter.as_ref()
    }

    /// Number of times the option appeared.
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }

    /// Value of the attached parameter. Multi-valued options hold a
    /// [`Value::List`].
    pub fn value(&self) -> Option<&Value> {
        self.parameter.as_ref()?.value()
    }

    pub fn has_value(&self) -> bool {
        self.parameter.as_ref().is_some_and(ParameterInput::has_value)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value()?.as_str()
    }

    pub fn as_integer(&self) -> Option<i64> {
        self.value()?.as_integer()
    }

    pub fn as_path(&self) -> Option<&Path> {
        self.value()?.as_path()
    }

    pub fn as_file(&self) -> Option<&Path> {
        self.value()?.as_file()
    }

    pub fn as_directory(&self) -> Option<&Path> {
        self.value()?.as_directory()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value()?.as_bool()
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        self.value()?.as_list()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value()?.downcast_ref()
    }

    /// Records a repeat occurrence of a multi-valued option.
    pub(crate) fn append(&mut self, value: Option<Value>) {
        self.occurrences += 1;
        if let (Some(parameter), Some(value)) = (self.parameter.as_mut(), value) {
            parameter.push(value);
        }
    }

    /// Records a repeat occurrence whose value is discarded.
    pub(crate) fn repeat(&mut self) {
        self.occurrences += 1;
    }
}

/// Options given on the command line, in input order.
///
/// Lookups accept either the short or the long identifier.
#[derive(Debug, Clone)]
pub struct OptionInputSet<'c> {
    configuration: &'c OptionConfiguration,
    inputs: Vec<OptionInput<'c>>,
}

impl<'c> OptionInputSet<'c> {
    pub fn new(configuration: &'c OptionConfiguration) -> Self {
        Self {
            configuration,
            inputs: Vec::new(),
        }
    }

    /// The option configuration lookups resolve against.
    pub fn configuration(&self) -> &'c OptionConfiguration {
        self.configuration
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.get(identifier).is_some()
    }

    /// Returns the input for an option given by short or long identifier.
    pub fn get(&self, identifier: &str) -> Option<&OptionInput<'c>> {
        let short = &self.configuration.get(identifier)?.identifier;
        self.inputs.iter().find(|input| input.identifier() == short)
    }

    pub(crate) fn get_mut(&mut self, identifier: &str) -> Option<&mut OptionInput<'c>> {
        let short = &self.configuration.get(identifier)?.identifier;
        self.inputs.iter_mut().find(|input| input.identifier() == short)
    }

    pub(crate) fn insert(&mut self, input: OptionInput<'c>) {
        self.inputs.push(input);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionInput<'c>> {
        self.inputs.iter()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
    }
}

impl<'a, 'c> IntoIterator for &'a OptionInputSet<'c> {
    type Item = &'a OptionInput<'c>;
    type IntoIter = std::slice::Iter<'a, OptionInput<'c>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Positional parameters matched, in declaration order.
#[derive(Debug, Clone)]
pub struct ParameterInputSet<'c> {
    configuration: &'c ParameterConfiguration,
    inputs: Vec<ParameterInput<'c>>,
}

impl<'c> ParameterInputSet<'c> {
    pub fn new(configuration: &'c ParameterConfiguration) -> Self {
        Self {
            configuration,
            inputs: Vec::new(),
        }
    }

    pub fn configuration(&self) -> &'c ParameterConfiguration {
        self.configuration
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.get(identifier).is_some()
    }

    pub fn get(&self, identifier: &str) -> Option<&ParameterInput<'c>> {
        self.inputs
            .iter()
            .find(|input| input.identifier() == identifier)
    }

    pub(crate) fn insert(&mut self, input: ParameterInput<'c>) {
        self.inputs.push(input);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParameterInput<'c>> {
        self.inputs.iter()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
    }
}

impl<'a, 'c> IntoIterator for &'a ParameterInputSet<'c> {
    type Item = &'a ParameterInput<'c>;
    type IntoIter = std::slice::Iter<'a, ParameterInput<'c>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Outcome of a successful parse.
///
/// # Examples
///
/// ```
/// use clif_core::{CommandLineConfiguration, CommandLineProperties, OptionMetadata, ParameterType};
/// use clif_parser::parse;
///
/// let mut config = CommandLineConfiguration::new("app")
///     .with_properties(CommandLineProperties::unix());
/// config.add_option(OptionMetadata::with_value("i", ParameterType::String).with_long("input"))?;
///
/// let result = parse(&config, ["--input", "file.txt"])?;
/// assert!(!result.is_command_match());
/// assert_eq!(result.option_input().get("i").and_then(|i| i.as_str()), Some("file.txt"));
/// assert_eq!(result.option_value("input").and_then(|v| v.as_str()), Some("file.txt"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ParseResult<'c> {
    configuration: &'c CommandLineConfiguration,
    matching_command: Option<&'c CommandMetadata>,
    options: OptionInputSet<'c>,
    parameters: ParameterInputSet<'c>,
}

impl<'c> ParseResult<'c> {
    /// Creates an empty result scoped to the root configuration.
    pub fn new(configuration: &'c CommandLineConfiguration) -> Self {
        Self {
            configuration,
            matching_command: None,
            options: OptionInputSet::new(configuration.options()),
            parameters: ParameterInputSet::new(configuration.parameters()),
        }
    }

    pub fn configuration(&self) -> &'c CommandLineConfiguration {
        self.configuration
    }

    /// Scopes the result to `command`, discarding any inputs.
    pub(crate) fn set_matching_command(&mut self, command: &'c CommandMetadata) {
        self.matching_command = Some(command);
        self.options = OptionInputSet::new(command.options());
        self.parameters = ParameterInputSet::new(command.parameters());
    }

    pub fn is_command_match(&self) -> bool {
        self.matching_command.is_some()
    }

    pub fn matching_command(&self) -> Option<&'c CommandMetadata> {
        self.matching_command
    }

    pub fn option_input(&self) -> &OptionInputSet<'c> {
        &self.options
    }

    pub(crate) fn option_input_mut(&mut self) -> &mut OptionInputSet<'c> {
        &mut self.options
    }

    pub fn parameter_input(&self) -> &ParameterInputSet<'c> {
        &self.parameters
    }

    pub(crate) fn parameter_input_mut(&mut self) -> &mut ParameterInputSet<'c> {
        &mut self.parameters
    }

    /// Value of an option given by short or long identifier.
    pub fn option_value(&self, identifier: &str) -> Option<&Value> {
        self.options.get(identifier)?.value()
    }

    pub fn parameter_value(&self, identifier: &str) -> Option<&Value> {
        self.parameters.get(identifier)?.value()
    }

    /// Drops all inputs and the matched command.
    pub fn clear(&mut self) {
        *self = Self::new(self.configuration);
    }

    /// Serializable snapshot of the result.
    pub fn to_summary(&self) -> ParseSummary {
        ParseSummary {
            command: self.matching_command.map(|c| c.keyword.clone()),
            options: self
                .options
                .iter()
                .map(|input| InputSummary {
                    identifier: input.identifier().to_string(),
                    value: input.value().cloned(),
                })
                .collect(),
            parameters: self
                .parameters
                .iter()
                .map(|input| InputSummary {
                    identifier: input.identifier().to_string(),
                    value: input.value().cloned(),
                })
                .collect(),
        }
    }
}

/// Owned, serializable view of a [`ParseResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseSummary {
    /// Keyword of the matched command.
    pub command: Option<String>,
    pub options: Vec<InputSummary>,
    pub parameters: Vec<InputSummary>,
}

/// One option or parameter in a [`ParseSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSummary {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

//! Metadata type definitions for options, parameters and commands.
//!
//! These descriptors are built once during setup, stored in the
//! configurations of [`configuration`](crate::configuration), and borrowed
//! immutably by every parse result.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::configuration::{OptionConfiguration, ParameterConfiguration};
use crate::error::{ConfigError, Result};
use crate::registry::Identified;
use crate::value::{BoxError, Value};

/// Type of a parameter value.
///
/// Determines how a raw token is coerced into a [`Value`].
///
/// # Examples
///
/// ```
/// use clif_core::ParameterType;
///
/// assert_eq!(ParameterType::default(), ParameterType::String);
/// assert_eq!(ParameterType::Directory.name(), "DIRECTORY");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Raw text (the default).
    #[default]
    String,
    /// Base-10 signed 64-bit integer.
    Integer,
    /// File path, existence is not checked.
    File,
    /// Path to an existing directory.
    Directory,
    /// `true` (case-insensitive) or anything else for `false`.
    Boolean,
    /// Delegates to an attached [`ValueParser`].
    Custom,
    /// Accepts no value.
    None,
}

impl ParameterType {
    /// Uppercase name, used as the value placeholder in usage text.
    pub fn name(&self) -> &'static str {
        match self {
            ParameterType::String => "STRING",
            ParameterType::Integer => "INTEGER",
            ParameterType::File => "FILE",
            ParameterType::Directory => "DIRECTORY",
            ParameterType::Boolean => "BOOLEAN",
            ParameterType::Custom => "CUSTOM",
            ParameterType::None => "NONE",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of an option's two identifiers a token refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Short,
    Long,
}

/// Converts a raw token into a [`Value`] for a CUSTOM parameter.
///
/// Implemented for plain functions and closures with the matching
/// signature, so both a struct and a `fn` item can serve as a parser.
pub trait ValueParser: Send + Sync {
    /// Parses `raw` for the parameter described by `metadata`.
    fn parse_value(
        &self,
        metadata: &ParameterMetadata,
        raw: &str,
    ) -> std::result::Result<Value, BoxError>;
}

impl<F> ValueParser for F
where
    F: Fn(&ParameterMetadata, &str) -> std::result::Result<Value, BoxError> + Send + Sync,
{
    fn parse_value(
        &self,
        metadata: &ParameterMetadata,
        raw: &str,
    ) -> std::result::Result<Value, BoxError> {
        self(metadata, raw)
    }
}

/// Shared handle to a [`ValueParser`].
#[derive(Clone)]
pub struct CustomParser(Arc<dyn ValueParser>);

impl CustomParser {
    pub fn new(parser: impl ValueParser + 'static) -> Self {
        Self(Arc::new(parser))
    }

    /// Runs the wrapped parser.
    pub fn parse(
        &self,
        metadata: &ParameterMetadata,
        raw: &str,
    ) -> std::result::Result<Value, BoxError> {
        self.0.parse_value(metadata, raw)
    }
}

impl fmt::Debug for CustomParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomParser(..)")
    }
}

/// Metadata for a positional parameter or an option's attached value.
///
/// # Examples
///
/// ```
/// use clif_core::{ParameterMetadata, ParameterType};
///
/// let files = ParameterMetadata::required("files", ParameterType::File)
///     .allow_multiple()
///     .with_description("input files");
/// assert!(files.required);
/// assert!(files.multi_valued);
/// assert_eq!(files.long_description(), "input files");
/// ```
#[derive(Debug, Clone)]
pub struct ParameterMetadata {
    pub identifier: String,
    pub parameter_type: ParameterType,
    pub required: bool,
    /// A multi-valued positional parameter consumes all remaining tokens.
    pub multi_valued: bool,
    pub description: String,
    pub long_description: Option<String>,
    /// Parser used when `parameter_type` is [`ParameterType::Custom`].
    pub parser: Option<CustomParser>,
}

impl ParameterMetadata {
    pub fn new(identifier: &str, parameter_type: ParameterType, required: bool) -> Self {
        Self {
            identifier: identifier.to_string(),
            parameter_type,
            required,
            multi_valued: false,
            description: String::new(),
            long_description: None,
            parser: None,
        }
    }

    /// Creates a required parameter.
    pub fn required(identifier: &str, parameter_type: ParameterType) -> Self {
        Self::new(identifier, parameter_type, true)
    }

    /// Creates an optional parameter.
    pub fn optional(identifier: &str, parameter_type: ParameterType) -> Self {
        Self::new(identifier, parameter_type, false)
    }

    /// Creates an optional CUSTOM parameter backed by `parser`.
    pub fn custom(identifier: &str, parser: impl ValueParser + 'static) -> Self {
        Self::new(identifier, ParameterType::Custom, false).with_parser(parser)
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Marks as multi-valued.
    pub fn allow_multiple(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_long_description(mut self, description: &str) -> Self {
        self.long_description = Some(description.to_string());
        self
    }

    /// Attaches a custom value parser.
    pub fn with_parser(mut self, parser: impl ValueParser + 'static) -> Self {
        self.parser = Some(CustomParser::new(parser));
        self
    }

    /// Long description, falling back to the short one.
    pub fn long_description(&self) -> &str {
        self.long_description.as_deref().unwrap_or(&self.description)
    }

    /// A CUSTOM parameter must carry a parser.
    pub(crate) fn check(&self) -> Result<()> {
        if self.parameter_type == ParameterType::Custom && self.parser.is_none() {
            return Err(ConfigError::MissingCustomParser(self.identifier.clone()));
        }
        Ok(())
    }
}

impl Identified for ParameterMetadata {
    fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Metadata for a prefixed option.
///
/// Use [`flag`](OptionMetadata::flag) for options without a value and
/// [`with_value`](OptionMetadata::with_value) or
/// [`with_parameter`](OptionMetadata::with_parameter) for options carrying
/// one, then chain builder methods.
///
/// # Examples
///
/// ```
/// use clif_core::{OptionMetadata, ParameterType};
///
/// let verbose = OptionMetadata::flag("v").with_long("verbose");
/// assert!(!verbose.is_parameter_accepted());
///
/// let input = OptionMetadata::with_value("i", ParameterType::File)
///     .with_long("input")
///     .with_required(true)
///     .with_description("input file");
/// assert!(input.is_parameter_accepted());
/// assert_eq!(input.long_identifier.as_deref(), Some("input"));
/// ```
#[derive(Debug, Clone)]
pub struct OptionMetadata {
    pub identifier: String,
    pub long_identifier: Option<String>,
    pub required: bool,
    /// A multi-valued option may be given more than once.
    pub multi_valued: bool,
    pub description: String,
    pub long_description: Option<String>,
    pub parameter: Option<ParameterMetadata>,
}

impl OptionMetadata {
    /// Creates an optional option that takes no value.
    pub fn flag(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            long_identifier: None,
            required: false,
            multi_valued: false,
            description: String::new(),
            long_description: None,
            parameter: None,
        }
    }

    /// Creates an optional option carrying an optional value of
    /// `parameter_type`. The parameter is named after the option.
    pub fn with_value(identifier: &str, parameter_type: ParameterType) -> Self {
        Self::with_parameter(
            identifier,
            ParameterMetadata::optional(identifier, parameter_type),
        )
    }

    /// Creates an optional option carrying `parameter`.
    pub fn with_parameter(identifier: &str, parameter: ParameterMetadata) -> Self {
        Self {
            parameter: Some(parameter),
            ..Self::flag(identifier)
        }
    }

    pub fn with_long(mut self, long_identifier: &str) -> Self {
        self.long_identifier = Some(long_identifier.to_string());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Marks as allowed to repeat; values accumulate in input order.
    pub fn allow_multiple(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_long_description(mut self, description: &str) -> Self {
        self.long_description = Some(description.to_string());
        self
    }

    /// `true` iff a parameter is attached and its type is not NONE.
    pub fn is_parameter_accepted(&self) -> bool {
        self.parameter
            .as_ref()
            .is_some_and(|p| p.parameter_type != ParameterType::None)
    }

    /// Returns the identifier of the given kind, if the option has one.
    pub fn identifier_for(&self, kind: IdentifierKind) -> Option<&str> {
        match kind {
            IdentifierKind::Short => Some(&self.identifier),
            IdentifierKind::Long => self.long_identifier.as_deref(),
        }
    }

    /// Long description, falling back to the short one.
    pub fn long_description(&self) -> &str {
        self.long_description.as_deref().unwrap_or(&self.description)
    }
}

impl Identified for OptionMetadata {
    fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// A subcommand: a keyword selecting its own options and parameters.
///
/// A command is never required and never multi-valued.
///
/// # Examples
///
/// ```
/// use clif_core::{CommandMetadata, OptionMetadata, ParameterType};
///
/// let mut list = CommandMetadata::new("list").with_description("list entries");
/// list.options_mut()
///     .add(OptionMetadata::with_value("i", ParameterType::String))
///     .unwrap();
/// assert_eq!(list.keyword, "list");
/// assert!(list.options().contains("i"));
/// ```
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub keyword: String,
    pub description: String,
    pub long_description: Option<String>,
    options: OptionConfiguration,
    parameters: ParameterConfiguration,
}

impl CommandMetadata {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            description: String::new(),
            long_description: None,
            options: OptionConfiguration::new(),
            parameters: ParameterConfiguration::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_long_description(mut self, description: &str) -> Self {
        self.long_description = Some(description.to_string());
        self
    }

    /// Replaces the command's option configuration.
    pub fn with_options(mut self, options: OptionConfiguration) -> Self {
        self.options = options;
        self
    }

    /// Replaces the command's parameter configuration.
    pub fn with_parameters(mut self, parameters: ParameterConfiguration) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn options(&self) -> &OptionConfiguration {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OptionConfiguration {
        &mut self.options
    }

    pub fn parameters(&self) -> &ParameterConfiguration {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterConfiguration {
        &mut self.parameters
    }

    pub fn is_required(&self) -> bool {
        false
    }

    pub fn is_multi_valued(&self) -> bool {
        false
    }

    /// Long description, falling back to the short one.
    pub fn long_description(&self) -> &str {
        self.long_description.as_deref().unwrap_or(&self.description)
    }
}

impl Identified for CommandMetadata {
    fn identifier(&self) -> &str {
        &self.keyword
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_pair(
        _metadata: &ParameterMetadata,
        raw: &str,
    ) -> std::result::Result<Value, BoxError> {
        let (a, b) = raw.split_once(',').ok_or("expected a,b")?;
        Ok(Value::List(vec![
            Value::Integer(a.parse()?),
            Value::Integer(b.parse()?),
        ]))
    }

    #[test]
    fn test_parameter_accepted_only_with_typed_parameter() {
        assert!(!OptionMetadata::flag("v").is_parameter_accepted());
        assert!(!OptionMetadata::with_value("v", ParameterType::None).is_parameter_accepted());
        assert!(OptionMetadata::with_value("v", ParameterType::Boolean).is_parameter_accepted());
    }

    #[test]
    fn test_with_value_names_parameter_after_option() {
        let opt = OptionMetadata::with_value("count", ParameterType::Integer);
        let param = opt.parameter.as_ref().unwrap();
        assert_eq!(param.identifier, "count");
        assert!(!param.required);
        assert!(!opt.required);
    }

    #[test]
    fn test_identifier_for_kind() {
        let opt = OptionMetadata::flag("i").with_long("input");
        assert_eq!(opt.identifier_for(IdentifierKind::Short), Some("i"));
        assert_eq!(opt.identifier_for(IdentifierKind::Long), Some("input"));
        assert_eq!(
            OptionMetadata::flag("x").identifier_for(IdentifierKind::Long),
            None
        );
    }

    #[test]
    fn test_long_description_falls_back() {
        let opt = OptionMetadata::flag("v").with_description("verbose");
        assert_eq!(opt.long_description(), "verbose");
        let opt = opt.with_long_description("print every step");
        assert_eq!(opt.long_description(), "print every step");
    }

    #[test]
    fn test_custom_parameter_needs_parser() {
        let bare = ParameterMetadata::optional("pair", ParameterType::Custom);
        assert_eq!(
            bare.check().unwrap_err(),
            ConfigError::MissingCustomParser("pair".to_string())
        );

        let parsed = ParameterMetadata::custom("pair", split_pair);
        assert!(parsed.check().is_ok());
        let value = parsed.parser.as_ref().unwrap().parse(&parsed, "3,4").unwrap();
        assert_eq!(value, Value::List(vec![Value::Integer(3), Value::Integer(4)]));
        assert!(parsed.parser.as_ref().unwrap().parse(&parsed, "3").is_err());
    }

    #[test]
    fn test_commands_are_never_required() {
        let cmd = CommandMetadata::new("list");
        assert!(!cmd.is_required());
        assert!(!cmd.is_multi_valued());
        assert!(cmd.options().is_empty());
        assert!(cmd.parameters().is_empty());
    }

    #[test]
    fn test_parameter_type_serde_names() {
        let ty: ParameterType = serde_json::from_str("\"directory\"").unwrap();
        assert_eq!(ty, ParameterType::Directory);
        assert_eq!(serde_json::to_string(&ParameterType::None).unwrap(), "\"none\"");
    }
}

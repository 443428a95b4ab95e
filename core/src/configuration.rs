//! Option, parameter and command configurations and the root aggregate.
//!
//! Each configuration wraps a [`Registry`], so identifiers are validated and
//! deduplicated eagerly by the `add*` calls. All builders return
//! `Result<&mut Self>` to allow chaining with `?`.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::properties::CommandLineProperties;
use crate::registry::{Registry, validate_identifier};
use crate::types::{
    CommandMetadata, IdentifierKind, OptionMetadata, ParameterMetadata, ParameterType,
};

/// Default application name used in usage text.
pub const DEFAULT_APP_NAME: &str = "appname";

/// Options of one scope (root or command), looked up by short or long
/// identifier.
#[derive(Debug, Clone)]
pub struct OptionConfiguration {
    options: Registry<OptionMetadata>,
    /// Long identifier to short identifier.
    long_index: HashMap<String, String>,
}

impl OptionConfiguration {
    pub fn new() -> Self {
        Self {
            options: Registry::new("option"),
            long_index: HashMap::new(),
        }
    }

    /// Adds an option.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidIdentifier`] if the short, long or parameter
    ///   identifier does not match the identifier pattern.
    /// - [`ConfigError::IdentifierConflict`] if either identifier is already
    ///   used by another option, as a short or a long identifier.
    /// - [`ConfigError::MissingCustomParser`] if the attached parameter is
    ///   CUSTOM without a parser.
    pub fn add(&mut self, option: OptionMetadata) -> Result<&mut Self> {
        validate_identifier("option", &option.identifier)?;
        if self.long_index.contains_key(&option.identifier) {
            return Err(conflict(&option.identifier));
        }
        if let Some(long) = &option.long_identifier {
            validate_identifier("option", long)?;
            let taken_as_short = long != &option.identifier && self.options.contains(long);
            if taken_as_short || self.long_index.contains_key(long) {
                return Err(conflict(long));
            }
        }
        if let Some(parameter) = &option.parameter {
            validate_identifier("parameter", &parameter.identifier)?;
            parameter.check()?;
        }

        let short = option.identifier.clone();
        let long = option.long_identifier.clone();
        self.options.add(option)?;
        if let Some(long) = long {
            self.long_index.insert(long, short);
        }
        Ok(self)
    }

    /// Adds an optional option without a value.
    pub fn add_flag(&mut self, identifier: &str, description: &str) -> Result<&mut Self> {
        self.add(OptionMetadata::flag(identifier).with_description(description))
    }

    /// Adds a required option carrying an optional value of
    /// `parameter_type`.
    pub fn add_option_with(
        &mut self,
        identifier: &str,
        parameter_type: ParameterType,
        description: &str,
    ) -> Result<&mut Self> {
        self.add(
            OptionMetadata::with_value(identifier, parameter_type)
                .with_required(true)
                .with_description(description),
        )
    }

    /// Looks up an option by short identifier, then by long identifier.
    pub fn get(&self, identifier: &str) -> Option<&OptionMetadata> {
        self.options
            .get(identifier)
            .or_else(|| self.get_by_kind(identifier, IdentifierKind::Long))
    }

    /// Looks up an option by one kind of identifier only.
    pub fn get_by_kind(&self, identifier: &str, kind: IdentifierKind) -> Option<&OptionMetadata> {
        match kind {
            IdentifierKind::Short => self.options.get(identifier),
            IdentifierKind::Long => self
                .long_index
                .get(identifier)
                .and_then(|short| self.options.get(short)),
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.get(identifier).is_some()
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, OptionMetadata> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl Default for OptionConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a OptionConfiguration {
    type Item = &'a OptionMetadata;
    type IntoIter = std::slice::Iter<'a, OptionMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn conflict(identifier: &str) -> ConfigError {
    ConfigError::IdentifierConflict {
        scope: "option",
        identifier: identifier.to_string(),
    }
}

/// Positional parameters of one scope, in matching order.
#[derive(Debug, Clone)]
pub struct ParameterConfiguration {
    parameters: Registry<ParameterMetadata>,
}

impl ParameterConfiguration {
    pub fn new() -> Self {
        Self {
            parameters: Registry::new("parameter"),
        }
    }

    /// Adds a parameter.
    ///
    /// # Errors
    ///
    /// Fails on an invalid or duplicate identifier, or on a CUSTOM
    /// parameter without a parser.
    pub fn add(&mut self, parameter: ParameterMetadata) -> Result<&mut Self> {
        parameter.check()?;
        self.parameters.add(parameter)?;
        Ok(self)
    }

    /// Adds a STRING parameter.
    pub fn add_parameter(
        &mut self,
        identifier: &str,
        required: bool,
        multi_valued: bool,
        description: &str,
    ) -> Result<&mut Self> {
        let mut parameter = ParameterMetadata::new(identifier, ParameterType::String, required)
            .with_description(description);
        parameter.multi_valued = multi_valued;
        self.add(parameter)
    }

    pub fn get(&self, identifier: &str) -> Option<&ParameterMetadata> {
        self.parameters.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.parameters.contains(identifier)
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ParameterMetadata> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl Default for ParameterConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ParameterConfiguration {
    type Item = &'a ParameterMetadata;
    type IntoIter = std::slice::Iter<'a, ParameterMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Subcommands keyed by keyword.
#[derive(Debug, Clone)]
pub struct CommandConfiguration {
    commands: Registry<CommandMetadata>,
}

impl CommandConfiguration {
    pub fn new() -> Self {
        Self {
            commands: Registry::new("command"),
        }
    }

    pub fn add(&mut self, command: CommandMetadata) -> Result<&mut Self> {
        self.commands.add(command)?;
        Ok(self)
    }

    /// Adds a command from its parts.
    ///
    /// # Errors
    ///
    /// Fails on an invalid or duplicate keyword, or on any invalid
    /// parameter in `parameters`.
    pub fn add_command(
        &mut self,
        keyword: &str,
        options: OptionConfiguration,
        description: &str,
        parameters: Vec<ParameterMetadata>,
    ) -> Result<&mut Self> {
        let mut parameter_configuration = ParameterConfiguration::new();
        for parameter in parameters {
            parameter_configuration.add(parameter)?;
        }
        self.add(
            CommandMetadata::new(keyword)
                .with_description(description)
                .with_options(options)
                .with_parameters(parameter_configuration),
        )
    }

    pub fn get(&self, keyword: &str) -> Option<&CommandMetadata> {
        self.commands.get(keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.commands.contains(keyword)
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CommandMetadata> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a CommandConfiguration {
    type Item = &'a CommandMetadata;
    type IntoIter = std::slice::Iter<'a, CommandMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The root grammar: application name, token properties and the top-level
/// options, parameters and commands.
///
/// # Examples
///
/// ```
/// use clif_core::{CommandLineConfiguration, CommandLineProperties, ParameterType};
///
/// let mut config = CommandLineConfiguration::new("copy")
///     .with_description("copies files")
///     .with_properties(CommandLineProperties::unix());
/// config
///     .add_flag("v", "verbose")?
///     .add_option_with("o", ParameterType::Directory, "output directory")?;
/// config.add_parameter("files", true, true, "files to copy")?;
///
/// assert_eq!(config.options().len(), 2);
/// assert!(config.parameters().contains("files"));
/// # Ok::<(), clif_core::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CommandLineConfiguration {
    name: String,
    description: String,
    properties: CommandLineProperties,
    options: OptionConfiguration,
    parameters: ParameterConfiguration,
    commands: CommandConfiguration,
}

impl CommandLineConfiguration {
    /// Creates an empty configuration using the target's token grammar.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            properties: CommandLineProperties::system(),
            options: OptionConfiguration::new(),
            parameters: ParameterConfiguration::new(),
            commands: CommandConfiguration::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_properties(mut self, properties: CommandLineProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn set_properties(&mut self, properties: CommandLineProperties) {
        debug!(
            short_prefix = %properties.short_prefix,
            long_prefix = %properties.long_prefix,
            delimiter = ?properties.delimiter,
            "Replaced command-line properties"
        );
        self.properties = properties;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn properties(&self) -> &CommandLineProperties {
        &self.properties
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

    pub fn commands(&self) -> &CommandConfiguration {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut CommandConfiguration {
        &mut self.commands
    }

    /// Adds a top-level option. See [`OptionConfiguration::add`].
    pub fn add_option(&mut self, option: OptionMetadata) -> Result<&mut Self> {
        self.options.add(option)?;
        Ok(self)
    }

    /// Adds an optional top-level option without a value.
    pub fn add_flag(&mut self, identifier: &str, description: &str) -> Result<&mut Self> {
        self.options.add_flag(identifier, description)?;
        Ok(self)
    }

    /// Adds a required top-level option carrying a value of
    /// `parameter_type`.
    pub fn add_option_with(
        &mut self,
        identifier: &str,
        parameter_type: ParameterType,
        description: &str,
    ) -> Result<&mut Self> {
        self.options
            .add_option_with(identifier, parameter_type, description)?;
        Ok(self)
    }

    /// Adds a top-level STRING parameter.
    pub fn add_parameter(
        &mut self,
        identifier: &str,
        required: bool,
        multi_valued: bool,
        description: &str,
    ) -> Result<&mut Self> {
        self.parameters
            .add_parameter(identifier, required, multi_valued, description)?;
        Ok(self)
    }

    /// Adds a top-level positional parameter.
    pub fn add_parameter_metadata(&mut self, parameter: ParameterMetadata) -> Result<&mut Self> {
        self.parameters.add(parameter)?;
        Ok(self)
    }

    pub fn add_command(&mut self, command: CommandMetadata) -> Result<&mut Self> {
        self.commands.add(command)?;
        Ok(self)
    }

    /// Looks up a top-level option by short or long identifier.
    pub fn option(&self, identifier: &str) -> Option<&OptionMetadata> {
        self.options.get(identifier)
    }

    pub fn command(&self, keyword: &str) -> Option<&CommandMetadata> {
        self.commands.get(keyword)
    }
}

impl Default for CommandLineConfiguration {
    fn default() -> Self {
        Self::new(DEFAULT_APP_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_lookup_by_short_and_long() {
        let mut options = OptionConfiguration::new();
        options
            .add(OptionMetadata::with_value("i", ParameterType::File).with_long("input"))
            .unwrap();

        assert_eq!(options.get("i").unwrap().identifier, "i");
        assert_eq!(options.get("input").unwrap().identifier, "i");
        assert!(options.get_by_kind("input", IdentifierKind::Short).is_none());
        assert!(options.get_by_kind("i", IdentifierKind::Long).is_none());
        assert!(options.get_by_kind("input", IdentifierKind::Long).is_some());
    }

    #[test]
    fn test_long_identifier_conflicts() {
        let mut options = OptionConfiguration::new();
        options
            .add(OptionMetadata::flag("v").with_long("verbose"))
            .unwrap();

        let err = options
            .add(OptionMetadata::flag("w").with_long("verbose"))
            .unwrap_err();
        assert_eq!(err, conflict("verbose"));

        let err = options.add(OptionMetadata::flag("verbose")).unwrap_err();
        assert_eq!(err, conflict("verbose"));

        let err = options
            .add(OptionMetadata::flag("x").with_long("v"))
            .unwrap_err();
        assert_eq!(err, conflict("v"));
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_invalid_long_identifier() {
        let mut options = OptionConfiguration::new();
        let err = options
            .add(OptionMetadata::flag("v").with_long("very-verbose"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIdentifier { scope: "option", .. }));
        assert!(options.is_empty());
    }

    #[test]
    fn test_custom_option_without_parser_is_rejected() {
        let mut config = CommandLineConfiguration::new("app");
        let err = config
            .add_option(OptionMetadata::with_value("p", ParameterType::Custom))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingCustomParser("p".to_string()));

        let err = config
            .add_parameter_metadata(ParameterMetadata::required("q", ParameterType::Custom))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingCustomParser("q".to_string()));
    }

    #[test]
    fn test_convenience_builders() {
        let mut config = CommandLineConfiguration::default();
        config
            .add_flag("v", "verbose")
            .unwrap()
            .add_option_with("n", ParameterType::Integer, "count")
            .unwrap()
            .add_parameter("dir", true, false, "directory")
            .unwrap();

        assert_eq!(config.name(), DEFAULT_APP_NAME);
        assert!(!config.option("v").unwrap().required);
        let count = config.option("n").unwrap();
        assert!(count.required);
        assert_eq!(
            count.parameter.as_ref().unwrap().parameter_type,
            ParameterType::Integer
        );
        let dir = config.parameters().get("dir").unwrap();
        assert_eq!(dir.parameter_type, ParameterType::String);
        assert!(dir.required);
    }

    #[test]
    fn test_add_command_with_parameters() {
        let mut options = OptionConfiguration::new();
        options.add_flag("a", "all").unwrap();

        let mut commands = CommandConfiguration::new();
        commands
            .add_command(
                "list",
                options,
                "list entries",
                vec![ParameterMetadata::optional("pattern", ParameterType::String)],
            )
            .unwrap();

        let list = commands.get("list").unwrap();
        assert!(list.options().contains("a"));
        assert!(list.parameters().contains("pattern"));

        let err = commands
            .add_command("list", OptionConfiguration::new(), "", Vec::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::IdentifierConflict { scope: "command", .. }));
    }

    #[test]
    fn test_parameters_keep_declaration_order() {
        let mut parameters = ParameterConfiguration::new();
        parameters
            .add_parameter("src", true, false, "")
            .unwrap()
            .add_parameter("dst", true, false, "")
            .unwrap();
        let ids: Vec<&str> = parameters.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(ids, vec!["src", "dst"]);
    }
}

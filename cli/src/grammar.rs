//! Grammar files: a serializable description of a command line.
//!
//! A grammar is loaded from YAML (or JSON, chosen by the `.json`
//! extension) and turned into a [`CommandLineConfiguration`].
//!
//! ```yaml
//! name: fetch
//! description: Fetch refs from a remote
//! properties:
//!   os: Linux
//! options:
//!   - id: r
//!     long: remote
//!     type: string
//!     required: true
//!     parameter_required: true
//! parameters:
//!   - id: refs
//!     multi_valued: true
//! commands:
//!   - keyword: prune
//!     options:
//!       - id: n
//!         long: noop
//! ```

use std::io::BufReader;
use std::path::Path;

use clif_core::{
    CommandLineConfiguration, CommandLineProperties, CommandMetadata, ConfigError,
    OptionMetadata, ParameterMetadata, ParameterType,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading a grammar file.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The grammar parsed but describes an invalid configuration.
    #[error("invalid grammar: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, GrammarError>;

/// Root of a grammar file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grammar {
    pub name: Option<String>,
    pub description: String,
    pub properties: Option<GrammarProperties>,
    pub options: Vec<GrammarOption>,
    pub parameters: Vec<GrammarParameter>,
    pub commands: Vec<GrammarCommand>,
}

/// Token grammar overrides. `os` picks the base grammar; the other fields
/// replace single parts of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarProperties {
    pub os: Option<String>,
    pub short_prefix: Option<String>,
    pub long_prefix: Option<String>,
    pub delimiter: Option<String>,
}

/// A prefixed option. Without `type` the option is a flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarOption {
    pub id: String,
    pub long: Option<String>,
    #[serde(rename = "type")]
    pub parameter_type: Option<ParameterType>,
    pub required: bool,
    pub multi_valued: bool,
    /// Whether a value must follow the option when it is given.
    pub parameter_required: bool,
    pub description: String,
    pub long_description: Option<String>,
}

/// A positional parameter. `type` defaults to `string`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarParameter {
    pub id: String,
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    pub required: bool,
    pub multi_valued: bool,
    pub description: String,
    pub long_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarCommand {
    pub keyword: String,
    pub description: String,
    pub long_description: Option<String>,
    pub options: Vec<GrammarOption>,
    pub parameters: Vec<GrammarParameter>,
}

impl Grammar {
    /// Loads a grammar from `path`: JSON for a `.json` extension, YAML
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](GrammarError::Io) if the file cannot be opened and
    /// [`Json`](GrammarError::Json) or [`Yaml`](GrammarError::Yaml) if it
    /// does not deserialize.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading grammar");
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let grammar = if is_json {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        Ok(grammar)
    }

    /// Builds the configuration this grammar describes. A missing `name`
    /// falls back to `fallback_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Config`](GrammarError::Config) when an identifier is
    /// invalid or declared twice, or when a `custom` type is used (grammar
    /// files cannot name a value parser).
    pub fn into_configuration(self, fallback_name: &str) -> Result<CommandLineConfiguration> {
        let name = self.name.as_deref().unwrap_or(fallback_name);
        let properties = self
            .properties
            .map(GrammarProperties::into_properties)
            .unwrap_or_else(CommandLineProperties::system);
        let mut config = CommandLineConfiguration::new(name)
            .with_description(&self.description)
            .with_properties(properties);

        for option in self.options {
            config.add_option(option.into_option())?;
        }
        for parameter in self.parameters {
            config.add_parameter_metadata(parameter.into_parameter())?;
        }
        for command in self.commands {
            config.add_command(command.into_command()?)?;
        }
        debug!(
            name = config.name(),
            options = config.options().len(),
            parameters = config.parameters().len(),
            commands = config.commands().len(),
            "Built configuration"
        );
        Ok(config)
    }
}

impl GrammarProperties {
    fn into_properties(self) -> CommandLineProperties {
        let mut properties = match self.os.as_deref() {
            Some(os) => CommandLineProperties::for_os(os),
            None => CommandLineProperties::system(),
        };
        if let Some(prefix) = self.short_prefix {
            properties.short_prefix = prefix;
        }
        if let Some(prefix) = self.long_prefix {
            properties.long_prefix = prefix;
        }
        if let Some(delimiter) = self.delimiter {
            properties.delimiter = delimiter;
        }
        properties
    }
}

impl GrammarOption {
    fn into_option(self) -> OptionMetadata {
        let mut option = match self.parameter_type {
            None | Some(ParameterType::None) => OptionMetadata::flag(&self.id),
            Some(parameter_type) => OptionMetadata::with_parameter(
                &self.id,
                ParameterMetadata::new(&self.id, parameter_type, self.parameter_required),
            ),
        };
        if let Some(long) = &self.long {
            option = option.with_long(long);
        }
        if self.multi_valued {
            option = option.allow_multiple();
        }
        option = option
            .with_required(self.required)
            .with_description(&self.description);
        if let Some(long_description) = &self.long_description {
            option = option.with_long_description(long_description);
        }
        option
    }
}

impl GrammarParameter {
    fn into_parameter(self) -> ParameterMetadata {
        let mut parameter = ParameterMetadata::new(&self.id, self.parameter_type, self.required)
            .with_description(&self.description);
        if self.multi_valued {
            parameter = parameter.allow_multiple();
        }
        if let Some(long_description) = &self.long_description {
            parameter = parameter.with_long_description(long_description);
        }
        parameter
    }
}

impl GrammarCommand {
    fn into_command(self) -> Result<CommandMetadata> {
        let mut command = CommandMetadata::new(&self.keyword).with_description(&self.description);
        if let Some(long_description) = &self.long_description {
            command = command.with_long_description(long_description);
        }
        for option in self.options {
            command.options_mut().add(option.into_option())?;
        }
        for parameter in self.parameters {
            command.parameters_mut().add(parameter.into_parameter())?;
        }
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FETCH: &str = r#"
name: fetch
description: Fetch refs
properties:
  os: Linux
  delimiter: "="
options:
  - id: r
    long: remote
    type: string
    required: true
    parameter_required: true
  - id: v
    long: verbose
    description: chatty output
parameters:
  - id: refs
    multi_valued: true
commands:
  - keyword: prune
    description: Remove stale refs
    options:
      - id: n
        long: noop
    parameters:
      - id: count
        type: integer
        required: true
"#;

    #[test]
    fn test_yaml_grammar_builds_configuration() {
        let grammar: Grammar = serde_yaml::from_str(FETCH).unwrap();
        let config = grammar.into_configuration("unused").unwrap();

        assert_eq!(config.name(), "fetch");
        assert_eq!(config.description(), "Fetch refs");
        assert_eq!(config.properties().short_prefix, "-");
        assert_eq!(config.properties().delimiter, "=");

        let remote = config.option("remote").unwrap();
        assert!(remote.required);
        let parameter = remote.parameter.as_ref().unwrap();
        assert!(parameter.required);
        assert_eq!(parameter.parameter_type, ParameterType::String);

        let verbose = config.option("v").unwrap();
        assert!(!verbose.is_parameter_accepted());
        assert_eq!(verbose.description, "chatty output");

        let refs = config.parameters().get("refs").unwrap();
        assert!(refs.multi_valued);
        assert_eq!(refs.parameter_type, ParameterType::String);

        let prune = config.command("prune").unwrap();
        assert!(prune.options().contains("noop"));
        assert_eq!(
            prune.parameters().get("count").unwrap().parameter_type,
            ParameterType::Integer
        );
    }

    #[test]
    fn test_missing_name_uses_fallback() {
        let grammar: Grammar = serde_yaml::from_str("description: x").unwrap();
        let config = grammar.into_configuration("tool").unwrap();
        assert_eq!(config.name(), "tool");
    }

    #[test]
    fn test_windows_properties() {
        let properties = GrammarProperties {
            os: Some("Windows 11".to_string()),
            ..GrammarProperties::default()
        };
        assert_eq!(properties.into_properties(), CommandLineProperties::windows());
    }

    #[test]
    fn test_custom_type_is_rejected() {
        let grammar: Grammar = serde_yaml::from_str(
            "options:\n  - id: p\n    type: custom\n",
        )
        .unwrap();
        let err = grammar.into_configuration("app").unwrap_err();
        assert!(matches!(
            err,
            GrammarError::Config(ConfigError::MissingCustomParser(_))
        ));
    }

    #[test]
    fn test_duplicate_identifier_is_rejected() {
        let grammar: Grammar = serde_yaml::from_str(
            "parameters:\n  - id: src\n  - id: src\n",
        )
        .unwrap();
        assert!(matches!(
            grammar.into_configuration("app"),
            Err(GrammarError::Config(ConfigError::IdentifierConflict { .. }))
        ));
    }

    #[test]
    fn test_load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("grammar.json");
        std::fs::write(&json, r#"{"name": "j", "parameters": [{"id": "a"}]}"#).unwrap();
        let yaml = dir.path().join("grammar.yaml");
        std::fs::write(&yaml, "name: y\n").unwrap();

        let from_json = Grammar::load(&json).unwrap();
        assert_eq!(from_json.name.as_deref(), Some("j"));
        assert_eq!(from_json.parameters[0].id, "a");
        assert_eq!(Grammar::load(&yaml).unwrap().name.as_deref(), Some("y"));
        assert!(matches!(
            Grammar::load(dir.path().join("missing.yaml")),
            Err(GrammarError::Io(_))
        ));
    }
}

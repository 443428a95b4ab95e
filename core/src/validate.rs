//! Configuration lint.
//!
//! Setup errors that make a configuration unusable are rejected eagerly by
//! the `add*` builders. This module reports the remaining problems: grammars
//! that build fine but can never match some input the way the author meant.
//!
//! # Examples
//!
//! ```
//! use clif_core::*;
//!
//! let mut config = CommandLineConfiguration::new("app");
//! config.add_parameter("src", true, false, "source")?;
//! assert!(validate_configuration(&config).is_empty());
//!
//! // A required parameter after an optional one can never be filled alone.
//! config.add_parameter("extra", false, false, "")?;
//! config.add_parameter("dst", true, false, "")?;
//! let warnings = validate_configuration(&config);
//! assert!(warnings
//!     .iter()
//!     .any(|w| matches!(w, ConfigWarning::RequiredAfterOptional { .. })));
//! # Ok::<(), ConfigError>(())
//! ```

use thiserror::Error;

use crate::configuration::{CommandLineConfiguration, ParameterConfiguration};

/// Scope name used for top-level findings.
pub const ROOT_SCOPE: &str = "<root>";

/// Non-fatal configuration findings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    /// Application name is empty or whitespace-only.
    #[error("application name is empty")]
    EmptyName,
    /// A prefix is empty, so every token would look like an option.
    #[error("{0} prefix is empty")]
    EmptyPrefix(&'static str),
    /// The short prefix begins with the long prefix, which is tried first,
    /// so short options are never recognised.
    #[error("long prefix '{long}' shadows short prefix '{short}'")]
    PrefixShadowed { short: String, long: String },
    /// A positional parameter follows a multi-valued one and never
    /// receives a token.
    #[error("parameter {parameter} in {scope} follows multi-valued parameter {after} and is unreachable")]
    ParameterAfterMultiValued {
        scope: String,
        parameter: String,
        after: String,
    },
    /// A required positional parameter follows an optional one.
    #[error("required parameter {parameter} in {scope} follows optional parameter {after}")]
    RequiredAfterOptional {
        scope: String,
        parameter: String,
        after: String,
    },
}

/// Lints a configuration and all of its commands.
///
/// Returns every finding; an empty vector means the configuration is clean.
pub fn validate_configuration(config: &CommandLineConfiguration) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.name().trim().is_empty() {
        warnings.push(ConfigWarning::EmptyName);
    }

    let properties = config.properties();
    if properties.short_prefix.is_empty() {
        warnings.push(ConfigWarning::EmptyPrefix("short"));
    }
    if properties.long_prefix.is_empty() {
        warnings.push(ConfigWarning::EmptyPrefix("long"));
    }
    // The long prefix is tried first.
    if !properties.long_prefix.is_empty()
        && properties.short_prefix.len() > properties.long_prefix.len()
        && properties.short_prefix.starts_with(&properties.long_prefix)
    {
        warnings.push(ConfigWarning::PrefixShadowed {
            short: properties.short_prefix.clone(),
            long: properties.long_prefix.clone(),
        });
    }

    lint_parameters(ROOT_SCOPE, config.parameters(), &mut warnings);
    for command in config.commands() {
        lint_parameters(&command.keyword, command.parameters(), &mut warnings);
    }

    warnings
}

fn lint_parameters(
    scope: &str,
    parameters: &ParameterConfiguration,
    warnings: &mut Vec<ConfigWarning>,
) {
    let mut multi_valued: Option<&str> = None;
    let mut optional: Option<&str> = None;

    for parameter in parameters {
        if let Some(after) = multi_valued {
            warnings.push(ConfigWarning::ParameterAfterMultiValued {
                scope: scope.to_string(),
                parameter: parameter.identifier.clone(),
                after: after.to_string(),
            });
            continue;
        }
        if parameter.required {
            if let Some(after) = optional {
                warnings.push(ConfigWarning::RequiredAfterOptional {
                    scope: scope.to_string(),
                    parameter: parameter.identifier.clone(),
                    after: after.to_string(),
                });
            }
        } else if optional.is_none() {
            optional = Some(parameter.identifier.as_str());
        }
        if parameter.multi_valued {
            multi_valued = Some(parameter.identifier.as_str());
        }
    }
}

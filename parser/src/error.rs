//! Parse-time and coercion errors.

use std::num::ParseIntError;
use std::path::PathBuf;

use clif_core::BoxError;
use thiserror::Error;

/// Failure to coerce a raw token into a typed value.
#[derive(Debug, Error)]
pub enum CoerceError {
    #[error("'{raw}' is not a valid integer")]
    InvalidInteger {
        raw: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{} is not an existing directory", .0.display())]
    NotADirectory(PathBuf),

    /// A CUSTOM parameter reached coercion without a parser.
    #[error("no value parser attached to parameter {0}")]
    MissingParser(String),

    #[error("custom parser rejected the value")]
    Custom(#[source] BoxError),
}

/// Rejection of an argument vector.
///
/// Every variant carries the keyword of the matched command, if any, so the
/// usage formatter can show the command-scoped usage.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A prefix was not followed by an identifier.
    #[error("invalid option token '{token}'")]
    InvalidOptionToken {
        token: String,
        command: Option<String>,
    },

    #[error("option {option} is not found")]
    UnknownOption {
        option: String,
        command: Option<String>,
    },

    /// The delimiter was present but no value followed.
    #[error("parameter required for option {option}")]
    MissingParameterValue {
        option: String,
        command: Option<String>,
    },

    #[error("invalid parameter value '{value}' for parameter {parameter}")]
    InvalidParameterValue {
        value: String,
        parameter: String,
        command: Option<String>,
        #[source]
        source: CoerceError,
    },

    #[error("option {option} is required")]
    MissingRequiredOption {
        option: String,
        command: Option<String>,
    },

    /// The option was given but its required value was not.
    #[error("missing parameter for option {option}")]
    MissingOptionParameter {
        option: String,
        command: Option<String>,
    },

    #[error("parameter {parameter} is required but not specified")]
    MissingRequiredParameter {
        parameter: String,
        command: Option<String>,
    },
}

impl ParseError {
    /// Keyword of the command in scope when the error occurred.
    pub fn command(&self) -> Option<&str> {
        match self {
            ParseError::InvalidOptionToken { command, .. }
            | ParseError::UnknownOption { command, .. }
            | ParseError::MissingParameterValue { command, .. }
            | ParseError::InvalidParameterValue { command, .. }
            | ParseError::MissingRequiredOption { command, .. }
            | ParseError::MissingOptionParameter { command, .. }
            | ParseError::MissingRequiredParameter { command, .. } => command.as_deref(),
        }
    }

    /// `true` if the error happened inside a matched command.
    pub fn is_command_error(&self) -> bool {
        self.command().is_some()
    }

    /// `true` for the post-parse requiredness failures.
    pub fn is_requiredness_error(&self) -> bool {
        matches!(
            self,
            ParseError::MissingRequiredOption { .. }
                | ParseError::MissingOptionParameter { .. }
                | ParseError::MissingRequiredParameter { .. }
        )
    }
}

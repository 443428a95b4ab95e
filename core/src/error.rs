//! Error types raised while building a command-line configuration.
//!
//! These are setup-time failures: an invalid identifier, an identifier that
//! is already registered, or a CUSTOM parameter declared without a value
//! parser. They surface from the builder call that introduced the problem.

use thiserror::Error;

/// Errors that can occur while declaring options, parameters and commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Identifier is empty or contains characters outside `[A-Za-z0-9_]`.
    #[error(
        "{scope} identifier '{identifier}' is not valid: only A-Z, a-z, 0-9 and _ are allowed"
    )]
    InvalidIdentifier {
        /// Registry that rejected the identifier (`option`, `parameter`, `command`).
        scope: &'static str,
        /// The rejected identifier.
        identifier: String,
    },

    /// Identifier is already registered in the same scope.
    #[error("{scope} identifier '{identifier}' already exists")]
    IdentifierConflict {
        /// Registry that holds the existing entry.
        scope: &'static str,
        /// The duplicated identifier.
        identifier: String,
    },

    /// A parameter of type CUSTOM was declared without a value parser.
    #[error("parameter '{0}' has type CUSTOM but no value parser is attached")]
    MissingCustomParser(String),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

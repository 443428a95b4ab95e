//! Command-line grammar model.
//!
//! This crate defines the configuration side of a command-line parser:
//!
//! - [`OptionMetadata`], [`ParameterMetadata`] and [`CommandMetadata`]
//!   describe options, positional parameters and subcommands.
//! - [`OptionConfiguration`], [`ParameterConfiguration`] and
//!   [`CommandConfiguration`] hold them in declaration order, keyed by
//!   validated, unique identifiers (see [`Registry`]).
//! - [`CommandLineConfiguration`] is the root grammar, together with the
//!   [`CommandLineProperties`] that define option prefixes and delimiter.
//! - [`Value`] is what a parameter token is coerced into.
//!
//! Setup mistakes fail eagerly with a [`ConfigError`]; the softer findings
//! of [`validate_configuration`] are returned as a list of
//! [`ConfigWarning`]s.
//!
//! # Example
//!
//! ```
//! use clif_core::*;
//!
//! let mut config = CommandLineConfiguration::new("archive")
//!     .with_description("packs files")
//!     .with_properties(CommandLineProperties::unix());
//! config.add_option(
//!     OptionMetadata::with_value("o", ParameterType::File)
//!         .with_long("output")
//!         .with_required(true)
//!         .with_description("archive to write"),
//! )?;
//! config.add_parameter("files", true, true, "files to pack")?;
//!
//! let mut list = CommandMetadata::new("list").with_description("lists an archive");
//! list.parameters_mut()
//!     .add(ParameterMetadata::required("archive", ParameterType::File))?;
//! config.add_command(list)?;
//!
//! assert_eq!(config.option("output").unwrap().identifier, "o");
//! assert!(config.command("list").is_some());
//! assert!(validate_configuration(&config).is_empty());
//! # Ok::<(), ConfigError>(())
//! ```

pub mod configuration;
mod error;
mod properties;
mod registry;
mod types;
mod validate;
mod value;

pub use configuration::{
    CommandConfiguration, CommandLineConfiguration, DEFAULT_APP_NAME, OptionConfiguration,
    ParameterConfiguration,
};
pub use error::{ConfigError, Result};
pub use properties::{
    CommandLineProperties, DEFAULT_DELIMITER, UNIX_LONG_PREFIX, UNIX_SHORT_PREFIX, WINDOWS_PREFIX,
};
pub use registry::{Identified, Registry, is_valid_identifier, validate_identifier};
pub use types::*;
pub use validate::{ConfigWarning, ROOT_SCOPE, validate_configuration};
pub use value::{BoxError, CustomValue, Value};

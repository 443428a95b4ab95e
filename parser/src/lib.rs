//! Parsing, validation and usage rendering for clif grammars.
//!
//! Given a [`CommandLineConfiguration`](clif_core::CommandLineConfiguration)
//! from `clif-core`, this crate turns raw arguments into a [`ParseResult`]
//! and renders usage text from the same configuration.
//!
//! # Main entry points
//!
//! - [`parse`] / [`CommandLineParser::parse`]: scan and validate arguments.
//! - [`matches`] / [`CommandLineParser::matches`]: the same, reported as a
//!   boolean with the result written to an out-parameter.
//! - [`format`], [`format_with`], [`format_command`]: usage text.
//! - [`format_error`], [`format_message`]: usage text prefixed with an
//!   error line.
//!
//! # Example
//!
//! ```
//! use clif_core::*;
//! use clif_parser::{format_error, parse};
//!
//! let mut config = CommandLineConfiguration::new("fetch")
//!     .with_properties(CommandLineProperties::unix());
//! config.add_option(
//!     OptionMetadata::with_value("r", ParameterType::String)
//!         .with_long("remote")
//!         .with_required(true),
//! )?;
//! config.add_parameter("refs", false, true, "refs to fetch")?;
//!
//! let result = parse(&config, ["--remote", "origin", "main", "dev"])?;
//! assert_eq!(result.option_value("r").and_then(Value::as_str), Some("origin"));
//! assert_eq!(
//!     result.parameter_value("refs"),
//!     Some(&Value::List(vec!["main".into(), "dev".into()]))
//! );
//!
//! let err = parse(&config, ["main"]).unwrap_err();
//! assert!(format_error(&config, &err).starts_with("Error: option -r is required\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod coerce;
mod cursor;
mod engine;
mod error;
mod result;
mod usage;
mod validator;

pub use coerce::coerce;
pub use engine::{CommandLineParser, join_arguments, matches, parse};
pub use error::{CoerceError, ParseError};
pub use result::{
    InputSummary, OptionInput, OptionInputSet, ParameterInput, ParameterInputSet, ParseResult,
    ParseSummary,
};
pub use usage::{
    Verbosity, format, format_command, format_error, format_option, format_parameter,
    format_message, format_with,
};
pub use validator::validate;

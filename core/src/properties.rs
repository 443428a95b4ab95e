//! Token grammar: option prefixes and the option/value delimiter.

use serde::{Deserialize, Serialize};

/// Short option prefix on Unix-like systems.
pub const UNIX_SHORT_PREFIX: &str = "-";
/// Long option prefix on Unix-like systems.
pub const UNIX_LONG_PREFIX: &str = "--";
/// Option prefix (short and long) on Windows.
pub const WINDOWS_PREFIX: &str = "/";
/// Default delimiter between an option and its value.
pub const DEFAULT_DELIMITER: &str = " ";

/// Prefixes and delimiter used to recognise options.
///
/// # Examples
///
/// ```
/// use clif_core::CommandLineProperties;
///
/// let unix = CommandLineProperties::for_os("Linux");
/// assert_eq!(unix.short_prefix, "-");
/// assert_eq!(unix.long_prefix, "--");
///
/// let windows = CommandLineProperties::for_os("Windows 10");
/// assert_eq!(windows.short_prefix, "/");
/// assert!(!windows.prefixes_differ());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLineProperties {
    pub short_prefix: String,
    pub long_prefix: String,
    pub delimiter: String,
}

impl CommandLineProperties {
    pub fn new(short_prefix: &str, long_prefix: &str, delimiter: &str) -> Self {
        Self {
            short_prefix: short_prefix.to_string(),
            long_prefix: long_prefix.to_string(),
            delimiter: delimiter.to_string(),
        }
    }

    /// `-`, `--` and a space.
    pub fn unix() -> Self {
        Self::new(UNIX_SHORT_PREFIX, UNIX_LONG_PREFIX, DEFAULT_DELIMITER)
    }

    /// `/`, `/` and a space.
    pub fn windows() -> Self {
        Self::new(WINDOWS_PREFIX, WINDOWS_PREFIX, DEFAULT_DELIMITER)
    }

    /// Picks the Windows grammar when `os_name` starts with `Windows`,
    /// the Unix grammar otherwise.
    pub fn for_os(os_name: &str) -> Self {
        if os_name.starts_with("Windows") {
            Self::windows()
        } else {
            Self::unix()
        }
    }

    /// Grammar of the compilation target.
    pub fn system() -> Self {
        if cfg!(windows) {
            Self::windows()
        } else {
            Self::unix()
        }
    }

    pub fn with_delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = delimiter.to_string();
        self
    }

    /// `true` when short and long identifiers are told apart by prefix.
    pub fn prefixes_differ(&self) -> bool {
        self.short_prefix != self.long_prefix
    }

    /// `true` when the delimiter is empty or only whitespace.
    pub fn is_whitespace_delimited(&self) -> bool {
        self.delimiter.trim().is_empty()
    }
}

impl Default for CommandLineProperties {
    fn default() -> Self {
        Self::system()
    }
}

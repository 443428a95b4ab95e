//! Insertion-ordered storage keyed by validated identifiers.
//!
//! Every option, parameter and command lives in a [`Registry`]. The registry
//! rejects identifiers that do not match `^[A-Za-z0-9_]+$` and identifiers
//! that are already present, and it enumerates entries in the order they
//! were added (the usage formatter and positional matching rely on that).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::error::{ConfigError, Result};

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("static regex must compile"));

/// Returns `true` if `identifier` is non-empty and made only of ASCII
/// letters, digits and underscores.
///
/// # Examples
///
/// ```
/// use clif_core::is_valid_identifier;
///
/// assert!(is_valid_identifier("input_file2"));
/// assert!(!is_valid_identifier("input-file"));
/// assert!(!is_valid_identifier(""));
/// ```
pub fn is_valid_identifier(identifier: &str) -> bool {
    IDENTIFIER_RE.is_match(identifier)
}

/// Checks `identifier` against the identifier pattern.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidIdentifier`] tagged with `scope` if the
/// identifier does not match.
pub fn validate_identifier(scope: &'static str, identifier: &str) -> Result<()> {
    if is_valid_identifier(identifier) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            scope,
            identifier: identifier.to_string(),
        })
    }
}

/// Anything that can be stored in a [`Registry`].
pub trait Identified {
    /// The unique key of this entry.
    fn identifier(&self) -> &str;
}

/// Identifier-unique collection that preserves insertion order.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    scope: &'static str,
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Identified> Registry<T> {
    /// Creates an empty registry. `scope` names the registry in error
    /// messages.
    pub fn new(scope: &'static str) -> Self {
        Self {
            scope,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Name used in error messages (`option`, `parameter`, `command`).
    pub fn scope(&self) -> &'static str {
        self.scope
    }

    /// Adds an entry and returns a reference to the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidIdentifier`] if the identifier is not
    /// valid and [`ConfigError::IdentifierConflict`] if it is already taken.
    pub fn add(&mut self, entry: T) -> Result<&T> {
        let identifier = entry.identifier().to_string();
        validate_identifier(self.scope, &identifier)?;
        if self.index.contains_key(&identifier) {
            return Err(ConfigError::IdentifierConflict {
                scope: self.scope,
                identifier,
            });
        }

        trace!(scope = self.scope, identifier = %identifier, "Registered identifier");
        let position = self.entries.len();
        self.index.insert(identifier, position);
        self.entries.push(entry);
        Ok(&self.entries[position])
    }

    /// Looks up an entry by identifier.
    pub fn get(&self, identifier: &str) -> Option<&T> {
        self.index.get(identifier).map(|&i| &self.entries[i])
    }

    /// Returns `true` if an entry with this identifier exists.
    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Entry(&'static str);

    impl Identified for Entry {
        fn identifier(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_registry_preserves_insertion_order() {
        let mut registry = Registry::new("option");
        registry.add(Entry("zeta")).unwrap();
        registry.add(Entry("alpha")).unwrap();
        registry.add(Entry("mid")).unwrap();

        let order: Vec<&str> = registry.iter().map(|e| e.0).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = Registry::new("parameter");
        registry.add(Entry("dir")).unwrap();

        let err = registry.add(Entry("dir")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::IdentifierConflict {
                scope: "parameter",
                identifier: "dir".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_rejects_invalid_identifiers() {
        let mut registry = Registry::new("command");
        for bad in ["", "with space", "dash-ed", "dot.ted", "ünï"] {
            let err = registry.add(Entry(bad)).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidIdentifier { .. }), "{bad}");
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_identifiers_are_case_sensitive() {
        let mut registry = Registry::new("option");
        registry.add(Entry("v")).unwrap();
        registry.add(Entry("V")).unwrap();

        assert!(registry.contains("v"));
        assert!(registry.contains("V"));
        assert!(registry.get("x").is_none());
    }
}

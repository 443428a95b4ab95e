//! Coerced values produced by parsing option and parameter tokens.

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Boxed error returned by custom value parsers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A value produced by a custom parser.
///
/// Implemented for every `'static` type that is `Debug + Send + Sync`, so a
/// [`ValueParser`](crate::ValueParser) can return any such type through
/// [`Value::custom`].
pub trait CustomValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> CustomValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A parsed option or parameter value.
///
/// The variant follows the [`ParameterType`](crate::ParameterType) of the
/// metadata that produced it. Multi-valued inputs hold a [`Value::List`].
///
/// # Examples
///
/// ```
/// use clif_core::Value;
///
/// let v = Value::String("file.txt".into());
/// assert_eq!(v.as_str(), Some("file.txt"));
/// assert_eq!(v.as_integer(), None);
///
/// let list = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
/// assert_eq!(list.as_list().map(<[Value]>::len), Some(2));
/// ```
#[derive(Clone)]
pub enum Value {
    String(String),
    Integer(i64),
    /// A file reference; existence is not checked.
    File(PathBuf),
    /// A path that was verified to be an existing directory.
    Directory(PathBuf),
    Boolean(bool),
    /// Accumulated values of a multi-valued input, in input order.
    List(Vec<Value>),
    /// Arbitrary value returned by a custom parser.
    Custom(Arc<dyn CustomValue>),
}

impl Value {
    /// Wraps an arbitrary value as [`Value::Custom`].
    pub fn custom<T: CustomValue>(value: T) -> Self {
        Value::Custom(Arc::new(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the path of a [`Value::File`] or a [`Value::Directory`].
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::File(p) | Value::Directory(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the path of a [`Value::File`].
    pub fn as_file(&self) -> Option<&Path> {
        match self {
            Value::File(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the path of a [`Value::Directory`].
    pub fn as_directory(&self) -> Option<&Path> {
        match self {
            Value::Directory(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Downcasts a [`Value::Custom`] to its concrete type.
    ///
    /// # Examples
    ///
    /// ```
    /// use clif_core::Value;
    ///
    /// let v = Value::custom(vec![1u8, 2, 3]);
    /// assert_eq!(v.downcast_ref::<Vec<u8>>(), Some(&vec![1, 2, 3]));
    /// assert!(v.downcast_ref::<String>().is_none());
    /// ```
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(inner) => {
                let inner: &dyn CustomValue = &**inner;
                inner.as_any().downcast_ref::<T>()
            }
            _ => None,
        }
    }

    /// Returns `false` for an empty list, `true` otherwise.
    pub fn is_present(&self) -> bool {
        !matches!(self, Value::List(items) if items.is_empty())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Integer(n) => f.debug_tuple("Integer").field(n).finish(),
            Value::File(p) => f.debug_tuple("File").field(p).finish(),
            Value::Directory(p) => f.debug_tuple("Directory").field(p).finish(),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Custom(inner) => f.debug_tuple("Custom").field(inner).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::File(p) | Value::Directory(p) => write!(f, "{}", p.display()),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Custom(inner) => write!(f, "{inner:?}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::File(a), Value::File(b)) => a == b,
            (Value::Directory(a), Value::Directory(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::File(p) | Value::Directory(p) => serializer.serialize_str(&p.to_string_lossy()),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::List(items) => serializer.collect_seq(items),
            Value::Custom(inner) => serializer.serialize_str(&format!("{inner:?}")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_custom_value_downcast() {
        let v = Value::custom(Point { x: 1, y: 2 });
        assert_eq!(v.downcast_ref::<Point>(), Some(&Point { x: 1, y: 2 }));
        assert_eq!(v.downcast_ref::<i32>(), None);
        assert_eq!(format!("{v}"), "Point { x: 1, y: 2 }");
    }

    #[test]
    fn test_display_renders_lists() {
        let v = Value::List(vec![
            Value::File(PathBuf::from("a.txt")),
            Value::File(PathBuf::from("b.txt")),
        ]);
        assert_eq!(v.to_string(), "[a.txt, b.txt]");
    }

    #[test]
    fn test_serialize_value_to_json() {
        let v = Value::List(vec![
            Value::String("x".into()),
            Value::Integer(42),
            Value::Boolean(true),
            Value::Directory(PathBuf::from("/tmp")),
        ]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"["x",42,true,"/tmp"]"#);
    }

    #[test]
    fn test_empty_list_is_not_present() {
        assert!(!Value::List(Vec::new()).is_present());
        assert!(Value::List(vec![Value::Integer(1)]).is_present());
        assert!(Value::Boolean(false).is_present());
    }
}

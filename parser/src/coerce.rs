//! Raw token to typed value conversion.

use std::path::PathBuf;

use clif_core::{ParameterMetadata, ParameterType, Value};

use crate::error::CoerceError;

/// Converts `raw` according to the parameter's type.
///
/// Returns `Ok(None)` for [`ParameterType::None`].
///
/// # Errors
///
/// Fails on an unparsable integer, a DIRECTORY path that is not an existing
/// directory, or a custom parser error.
///
/// # Examples
///
/// ```
/// use clif_core::{ParameterMetadata, ParameterType, Value};
/// use clif_parser::coerce;
///
/// let count = ParameterMetadata::required("count", ParameterType::Integer);
/// assert_eq!(coerce(&count, "-12").unwrap(), Some(Value::Integer(-12)));
/// assert!(coerce(&count, "twelve").is_err());
///
/// let flag = ParameterMetadata::required("flag", ParameterType::Boolean);
/// assert_eq!(coerce(&flag, "TRUE").unwrap(), Some(Value::Boolean(true)));
/// assert_eq!(coerce(&flag, "yes").unwrap(), Some(Value::Boolean(false)));
/// ```
pub fn coerce(metadata: &ParameterMetadata, raw: &str) -> Result<Option<Value>, CoerceError> {
    let value = match metadata.parameter_type {
        ParameterType::String => Value::String(raw.to_string()),
        ParameterType::Integer => {
            let n = raw
                .parse::<i64>()
                .map_err(|source| CoerceError::InvalidInteger {
                    raw: raw.to_string(),
                    source,
                })?;
            Value::Integer(n)
        }
        ParameterType::File => Value::File(PathBuf::from(raw)),
        ParameterType::Directory => {
            let path = PathBuf::from(raw);
            if !path.is_dir() {
                return Err(CoerceError::NotADirectory(path));
            }
            Value::Directory(path)
        }
        ParameterType::Boolean => Value::Boolean(raw.eq_ignore_ascii_case("true")),
        ParameterType::Custom => {
            let parser = metadata
                .parser
                .as_ref()
                .ok_or_else(|| CoerceError::MissingParser(metadata.identifier.clone()))?;
            parser.parse(metadata, raw).map_err(CoerceError::Custom)?
        }
        ParameterType::None => return Ok(None),
    };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use clif_core::BoxError;

    use super::*;

    struct Csv;

    impl clif_core::ValueParser for Csv {
        fn parse_value(&self, _metadata: &ParameterMetadata, raw: &str) -> Result<Value, BoxError> {
            let items = raw
                .split(',')
                .map(|part| part.trim().parse::<i64>().map(Value::Integer))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(items))
        }
    }

    #[test]
    fn test_integer_is_not_trimmed() {
        let meta = ParameterMetadata::required("n", ParameterType::Integer);
        assert_eq!(coerce(&meta, "42").unwrap(), Some(Value::Integer(42)));
        assert!(matches!(
            coerce(&meta, " 42"),
            Err(CoerceError::InvalidInteger { .. })
        ));
        assert!(coerce(&meta, "99999999999999999999").is_err());
    }

    #[test]
    fn test_directory_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let meta = ParameterMetadata::required("d", ParameterType::Directory);

        let ok = coerce(&meta, dir.path().to_str().unwrap()).unwrap().unwrap();
        assert_eq!(ok.as_directory(), Some(dir.path()));

        let missing = dir.path().join("missing");
        let err = coerce(&meta, missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CoerceError::NotADirectory(p) if p == missing));

        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(coerce(&meta, file.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_file_existence_is_not_checked() {
        let meta = ParameterMetadata::required("f", ParameterType::File);
        let value = coerce(&meta, "/definitely/not/here.txt").unwrap().unwrap();
        assert_eq!(value.as_file(), Some(std::path::Path::new("/definitely/not/here.txt")));
    }

    #[test]
    fn test_none_type_yields_no_value() {
        let meta = ParameterMetadata::required("x", ParameterType::None);
        assert_eq!(coerce(&meta, "anything").unwrap(), None);
    }

    #[test]
    fn test_custom_parser_result() {
        let meta = ParameterMetadata::custom("nums", Csv);
        let value = coerce(&meta, "1, 2,3").unwrap().unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)])
        );
        assert!(matches!(coerce(&meta, "1,x"), Err(CoerceError::Custom(_))));

        let bare = ParameterMetadata::optional("nums", ParameterType::Custom);
        assert!(matches!(coerce(&bare, "1"), Err(CoerceError::MissingParser(_))));
    }
}

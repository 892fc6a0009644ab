use crate::model::{Definition, MappingSpec, Variable};
use thiserror::Error;

pub const MAX_KEY_LENGTH: usize = 128;

/// A payload that parsed but does not describe a valid entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} is longer than {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("key '{key}' contains '{found}'; only letters, digits, '_', '-' and '.' are allowed")]
    InvalidKeyCharacter { key: String, found: char },
    #[error("batch contains no mappings")]
    EmptyBatch,
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

pub fn validate_definition(definition: &Definition) -> Result<(), ValidationError> {
    require_text("name", &definition.name)
}

/// Row ids are not checked here; the store rejects unknown ids per row.
pub fn validate_batch(specs: &[MappingSpec]) -> Result<(), ValidationError> {
    if specs.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    Ok(())
}

pub fn validate_key(key: &str) -> Result<(), ValidationError> {
    require_text("key", key)?;
    if key.chars().count() > MAX_KEY_LENGTH {
        return Err(ValidationError::TooLong {
            field: "key",
            max: MAX_KEY_LENGTH,
        });
    }
    if let Some(found) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(ValidationError::InvalidKeyCharacter {
            key: key.to_string(),
            found,
        });
    }
    Ok(())
}

/// Check a variable before it is written
pub fn validate_variable(variable: &Variable) -> Result<(), ValidationError> {
    validate_key(&variable.key)?;
    require_text("designation name", &variable.designation.name)?;
    require_text("value", &variable.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_variable_passes() {
        assert_eq!(validate_variable(&Variable::new("production", "audio.volume-1_max", "50")), Ok(()));
    }

    #[test]
    fn test_variable_fields_must_not_be_empty() {
        assert_eq!(
            validate_variable(&Variable::new("production", "", "50")),
            Err(ValidationError::Empty { field: "key" })
        );
        assert_eq!(
            validate_variable(&Variable::new(" ", "volume", "50")),
            Err(ValidationError::Empty { field: "designation name" })
        );
        assert_eq!(
            validate_variable(&Variable::new("production", "volume", "")),
            Err(ValidationError::Empty { field: "value" })
        );
    }

    #[test]
    fn test_key_charset() {
        let error = validate_key("bad key").unwrap_err();
        assert_eq!(
            error,
            ValidationError::InvalidKeyCharacter {
                key: "bad key".to_string(),
                found: ' '
            }
        );
        assert!(validate_key("dollar$").is_err());
        assert!(validate_key(&"k".repeat(MAX_KEY_LENGTH)).is_ok());
        assert!(matches!(
            validate_key(&"k".repeat(MAX_KEY_LENGTH + 1)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_definition_name_required() {
        assert!(validate_definition(&Definition::new("volume", None)).is_ok());
        assert_eq!(
            validate_definition(&Definition::new("  ", None)),
            Err(ValidationError::Empty { field: "name" })
        );
    }

    #[test]
    fn test_batch_rules() {
        assert_eq!(validate_batch(&[]), Err(ValidationError::EmptyBatch));
        assert!(validate_batch(&[MappingSpec::new(1, 2, 3, "a")]).is_ok());
        assert!(validate_batch(&[MappingSpec::new(1, 2, 3, "a"), MappingSpec::new(1, 0, 3, "b")]).is_ok());
    }
}

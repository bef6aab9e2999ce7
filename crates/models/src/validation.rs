//! Field validators shared by the entity modules.

use crate::errors::ModelError;

/// Trim `value` and require 1..=`max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    if trimmed.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} longer than {max} characters")));
    }
    Ok(trimmed.to_string())
}

/// Like [`required_text`] but an empty value is allowed.
pub fn optional_text(field: &str, value: &str, max: usize) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} longer than {max} characters")));
    }
    Ok(trimmed.to_string())
}

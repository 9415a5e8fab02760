//! Input validation for record fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Date not in `YYYY-MM-DD` form.
    InvalidDate(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::InvalidDate(msg) => write!(f, "Invalid date: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for names and titles.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum allowed length for free-text fields (descriptions, notes).
pub const MAX_TEXT_LENGTH: usize = 4096;

/// Validate that a required text field is present and within bounds.
pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    if value.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
            actual: value.len(),
        });
    }

    Ok(())
}

/// Validate an optional free-text field's length.
pub fn validate_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_TEXT_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LENGTH,
            actual: value.len(),
        });
    }

    Ok(())
}

/// Validate a schedule date in `YYYY-MM-DD` form.
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty("date".to_string()));
    }

    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidDate(format!("expected YYYY-MM-DD, got '{}'", value)))
}

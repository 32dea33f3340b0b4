//! Input validation helpers
//!
//! Centralized text length constants and validation functions for
//! request DTOs arriving at the HTTP boundary.

use crate::utils::AppError;
use validator::Validate;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, recipient, bank, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, review comments
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, postal code, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Street addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Run derive-based validation on a payload, mapping failures to
/// [`AppError::Validation`] with the offending fields listed.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|errors| {
        let mut fields: Vec<&str> = errors.field_errors().keys().map(|k| k.as_ref()).collect();
        fields.sort_unstable();
        AppError::validation(format!("Invalid fields: {}", fields.join(", ")))
    })
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

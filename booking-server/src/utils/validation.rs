//! Input validation helpers
//!
//! Centralized limits and per-field checks for the RPC surface. Every
//! failure carries a specific cause code — the dialogue engine speaks these
//! messages to the caller, so a generic "validation failed" is never enough.

use shared::error::{AppError, ErrorCode};
use shared::util::normalize_phone;

// ── Text length limits ──────────────────────────────────────────────

/// Customer and staff names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, special requests, resolution notes
pub const MAX_NOTE_LEN: usize = 500;

/// 电话号码、外部 call id 等短标识
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ── Party size bounds ───────────────────────────────────────────────

/// Hard phone-booking bounds; a tenant's max_party_size may lower the cap
pub const MIN_PARTY_SIZE: i64 = 1;
pub const MAX_PARTY_SIZE: i64 = 20;

/// Validate party size against the global bounds and the tenant cap.
pub fn validate_party_size(party_size: i64, tenant_max: i64) -> Result<(), AppError> {
    let cap = tenant_max.clamp(MIN_PARTY_SIZE, MAX_PARTY_SIZE);
    if party_size < MIN_PARTY_SIZE || party_size > cap {
        return Err(AppError::with_message(
            ErrorCode::InvalidPartySize,
            format!("Party size must be between {MIN_PARTY_SIZE} and {cap}, got {party_size}"),
        ));
    }
    Ok(())
}

/// Validate a required customer name.
pub fn validate_customer_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::new(ErrorCode::MissingName));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::with_message(
            ErrorCode::ValidationFailed,
            format!("Name is too long ({} chars, max {MAX_NAME_LEN})", name.len()),
        ));
    }
    Ok(())
}

/// Validate and canonicalize a required phone number.
pub fn validate_phone(phone: &str) -> Result<String, AppError> {
    if phone.trim().is_empty() {
        return Err(AppError::new(ErrorCode::MissingPhone));
    }
    normalize_phone(phone).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::InvalidPhone,
            format!("'{}' is not a valid phone number", phone.trim()),
        )
    })
}

/// Validate an optional email (length + minimal shape).
pub fn validate_optional_email(email: &Option<String>) -> Result<(), AppError> {
    if let Some(e) = email {
        if e.len() > MAX_EMAIL_LEN || !e.contains('@') {
            return Err(AppError::with_message(
                ErrorCode::ValidationFailed,
                format!("'{e}' is not a valid email address"),
            ));
        }
    }
    Ok(())
}

/// Validate that an optional text field is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::with_message(
            ErrorCode::ValidationFailed,
            format!("{field} is too long ({} chars, max {max_len})", v.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_size_bounds() {
        assert!(validate_party_size(1, 20).is_ok());
        assert!(validate_party_size(20, 20).is_ok());
        assert!(validate_party_size(0, 20).is_err());
        assert!(validate_party_size(21, 20).is_err());
        // 租户上限低于全局上限
        assert!(validate_party_size(12, 10).is_err());
        assert!(validate_party_size(10, 10).is_ok());
    }

    #[test]
    fn phone_causes_are_specific() {
        assert_eq!(
            validate_phone("").unwrap_err().code,
            ErrorCode::MissingPhone
        );
        assert_eq!(
            validate_phone("not a number").unwrap_err().code,
            ErrorCode::InvalidPhone
        );
        assert_eq!(
            validate_phone("+34 600 123 456").unwrap(),
            "+34600123456"
        );
    }

    #[test]
    fn name_causes_are_specific() {
        assert_eq!(
            validate_customer_name("  ").unwrap_err().code,
            ErrorCode::MissingName
        );
        assert!(validate_customer_name("Maria").is_ok());
    }
}

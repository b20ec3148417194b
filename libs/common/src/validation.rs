//! Input validation utilities
//!
//! Each check returns `Err(message)`; callers collect the messages into a
//! `FieldErrors` map keyed by the input field.

use regex::Regex;
use std::sync::OnceLock;

/// Validate a required display name
pub fn validate_fullname(fullname: &str) -> Result<(), String> {
    let fullname = fullname.trim();

    if fullname.is_empty() {
        return Err("Fullname is required".to_string());
    }

    if fullname.chars().count() > 255 {
        return Err("Fullname must be at most 255 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_letter || !has_digit {
        return Err("Password must contain at least one letter and one digit".to_string());
    }

    Ok(())
}

/// Validate a phone number: digits with an optional leading `+`, 8 to 15 digits
pub fn validate_phone(phone: &str) -> Result<(), String> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX
        .get_or_init(|| Regex::new(r"^\+?[0-9]{8,15}$").expect("Failed to compile phone regex"));

    if !regex.is_match(phone) {
        return Err("Phone must contain 8 to 15 digits".to_string());
    }

    Ok(())
}

/// Lowercase and trim an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane@example.com").is_ok());
        assert_eq!(validate_email(""), Err("Email is required".to_string()));
        assert!(validate_email("jane@").is_err());
        assert!(validate_email("jane example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("coffee123").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("12345678").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_fullname() {
        assert!(validate_fullname("Jane Doe").is_ok());
        assert!(validate_fullname("   ").is_err());
        assert!(validate_fullname(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+628123456789").is_ok());
        assert!(validate_phone("0812-3456").is_err());
        assert!(validate_phone("1234").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }
}

use regex::Regex;
use std::sync::LazyLock;

use super::document::{all_same_digit, digits_only};
use super::ValidationError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern compiles")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^([a-z][a-z\d+.-]*://)?((([a-z\d]([a-z\d-]*[a-z\d])*)\.)+[a-z]{2,}|((\d{1,3}\.){3}\d{1,3}))(:\d+)?(/[-a-z\d%_.~+]*)*(\?[;&a-z\d%_.~+=-]*)?(#[-a-z\d_]*)?$",
    )
    .expect("url pattern compiles")
});

/// Valid two-digit area codes (DDD).
pub const AREA_CODES: [u8; 67] = [
    11, 12, 13, 14, 15, 16, 17, 18, 19, // SP
    21, 22, 24, 27, 28, // RJ, ES
    31, 32, 33, 34, 35, 37, 38, // MG
    41, 42, 43, 44, 45, 46, 47, 48, 49, // PR, SC
    51, 53, 54, 55, // RS
    61, 62, 63, 64, 65, 66, 67, 68, 69, // Center-West, North
    71, 73, 74, 75, 77, 79, // BA, SE
    81, 82, 83, 84, 85, 86, 87, 88, 89, // Northeast
    91, 92, 93, 94, 95, 96, 97, 98, 99, // North
];

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    validate_email(email).is_ok()
}

/// Phone numbers: 10 digits (landline) or 11 (mobile, third digit 9),
/// prefixed by a known area code.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = digits_only(phone);
    if digits.is_empty() {
        return Err(ValidationError::MissingField("phone"));
    }
    if !(10..=11).contains(&digits.len()) {
        return Err(ValidationError::PhoneLength(digits.len()));
    }
    if all_same_digit(&digits) {
        return Err(ValidationError::PhoneRepeatedDigits);
    }

    // digits_only keeps ASCII digits only, so every byte is b'0'..=b'9'
    let bytes = digits.as_bytes();
    let area = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    if !AREA_CODES.contains(&area) {
        return Err(ValidationError::PhoneAreaCode(digits[..2].to_string()));
    }

    if digits.len() == 11 && digits.as_bytes()[2] != b'9' {
        return Err(ValidationError::PhoneMobilePrefix);
    }

    Ok(())
}

/// Optional field: blank is always fine.
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    let url = url.trim();
    if url.is_empty() || URL_RE.is_match(url) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl)
    }
}

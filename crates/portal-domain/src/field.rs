//! Local form-field rules for the registration and login forms.

/// Minimum password length accepted by every form.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Length of an Aadhaar card number.
pub const AADHAAR_LEN: usize = 12;

/// Length of a mobile number.
pub const MOBILE_LEN: usize = 10;

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Validate an Aadhaar card number: exactly 12 ASCII digits.
pub fn validate_aadhaar(s: &str) -> bool {
    is_digits(s, AADHAAR_LEN)
}

/// Validate a mobile number: exactly 10 ASCII digits.
pub fn validate_mobile(s: &str) -> bool {
    is_digits(s, MOBILE_LEN)
}

/// Validate a password against the minimum length policy.
pub fn validate_password(s: &str) -> bool {
    s.len() >= MIN_PASSWORD_LEN
}

//! One-time-code generation.

use rand::Rng;

/// Smallest issuable code. The range starts at 100000 so the leading
/// digit is never zero and every code prints as exactly six digits.
pub const OTP_MIN: u32 = 100_000;

/// Largest issuable code.
pub const OTP_MAX: u32 = 999_999;

/// Generate a uniformly random six-digit decimal code.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(OTP_MIN..=OTP_MAX).to_string()
}

/// Whether a string has the shape of an issued code.
pub fn is_code_format(s: &str) -> bool {
    s.len() == 6 && !s.starts_with('0') && s.bytes().all(|b| b.is_ascii_digit())
}

//! Pure domain rules shared across the portal: field validation and
//! one-time-code generation. No I/O.

pub mod email;
pub mod field;
pub mod otp;

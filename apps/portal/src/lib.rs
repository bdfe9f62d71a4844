//! Client for the student-scholarship portal: OTP-gated login for
//! users and admins, registration with document upload, password
//! reset, and profile retrieval, backed by hosted identity, record,
//! blob, and email services.

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod state;
pub mod usecase;

pub mod admin;
pub mod challenge;
pub mod login;
pub mod profile;
pub mod reset;
pub mod seed;
pub mod signup;

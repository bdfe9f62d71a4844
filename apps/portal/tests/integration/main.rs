
mod admin_test;
mod login_test;
mod signup_test;

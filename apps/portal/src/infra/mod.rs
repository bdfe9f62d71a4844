pub mod email;
pub mod identity;
pub mod records;
pub mod storage;

pub mod password;
pub mod render;
pub mod storage;
pub mod token;
pub mod validation;

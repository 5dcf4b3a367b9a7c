pub mod password;
pub mod principal;
pub mod token;

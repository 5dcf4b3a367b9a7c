pub mod auth;
pub mod health;
pub mod me;
pub mod tutor;
pub mod types;
pub mod user_login;
pub mod user_register;

// shared input bounds for the credential routes

pub(crate) fn valid_username(username: &str) -> bool {
    let length = username.chars().count();
    (3..=40).contains(&length)
}

pub(crate) fn valid_password(password: &str) -> bool {
    let length = password.chars().count();
    (3..=128).contains(&length)
}

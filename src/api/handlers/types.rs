//! Request and response bodies shared across the handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::users::PublicUser;

#[derive(Debug, Deserialize, ToSchema)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Token plus the public user view; the body of register and login success.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthData {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeData {
    pub user: PublicUser,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TutorRequest {
    pub content: Option<String>,
}

use serde::{Deserialize, Serialize};

use super::repo_types::User;

/// Request body for `POST /users`. Both fields are optional at the wire level so
/// that a missing field surfaces as our own 400 rather than a deserializer error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: User,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub google_id: Option<String>, // set once the Google identity is linked
    pub avatar: Option<String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Values for a fresh `users` row; everything else takes the column default.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub google_id: Option<String>,
    pub avatar: Option<String>,
    pub last_login: Option<OffsetDateTime>,
}

/// Fields refreshed on every successful provider login.
#[derive(Debug, Clone)]
pub struct LoginRefresh {
    pub name: String,
    pub avatar: Option<String>,
    /// Links the provider identity when set; `None` keeps the stored value.
    pub google_id: Option<String>,
    pub at: OffsetDateTime,
}

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::extractors::RequireUser,
    error::ApiError,
    state::AppState,
    users::{
        dto::{CreateUserRequest, UserEnvelope, UserList},
        repo_types::NewUser,
        services::{is_valid_email, normalize_email},
    },
};

pub fn users_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users).post(create_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UserList>, ApiError> {
    let users = state.users.list().await.map_err(|e| {
        error!(error = %e, "list users failed");
        ApiError::internal("Failed to fetch users")
    })?;
    Ok(Json(UserList { users }))
}

#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    let email = payload.email.as_deref().map(normalize_email).unwrap_or_default();

    if name.is_empty() || email.is_empty() {
        warn!("create user missing fields");
        return Err(ApiError::BadRequest("Name and email are required"));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "create user invalid email");
        return Err(ApiError::BadRequest("Invalid email"));
    }

    let user = state
        .users
        .insert(NewUser {
            name: name.to_string(),
            email,
            google_id: None,
            avatar: None,
            last_login: None,
        })
        .await
        .map_err(|e| {
            error!(error = %e, "create user failed");
            ApiError::internal("Failed to create user")
        })?;

    info!(user_id = %user.id, email = %user.email, created_by = %actor.id, "user created");
    Ok((StatusCode::CREATED, Json(UserEnvelope { user })))
}

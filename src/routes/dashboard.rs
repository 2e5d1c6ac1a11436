use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{error, instrument};

use crate::{
    auth::extractors::RequireUser, error::ApiError, session::SessionUser, state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub message: String,
    pub user: SessionUser,
    pub stats: DashboardStats,
}

#[instrument(skip(state, user))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let total_users = state.users.count().await.map_err(|e| {
        error!(error = %e, user_id = %user.id, "dashboard count failed");
        ApiError::internal("Failed to load dashboard")
    })?;

    Ok(Json(DashboardResponse {
        message: format!("Welcome to your dashboard, {}!", user.name),
        user: SessionUser::from(&user),
        stats: DashboardStats { total_users },
    }))
}

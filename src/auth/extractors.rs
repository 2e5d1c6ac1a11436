use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use tracing::{error, warn};

use crate::{
    error::ApiError,
    session::{self, CurrentSession},
    state::AppState,
    users::User,
};

/// Active user behind the request's session. Rejects with 401 otherwise.
pub struct RequireUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let current = CurrentSession::load(state, &jar).await.map_err(|e| {
            error!(error = %e, "session lookup failed");
            auth_error()
        })?;
        let Some(user_id) = current.user_id() else {
            return Err(ApiError::login_required().into_response());
        };

        match state.users.find_by_id(user_id).await {
            Ok(Some(user)) if user.is_active => Ok(RequireUser(user)),
            Ok(found) => {
                let email = current
                    .data
                    .as_ref()
                    .map(|d| d.user.email.as_str())
                    .unwrap_or_default();
                warn!(
                    %user_id,
                    %email,
                    missing = found.is_none(),
                    "session user missing or inactive; destroying session"
                );
                let jar = session::destroy(state, jar).await.map_err(|e| {
                    error!(error = %e, "destroy session failed");
                    auth_error()
                })?;
                Err((jar, ApiError::inactive_user()).into_response())
            }
            Err(e) => {
                error!(error = %e, %user_id, "user lookup failed");
                Err(auth_error())
            }
        }
    }
}

/// Active user behind the session when there is one. Never rejects.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        match resolve_optional(state, &jar).await {
            Ok(user) => Ok(MaybeUser(user)),
            Err(e) => {
                warn!(error = %e, "optional auth failed");
                Ok(MaybeUser(None))
            }
        }
    }
}

async fn resolve_optional(state: &AppState, jar: &CookieJar) -> anyhow::Result<Option<User>> {
    let current = CurrentSession::load(state, jar).await?;
    let Some(user_id) = current.user_id() else {
        return Ok(None);
    };
    let user = state.users.find_by_id(user_id).await?;
    Ok(user.filter(|u| u.is_active))
}

fn auth_error() -> Response {
    ApiError::internal_with("Authentication error", "Failed to verify authentication").into_response()
}

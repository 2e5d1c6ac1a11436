use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{CallbackQuery, LogoutResponse, MeResponse},
        extractors::RequireUser,
        google::GoogleProfile,
        reconcile::{reconcile, ReconcileError},
        LOGIN_URL,
    },
    error::ApiError,
    session,
    state::AppState,
};

pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_STATE_PATH: &str = "/auth";
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
        .route("/auth/logout", get(logout))
        .route("/auth/me", get(me))
}

/// Development-only shortcut that logs in a fixed test identity.
pub fn mock_login_routes() -> Router<AppState> {
    Router::new().route("/auth/mock-login", get(mock_login))
}

#[derive(Debug, Error)]
enum LoginError {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error(transparent)]
    Session(#[from] anyhow::Error),
}

/// 302 with a `Location` header.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

#[instrument(skip(state, jar))]
pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let csrf_state = session::random_token();
    let url = state.provider.authorization_url(&csrf_state).map_err(|e| {
        error!(error = %e, "oauth initiation failed");
        ApiError::internal_with("Authentication failed", "Could not initiate Google login")
            .with_debug(e.to_string())
    })?;

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, csrf_state))
        .path(OAUTH_STATE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session.cookie_secure)
        .max_age(time::Duration::minutes(OAUTH_STATE_TTL_MINUTES))
        .build();

    Ok((jar.add(cookie), found(&url)))
}

#[instrument(skip(state, jar, query))]
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path(OAUTH_STATE_PATH));

    let profile = match callback_profile(&state, &query, expected_state.as_deref()).await {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "oauth callback failed");
            return (jar, callback_failed()).into_response();
        }
    };

    match login_with_profile(&state, jar.clone(), &profile).await {
        Ok(jar) => (jar, found(&state.config.post_login_redirect)).into_response(),
        Err(e) => (jar, login_error(e, callback_failed())).into_response(),
    }
}

#[instrument(skip(state, jar))]
pub async fn mock_login(State(state): State<AppState>, jar: CookieJar) -> Response {
    let profile = GoogleProfile {
        id: "mock123".into(),
        email: format!("test@{}", state.config.allowed_domain),
        name: Some("Test User".into()),
        picture: Some("https://via.placeholder.com/150".into()),
        verified_email: Some(true),
    };

    match login_with_profile(&state, jar, &profile).await {
        Ok(jar) => (jar, found(&state.config.post_login_redirect)).into_response(),
        Err(e) => {
            let detail = e.to_string();
            login_error(e, ApiError::internal("Mock login failed").with_debug(detail))
                .into_response()
        }
    }
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<LogoutResponse>), ApiError> {
    let jar = session::destroy(&state, jar).await.map_err(|e| {
        error!(error = %e, "logout failed");
        ApiError::internal_with("Logout failed", "Could not log out properly")
    })?;

    info!("logged out");
    Ok((
        jar,
        Json(LogoutResponse {
            message: "Logged out successfully",
            login_url: LOGIN_URL,
        }),
    ))
}

#[instrument(skip(user))]
pub async fn me(RequireUser(user): RequireUser) -> Json<MeResponse> {
    Json(MeResponse { user: user.into() })
}

async fn callback_profile(
    state: &AppState,
    query: &CallbackQuery,
    expected_state: Option<&str>,
) -> anyhow::Result<GoogleProfile> {
    if let Some(err) = &query.error {
        anyhow::bail!("provider returned error: {err}");
    }
    let code = query
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .context("missing authorization code")?;
    match (expected_state, query.state.as_deref()) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => anyhow::bail!("oauth state mismatch"),
    }

    let access_token = state.provider.exchange_code(code).await?;
    state.provider.fetch_profile(&access_token).await
}

async fn login_with_profile(
    state: &AppState,
    jar: CookieJar,
    profile: &GoogleProfile,
) -> Result<CookieJar, LoginError> {
    let user = reconcile(state.users.as_ref(), &state.config.allowed_domain, profile).await?;
    let jar = session::start(state, jar, &user).await?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(jar)
}

fn login_error(err: LoginError, fallback: ApiError) -> ApiError {
    match err {
        LoginError::Reconcile(e @ ReconcileError::DomainNotAllowed(_)) => {
            warn!(error = %e, "login rejected by domain policy");
            ApiError::DomainNotAllowed(e.to_string())
        }
        other => {
            error!(error = ?other, "login failed");
            fallback
        }
    }
}

fn callback_failed() -> ApiError {
    ApiError::internal_with("Authentication failed", "Could not complete Google login")
}

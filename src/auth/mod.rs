//! Google sign-in and session authentication.
//!
//! - `google`: authorization URL, code exchange, userinfo fetch
//! - `reconcile`: provider profile -> local user row
//! - `extractors`: `RequireUser` / `MaybeUser` gates for handlers
//! - `handlers`: `/auth/*` routes

use crate::state::AppState;
use axum::Router;

mod dto;
pub mod extractors;
pub mod google;
pub mod handlers;
pub mod reconcile;

/// Where unauthenticated clients are pointed to.
pub const LOGIN_URL: &str = "/auth/google";

pub fn router(enable_mock_login: bool) -> Router<AppState> {
    let router = handlers::auth_routes();
    if enable_mock_login {
        tracing::warn!("mock login enabled at /auth/mock-login; never enable this in production");
        router.merge(handlers::mock_login_routes())
    } else {
        router
    }
}

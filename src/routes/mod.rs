use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dashboard;
pub mod pages;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::root))
        .route("/login", get(pages::login_page))
        .route("/health", get(pages::health))
        .route("/dashboard", get(dashboard::dashboard))
}

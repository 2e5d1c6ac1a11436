use axum::{response::Html, Json};
use serde::Serialize;
use tracing::instrument;

use crate::{auth::extractors::MaybeUser, session::SessionUser};

const LOGIN_PAGE: &str = include_str!("../../static/login.html");

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

#[instrument(skip(user))]
pub async fn root(MaybeUser(user): MaybeUser) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Hello World from Gatekeeper!",
        user: user.as_ref().map(SessionUser::from),
    })
}

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

pub async fn health() -> &'static str {
    "ok"
}

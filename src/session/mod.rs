//! Cookie-backed server-side sessions.
//!
//! The `sid` cookie only carries a random id signed with the session secret; the
//! session record itself lives in a [`SessionStore`].

use anyhow::Context;
use axum::extract::FromRef;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::{state::AppState, users::User};

mod keys;
mod store;

pub use keys::SessionKeys;
pub use store::{MemorySessionStore, SessionStore};

pub const SESSION_COOKIE: &str = "sid";

/// Display subset of the user kept alongside the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionData {
    pub user_id: Uuid,
    pub user: SessionUser,
    pub expires_at: OffsetDateTime,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= OffsetDateTime::now_utc()
    }
}

/// The session referenced by the request's cookie, if any.
#[derive(Debug, Default)]
pub struct CurrentSession {
    pub data: Option<SessionData>,
}

impl CurrentSession {
    pub async fn load(state: &AppState, jar: &CookieJar) -> anyhow::Result<Self> {
        let keys = SessionKeys::from_ref(state);
        let Some(id) = session_id(jar, &keys) else {
            return Ok(Self::default());
        };
        let data = state.sessions.load(&id).await?;
        Ok(Self { data })
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.data.as_ref().map(|d| d.user_id)
    }
}

fn session_id(jar: &CookieJar, keys: &SessionKeys) -> Option<String> {
    jar.get(SESSION_COOKIE).and_then(|c| keys.verify(c.value()))
}

/// Random URL-safe token used for session ids and OAuth `state` values.
pub fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Opens a fresh session for `user`, replacing any session the request carried.
pub async fn start(state: &AppState, jar: CookieJar, user: &User) -> anyhow::Result<CookieJar> {
    let keys = SessionKeys::from_ref(state);
    if let Some(previous) = session_id(&jar, &keys) {
        state.sessions.destroy(&previous).await?;
    }

    let cfg = &state.config.session;
    anyhow::ensure!(cfg.max_age_secs > 0, "session max age must be positive");
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(time::Duration::seconds(cfg.max_age_secs))
        .context("session max age out of range")?;

    let id = random_token();
    let data = SessionData {
        user_id: user.id,
        user: SessionUser::from(user),
        expires_at,
    };
    state.sessions.save(&id, data).await?;
    debug!(user_id = %user.id, "session started");

    let cookie = Cookie::build((SESSION_COOKIE, keys.sign(&id)?))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cfg.cookie_secure)
        .max_age(time::Duration::seconds(cfg.max_age_secs))
        .build();
    Ok(jar.add(cookie))
}

/// Removes the request's session (if any) and clears the cookie.
pub async fn destroy(state: &AppState, jar: CookieJar) -> anyhow::Result<CookieJar> {
    let keys = SessionKeys::from_ref(state);
    if let Some(id) = session_id(&jar, &keys) {
        state.sessions.destroy(&id).await?;
        debug!("session destroyed");
    }
    Ok(jar.remove(Cookie::build(SESSION_COOKIE).path("/")))
}

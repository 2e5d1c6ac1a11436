use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub max_age_secs: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub allowed_domain: String,
    pub post_login_redirect: String,
    pub enable_mock_login: bool,
    pub google: GoogleConfig,
    pub session: SessionConfig,
}

const MIN_SESSION_SECRET_LEN: usize = 32;
const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;
const MAX_SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 365;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let secret = std::env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?;
        anyhow::ensure!(
            secret.len() >= MIN_SESSION_SECRET_LEN,
            "SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes"
        );

        let google = GoogleConfig {
            client_id: std::env::var("GOOGLE_CLIENT_ID").context("GOOGLE_CLIENT_ID must be set")?,
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET")
                .context("GOOGLE_CLIENT_SECRET must be set")?,
            callback_url: std::env::var("GOOGLE_CALLBACK_URL")
                .unwrap_or_else(|_| "http://localhost:3000/auth/google/callback".into()),
        };

        let session = SessionConfig {
            secret,
            max_age_secs: session_max_age(std::env::var("SESSION_MAX_AGE_SECS").ok())?,
            cookie_secure: env_flag("COOKIE_SECURE"),
        };

        let host = std::env::var("APP_HOST")
            .or_else(|_| std::env::var("HOST"))
            .unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);

        Ok(Self {
            database_url,
            host,
            port,
            allowed_domain: std::env::var("ALLOWED_DOMAIN").unwrap_or_else(|_| "blockful.io".into()),
            post_login_redirect: std::env::var("POST_LOGIN_REDIRECT")
                .unwrap_or_else(|_| "/dashboard".into()),
            enable_mock_login: env_flag("ENABLE_MOCK_LOGIN"),
            google,
            session,
        })
    }
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn session_max_age(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SESSION_MAX_AGE_SECS);
    };
    let secs = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("SESSION_MAX_AGE_SECS is not a number: {raw}"))?;
    anyhow::ensure!(
        (1..=MAX_SESSION_MAX_AGE_SECS).contains(&secs),
        "SESSION_MAX_AGE_SECS must be between 1 and {MAX_SESSION_MAX_AGE_SECS}"
    );
    Ok(secs)
}

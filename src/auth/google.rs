//! Google OAuth2 authorization-code flow.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::GoogleConfig;

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const SCOPES: &str = "openid email profile";

/// Profile returned by the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub verified_email: Option<bool>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to, carrying `state` for CSRF protection.
    fn authorization_url(&self, state: &str) -> anyhow::Result<String>;
    /// Trades an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> anyhow::Result<String>;
    async fn fetch_profile(&self, access_token: &str) -> anyhow::Result<GoogleProfile>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct GoogleProvider {
    http: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleProvider {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorization_url(&self, state: &str) -> anyhow::Result<String> {
        anyhow::ensure!(
            !self.config.client_id.is_empty(),
            "google client id is not configured"
        );
        Ok(format!(
            "{AUTHORIZE_ENDPOINT}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.callback_url),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        ))
    }

    async fn exchange_code(&self, code: &str) -> anyhow::Result<String> {
        let res = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .context("token exchange request")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            anyhow::bail!("token exchange failed: {status} {body}");
        }

        let tokens: TokenResponse = res.json().await.context("decode token response")?;
        debug!("authorization code exchanged");
        Ok(tokens.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> anyhow::Result<GoogleProfile> {
        let res = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .context("userinfo request")?;

        if !res.status().is_success() {
            anyhow::bail!("Failed to fetch user profile from Google: {}", res.status());
        }

        let profile = res.json::<GoogleProfile>().await.context("decode userinfo")?;
        Ok(profile)
    }
}

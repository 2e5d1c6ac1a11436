//! Maps a provider profile onto a local `users` row.

use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::google::GoogleProfile;
use crate::users::{
    repo_types::{LoginRefresh, NewUser},
    services::normalize_email,
    User, UserStore,
};

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Only {0} email addresses are allowed")]
    DomainNotAllowed(String),

    #[error("provider has not verified {0}")]
    UnverifiedEmail(String),

    #[error("failed to create or update user")]
    Store(#[from] anyhow::Error),
}

pub fn is_allowed_domain(email: &str, allowed_domain: &str) -> bool {
    let suffix = format!("@{}", allowed_domain.trim().to_lowercase());
    normalize_email(email).ends_with(&suffix)
}

/// Creates or updates the user behind `profile`. Performs exactly one write.
///
/// Lookup order is provider id, then email (linking the provider id to an
/// existing email-only account), then insert.
pub async fn reconcile(
    store: &dyn UserStore,
    allowed_domain: &str,
    profile: &GoogleProfile,
) -> Result<User, ReconcileError> {
    if !is_allowed_domain(&profile.email, allowed_domain) {
        return Err(ReconcileError::DomainNotAllowed(allowed_domain.to_string()));
    }
    if profile.verified_email == Some(false) {
        return Err(ReconcileError::UnverifiedEmail(profile.email.clone()));
    }

    let email = normalize_email(&profile.email);
    let name = display_name(profile, &email);
    let now = OffsetDateTime::now_utc();

    if let Some(existing) = store.find_by_google_id(&profile.id).await? {
        debug!(user_id = %existing.id, "known google identity");
        let user = store
            .refresh_login(
                existing.id,
                LoginRefresh {
                    name,
                    avatar: profile.picture.clone(),
                    google_id: None,
                    at: now,
                },
            )
            .await?;
        return Ok(user);
    }

    if let Some(existing) = store.find_by_email(&email).await? {
        info!(user_id = %existing.id, "linking google identity to existing account");
        let user = store
            .refresh_login(
                existing.id,
                LoginRefresh {
                    name,
                    avatar: profile.picture.clone(),
                    google_id: Some(profile.id.clone()),
                    at: now,
                },
            )
            .await?;
        return Ok(user);
    }

    let user = store
        .insert(NewUser {
            name,
            email,
            google_id: Some(profile.id.clone()),
            avatar: profile.picture.clone(),
            last_login: Some(now),
        })
        .await?;
    info!(user_id = %user.id, "user created from google profile");
    Ok(user)
}

fn display_name(profile: &GoogleProfile, email: &str) -> String {
    profile
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string())
}

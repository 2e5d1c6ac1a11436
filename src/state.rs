use std::{sync::Arc, time::Duration};

use sqlx::PgPool;

use crate::{
    auth::google::{GoogleProvider, IdentityProvider},
    config::AppConfig,
    db,
    session::{MemorySessionStore, SessionStore},
    users::{PgUserStore, UserStore},
};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;

        let sessions = Arc::new(MemorySessionStore::default());
        sessions.clone().spawn_sweeper(SESSION_SWEEP_INTERVAL);

        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let provider = Arc::new(GoogleProvider::new(config.google.clone())) as Arc<dyn IdentityProvider>;

        Ok(Self::from_parts(db, config, users, sessions, provider))
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            db,
            config,
            users,
            sessions,
            provider,
        }
    }
}

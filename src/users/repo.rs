use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{LoginRefresh, NewUser, User};

const USER_COLUMNS: &str = "id, name, email, google_id, avatar, is_active, last_login, created_at, updated_at";

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_google_id(&self, google_id: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn insert(&self, new: NewUser) -> anyhow::Result<User>;
    /// Applies a login refresh to an existing row and returns the updated row.
    async fn refresh_login(&self, id: Uuid, refresh: LoginRefresh) -> anyhow::Result<User>;
    async fn list(&self) -> anyhow::Result<Vec<User>>;
    async fn count(&self) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn find_one(&self, column: &str, value: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1 LIMIT 1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.db)
            .await
            .with_context(|| format!("find user by {column}"))?;
        Ok(user)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find user by id")?;
        Ok(user)
    }

    async fn find_by_google_id(&self, google_id: &str) -> anyhow::Result<Option<User>> {
        self.find_one("google_id", google_id).await
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.find_one("email", email).await
    }

    async fn insert(&self, new: NewUser) -> anyhow::Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (name, email, google_id, avatar, last_login)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.google_id)
            .bind(&new.avatar)
            .bind(new.last_login)
            .fetch_one(&self.db)
            .await
            .context("insert user")?;
        Ok(user)
    }

    async fn refresh_login(&self, id: Uuid, refresh: LoginRefresh) -> anyhow::Result<User> {
        let sql = format!(
            r#"
            UPDATE users
               SET name = $2,
                   avatar = $3,
                   google_id = COALESCE($4, google_id),
                   last_login = $5,
                   updated_at = $5
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&refresh.name)
            .bind(&refresh.avatar)
            .bind(&refresh.google_id)
            .bind(refresh.at)
            .fetch_one(&self.db)
            .await
            .context("refresh user login")?;
        Ok(user)
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC");
        let rows = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.db)
            .await
            .context("list users")?;
        Ok(rows)
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await
            .context("count users")?;
        Ok(total)
    }
}

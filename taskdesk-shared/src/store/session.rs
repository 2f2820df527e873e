/// Session store
///
/// Binds opaque session tokens to users. Only the SHA-256 hash of a token is
/// stored; the plaintext token lives in the browser cookie.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::StoreError;
use crate::auth::session::{generate_session_token, hash_session_token};

/// Storage for login sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a session for `user_id` lasting `ttl`
    ///
    /// Returns the plaintext token to hand to the client.
    async fn create(&self, user_id: Uuid, ttl: Duration) -> Result<String, StoreError>;

    /// Resolves a token to the bound user
    ///
    /// Unknown and expired tokens resolve to `None`; expired rows are removed.
    async fn find_user_id(&self, token: &str) -> Result<Option<Uuid>, StoreError>;

    /// Ends a session, returning whether one was bound to `token`
    async fn delete(&self, token: &str) -> Result<bool, StoreError>;

    /// Removes every expired session, returning how many were removed
    async fn purge_expired(&self) -> Result<u64, StoreError>;
}

/// PostgreSQL-backed session store
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Creates a store on top of an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, user_id: Uuid, ttl: Duration) -> Result<String, StoreError> {
        let (token, token_hash) = generate_session_token();
        let expires_at = Utc::now() + ttl;

        sqlx::query(
            r#"
            INSERT INTO sessions (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&token_hash)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_write)?;

        debug!(user_id = %user_id, %expires_at, "Session created");
        Ok(token)
    }

    async fn find_user_id(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        let token_hash = hash_session_token(token);

        let row: Option<(Uuid, chrono::DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT user_id, expires_at
            FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((user_id, expires_at)) if expires_at > Utc::now() => Ok(Some(user_id)),
            Some(_) => {
                debug!("Session expired, removing");
                sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
                    .bind(&token_hash)
                    .execute(&self.pool)
                    .await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, token: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(hash_session_token(token))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

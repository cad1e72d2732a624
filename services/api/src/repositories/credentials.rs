//! Credential pair repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

use super::CredentialStore;
use crate::models::AuthenticationPair;

/// Postgres-backed credential repository
#[derive(Clone)]
pub struct CredentialRepository {
    pool: PgPool,
}

impl CredentialRepository {
    /// Create a new credential repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for CredentialRepository {
    async fn insert_pair(&self, pair: &AuthenticationPair) -> DatabaseResult<()> {
        info!("Storing credentials for user: {}", pair.username);

        sqlx::query("INSERT INTO authentication_pairs (username, password_hash) VALUES ($1, $2)")
            .bind(&pair.username)
            .bind(&pair.password_hash)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(())
    }

    async fn update_pair(&self, pair: &AuthenticationPair) -> DatabaseResult<()> {
        info!("Updating credentials for user: {}", pair.username);

        sqlx::query(
            r#"
            INSERT INTO authentication_pairs (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO UPDATE SET password_hash = EXCLUDED.password_hash
            "#,
        )
        .bind(&pair.username)
        .bind(&pair.password_hash)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(())
    }

    async fn rename_pair(&self, old_username: &str, new_username: &str) -> DatabaseResult<bool> {
        info!("Renaming credentials from {} to {}", old_username, new_username);

        let result = sqlx::query("UPDATE authentication_pairs SET username = $2 WHERE username = $1")
            .bind(old_username)
            .bind(new_username)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_pair(&self, username: &str) -> DatabaseResult<Option<AuthenticationPair>> {
        sqlx::query_as::<_, AuthenticationPair>(
            "SELECT username, password_hash FROM authentication_pairs WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }
}

//! Match repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

use super::MatchStore;
use crate::models::Match;

/// Postgres-backed match repository
#[derive(Clone)]
pub struct MatchRepository {
    pool: PgPool,
}

impl MatchRepository {
    /// Create a new match repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for MatchRepository {
    async fn find_by_user(&self, user_id: i32) -> DatabaseResult<Vec<Match>> {
        info!("Finding matches for user: {}", user_id);

        sqlx::query_as::<_, Match>(
            r#"
            SELECT id, user1_id, user2_id, created_at
            FROM matches
            WHERE user1_id = $1 OR user2_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }
}

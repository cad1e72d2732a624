//! User repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, warn};

use super::UserStore;
use crate::models::{NewUser, User, UserFilter, UserPatch, UserStatus};

const USER_COLUMNS: &str = "id, username, status, gender, location, gift_type, interests, \
                            price_min, price_max, signup_date, last_updated";

/// Postgres-backed user repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<Option<i32>> {
        info!("Creating new user: {:?}", new_user.username);

        let result = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (username, status, gender, location, gift_type, interests, price_min, price_max)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&new_user.username)
        .bind(new_user.status)
        .bind(new_user.gender)
        .bind(&new_user.location)
        .bind(new_user.gift_type)
        .bind(&new_user.interests)
        .bind(new_user.price_min)
        .bind(new_user.price_max)
        .fetch_one(&self.pool)
        .await;

        match result.map_err(DatabaseError::from_query) {
            Ok(id) => Ok(Some(id)),
            Err(DatabaseError::UniqueViolation(constraint)) => {
                warn!("User insert rejected: {}", constraint);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<User>> {
        info!("Finding user by ID: {}", id);

        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn get_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        info!("Finding user by username: {}", username);

        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    async fn update(&self, id: i32, patch: &UserPatch) -> DatabaseResult<()> {
        info!("Updating user: {}", id);

        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE users SET last_updated = NOW()");

        if let Some(username) = patch.username.as_optional_text() {
            query.push(", username = ").push_bind(username.map(str::to_string));
        }
        if let Some(status) = patch.status.as_set() {
            query.push(", status = ").push_bind(*status);
        }
        if let Some(gender) = patch.gender.as_set() {
            query.push(", gender = ").push_bind(*gender);
        }
        if let Some(location) = patch.location.as_optional_text() {
            query.push(", location = ").push_bind(location.map(str::to_string));
        }
        if let Some(gift_type) = patch.gift_type.as_set() {
            query.push(", gift_type = ").push_bind(*gift_type);
        }
        if let Some(interests) = patch.interests.as_optional_text() {
            query.push(", interests = ").push_bind(interests.map(str::to_string));
        }
        if let Some(price_min) = patch.price_min.as_set() {
            query.push(", price_min = ").push_bind(*price_min);
        }
        if let Some(price_max) = patch.price_max.as_set() {
            query.push(", price_max = ").push_bind(*price_max);
        }
        query.push(" WHERE id = ").push_bind(id);

        query
            .build()
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(())
    }

    async fn search(&self, filter: &UserFilter) -> DatabaseResult<Vec<User>> {
        info!("Searching users: {:?}", filter);

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM users WHERE status <> ",
            USER_COLUMNS
        ));
        query.push_bind(UserStatus::DELETED);

        if let Some(username) = &filter.username {
            query.push(" AND username = ").push_bind(username.clone());
        }
        if let Some(gender) = filter.gender {
            query.push(" AND gender = ").push_bind(gender);
        }
        if let Some(location) = &filter.location {
            query.push(" AND location ILIKE ").push_bind(like_pattern(location));
        }
        if let Some(gift_type) = filter.gift_type {
            query.push(" AND gift_type = ").push_bind(gift_type);
        }
        if let Some(interests) = &filter.interests {
            query.push(" AND interests ILIKE ").push_bind(like_pattern(interests));
        }
        if let Some(price_min) = filter.price_min {
            query.push(" AND price_max >= ").push_bind(price_min);
        }
        if let Some(price_max) = filter.price_max {
            query.push(" AND price_min <= ").push_bind(price_max);
        }
        query.push(" ORDER BY id");

        query
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }
}

/// Substring pattern for ILIKE with the wildcard characters escaped
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

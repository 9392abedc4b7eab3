//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use packrat_core::{defaults, Error, Result, User, UserRepository};

/// SQLite implementation of UserRepository.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new SqliteUserRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn ensure(
        &self,
        user_id: i64,
        username: Option<&str>,
        first_name: Option<&str>,
        language: &str,
    ) -> Result<()> {
        let now = Utc::now().naive_utc();

        // First write wins: re-registration never overwrites the stored
        // handle, name, or language.
        let result = sqlx::query(
            "INSERT OR IGNORE INTO users (user_id, username, first_name, language, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(username)
        .bind(first_name)
        .bind(language)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() > 0 {
            debug!(
                subsystem = "database",
                component = "users",
                op = "ensure",
                user_id,
                "Registered new user"
            );
        }
        Ok(())
    }

    async fn set_language(&self, user_id: i64, language: &str) -> Result<()> {
        sqlx::query("UPDATE users SET language = ? WHERE user_id = ?")
            .bind(language)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn language(&self, user_id: i64) -> Result<String> {
        let row = sqlx::query("SELECT language FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row
            .map(|r| r.get("language"))
            .unwrap_or_else(|| defaults::LANGUAGE.to_string()))
    }

    async fn get(&self, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, username, first_name, language, created_at
             FROM users
             WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(user)
    }
}

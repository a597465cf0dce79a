use service_core::error::AppError;
use tracing::{info, instrument};

use super::{is_unique_violation, Database};
use crate::models::User;
use crate::services::metrics::DB_QUERY_DURATION;
use crate::utils::PasswordHashString;

impl Database {
    /// Create a user. A taken email is a 400, matching the signup contract.
    #[instrument(skip(self, name, password_hash))]
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &PasswordHashString,
    ) -> Result<User, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_user"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password, created_utc
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::BadRequest(anyhow::anyhow!("Email already registered"))
            } else {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create user: {}", e))
            }
        })?;

        timer.observe_duration();

        info!(user_id = user.id, "User registered");

        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_user_by_email"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, created_utc FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to fetch user: {}", e)))?;

        timer.observe_duration();

        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_user_by_id"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, created_utc FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to fetch user: {}", e)))?;

        timer.observe_duration();

        Ok(user)
    }
}

//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Stored user row. Carries the password hash, so it is never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_utc: DateTime<Utc>,
}

/// User as returned over the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SanitizedUser {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Ravi Kumar")]
    pub name: String,
    #[schema(example = "ravi@example.com")]
    pub email: String,
}

impl From<User> for SanitizedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

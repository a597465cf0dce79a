use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::limits::non_blank;
use crate::models::SanitizedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 255, message = "All fields are required"),
        custom(function = "non_blank", message = "All fields are required")
    )]
    #[schema(example = "Ravi Kumar")]
    pub name: String,

    #[serde(default)]
    #[validate(
        length(min = 1, max = 255, message = "All fields are required"),
        email(message = "Invalid email format")
    )]
    #[schema(example = "ravi@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required"))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    #[schema(example = "User registered successfully")]
    pub message: String,
    #[schema(example = 1)]
    pub user_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    #[schema(example = "ravi@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the token expires.
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub user: SanitizedUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_requires_every_field() {
        let req: SignupRequest =
            serde_json::from_str(r#"{"email":"a@b.test","password":"pw"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn signup_checks_email_shape() {
        let req: SignupRequest =
            serde_json::from_str(r#"{"name":"A","email":"not-an-email","password":"pw"}"#)
                .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn complete_signup_is_valid() {
        let req: SignupRequest =
            serde_json::from_str(r#"{"name":"A","email":"a@b.test","password":"pw"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let req: SignupRequest =
            serde_json::from_str(r#"{"name":"  ","email":"a@b.test","password":"pw"}"#).unwrap();
        assert!(req.validate().is_err());
    }
}

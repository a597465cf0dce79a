use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

/// Issues and checks HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl AccessTokenClaims {
    pub fn user_id(&self) -> Result<i64, anyhow::Error> {
        self.sub
            .parse()
            .map_err(|_| anyhow::anyhow!("Token subject is not a user id"))
    }
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours: config.expiry_hours,
        }
    }

    /// Token lifetime in seconds, as reported to clients.
    pub fn expires_in(&self) -> i64 {
        Duration::hours(self.expiry_hours).num_seconds()
    }

    pub fn generate_access_token(&self, user_id: i64, email: &str) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode access token: {}", e))
    }

    pub fn validate_access_token(
        &self,
        token: &str,
    ) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<AccessTokenClaims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn service(secret: &str, expiry_hours: i64) -> JwtService {
        JwtService::new(&JwtConfig {
            secret: Secret::new(secret.to_string()),
            expiry_hours,
        })
    }

    #[test]
    fn issued_token_validates() {
        let jwt = service("test-secret", 24);
        let token = jwt.generate_access_token(42, "owner@garage.test").unwrap();

        let claims = jwt.validate_access_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.email, "owner@garage.test");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = service("one", 24).generate_access_token(1, "a@b.test").unwrap();
        assert!(service("two", 24).validate_access_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service("test-secret", -2);
        let token = jwt.generate_access_token(1, "a@b.test").unwrap();
        assert!(jwt.validate_access_token(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(service("s", 1).validate_access_token("not.a.jwt").is_err());
    }

    #[test]
    fn expires_in_is_seconds() {
        assert_eq!(service("s", 2).expires_in(), 7200);
    }
}

//! Configuration module for garage-service.

use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct GarageConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub expiry_hours: i64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// When false, only `/user` requires a bearer token.
    pub require_auth: bool,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl GarageConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let environment: Environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "dev".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let config = Self {
            common,
            environment,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "garage-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            database: DatabaseConfig {
                url: Secret::new(required("DATABASE_URL")?),
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10),
                min_connections: parse_or("DATABASE_MIN_CONNECTIONS", 2),
            },
            jwt: JwtConfig {
                secret: Secret::new(required("JWT_SECRET")?),
                expiry_hours: parse_or("JWT_EXPIRY_HOURS", 24),
            },
            security: SecurityConfig {
                require_auth: env::var("REQUIRE_AUTH")
                    .map(|v| parse_bool(&v))
                    .unwrap_or(false),
                allowed_origins: parse_origins(
                    &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
                ),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt.expiry_hours <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_EXPIRY_HOURS must be positive"
            )));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_MIN_CONNECTIONS cannot exceed DATABASE_MAX_CONNECTIONS"
            )));
        }

        if self.environment == Environment::Prod && self.security.allowed_origins.is_empty() {
            tracing::warn!("CORS allows any origin in production");
        }

        Ok(())
    }

    pub fn swagger_enabled(&self) -> bool {
        self.environment == Environment::Dev
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::ConfigError(anyhow::anyhow!("{} is required", key)))
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Comma separated origin list; `*` (or nothing) allows any origin.
pub fn parse_origins(value: &str) -> Vec<String> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GarageConfig {
        GarageConfig {
            common: core_config::Config::ephemeral(),
            environment: Environment::Dev,
            service_name: "garage-service".to_string(),
            service_version: "test".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
            database: DatabaseConfig {
                url: Secret::new("postgres://localhost/garage".to_string()),
                max_connections: 10,
                min_connections: 2,
            },
            jwt: JwtConfig {
                secret: Secret::new("secret".to_string()),
                expiry_hours: 24,
            },
            security: SecurityConfig {
                require_auth: false,
                allowed_origins: Vec::new(),
            },
        }
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Prod));
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Dev));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn wildcard_origin_means_any() {
        assert!(parse_origins("*").is_empty());
        assert!(parse_origins("http://a.test, *").is_empty());
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn origin_list_is_trimmed() {
        assert_eq!(
            parse_origins(" http://a.test ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn bool_flags() {
        assert!(parse_bool("true"));
        assert!(parse_bool(" 1 "));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("nope"));
    }

    #[test]
    fn rejects_non_positive_expiry() {
        let mut config = config();
        config.jwt.expiry_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let mut config = config();
        config.database.min_connections = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn swagger_only_in_dev() {
        let mut config = config();
        assert!(config.swagger_enabled());
        config.environment = Environment::Prod;
        assert!(!config.swagger_enabled());
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("postgres://localhost/garage"));
    }
}

//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Base URL of the asset store; `None` means removals are only logged
    pub asset_base_url: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("asset_base_url", &self.asset_base_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            asset_base_url: env::var("ASSET_BASE_URL").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Build a configuration with an explicit secret, bypassing the environment.
    ///
    /// Used by tests and tooling that must not depend on process state.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            asset_base_url: None,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::with_secret("a-very-long-secret-used-only-in-tests");
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("a-very-long-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_server_addr() {
        let mut config = Config::with_secret("a-very-long-secret-used-only-in-tests");
        config.server_host = "127.0.0.1".to_string();
        config.server_port = 8080;

        assert_eq!(config.server_addr(), "127.0.0.1:8080");
    }
}

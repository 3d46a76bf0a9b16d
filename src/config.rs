use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_origin: String,
    pub jwt_secret: SecretString,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_secret: SecretString::from(env::var("JWT_SECRET").unwrap_or_default()),
            access_token_ttl_seconds: env::var("ACCESS_TOKEN_TTL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(86_400),
            refresh_token_ttl_seconds: env::var("REFRESH_TOKEN_TTL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(604_800),
        }
    }

    /// Validate startup-critical configuration.
    ///
    /// A missing or weak signing secret is fatal: the process must refuse to
    /// serve authenticated routes rather than run with a weak key.
    pub fn validate(&self) -> AppResult<()> {
        let secret = self.jwt_secret.expose_secret();

        if secret.trim().is_empty() {
            return Err(AppError::Config(
                "JWT_SECRET is not set. Set it to a secure random string.".to_string(),
            ));
        }

        // HS256 needs at least 256 bits of key material
        if secret.len() < 32 {
            return Err(AppError::Config(format!(
                "JWT_SECRET is too short ({} bytes). Must be at least 32 bytes.",
                secret.len()
            )));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_origin: "http://localhost:5173".to_string(),
            jwt_secret: SecretString::from(
                "test_jwt_secret_key_that_is_long_enough".to_string(),
            ),
            access_token_ttl_seconds: 3600,
            refresh_token_ttl_seconds: 604_800,
        }
    }
}

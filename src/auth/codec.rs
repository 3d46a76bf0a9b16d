use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::{
    auth::claims::{TokenClaims, TokenKind, UserRole},
    config::Config,
    errors::{AppError, AppResult},
};

/// Per-token parse failure. Never crosses the HTTP boundary as-is: the
/// validator folds both variants into the same generic verdict so callers
/// cannot tell which check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    Signature,

    #[error("malformed token")]
    Malformed,
}

/// Creates and parses signed bearer tokens. Pure and stateless; expiry is a
/// fact it reports, not a policy it enforces (see [`TokenCodec::is_expired`]).
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl TokenCodec {
    /// Fails with [`AppError::Config`] when the signing secret is unset or
    /// shorter than 32 bytes. Callers treat this as fatal at startup.
    pub fn new(config: &Config) -> AppResult<Self> {
        config.validate()?;

        let secret_bytes = config.jwt_secret.expose_secret().as_bytes();

        // Expiry is checked by the validator so it can report Expired as a
        // distinct verdict; jsonwebtoken must not reject it first.
        let mut validation = Validation::default();
        validation.validate_exp = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation,
            access_ttl_seconds: config.access_token_ttl_seconds,
            refresh_ttl_seconds: config.refresh_token_ttl_seconds,
        })
    }

    pub fn issue(&self, subject: &str, role: UserRole, kind: TokenKind) -> AppResult<String> {
        if subject.trim().is_empty() {
            return Err(AppError::Internal(
                "Cannot issue a token for an empty subject".to_string(),
            ));
        }

        let ttl = match kind {
            TokenKind::Access => self.access_ttl_seconds,
            TokenKind::Refresh => self.refresh_ttl_seconds,
        };
        let claims = TokenClaims::new(subject, role, kind, ttl);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verifies the signature and decodes the claims. Does not reject on
    /// expiry; an expired but genuine token still parses.
    pub fn parse(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::Signature,
                _ => TokenError::Malformed,
            })
    }

    /// Expiry is strict: a token expiring this exact second is still live.
    pub fn is_expired(&self, claims: &TokenClaims) -> bool {
        (claims.exp as i64) < Utc::now().timestamp()
    }
}

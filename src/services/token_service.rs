use std::sync::Arc;

use serde::Serialize;

use crate::{
    auth::{
        claims::{TokenKind, UserRole},
        codec::TokenCodec,
        revocation::RevocationStore,
        validator::{TokenValidator, Verdict},
    },
    errors::{AppError, AppResult},
};

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Result of a successful refresh rotation: the fresh pair plus the identity
/// carried by the old refresh token.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub token: String,
    pub refresh_token: String,
    pub subject: String,
    pub role: UserRole,
}

/// Lifecycle entry points consumed by the authentication collaborator that
/// owns credential checking: issue a pair after login, rotate it on refresh,
/// revoke it on logout.
pub struct TokenService {
    codec: Arc<TokenCodec>,
    revocation: Arc<dyn RevocationStore>,
    validator: Arc<TokenValidator>,
}

impl TokenService {
    pub fn new(
        codec: Arc<TokenCodec>,
        revocation: Arc<dyn RevocationStore>,
        validator: Arc<TokenValidator>,
    ) -> Self {
        Self {
            codec,
            revocation,
            validator,
        }
    }

    pub fn issue_pair(&self, subject: &str, role: UserRole) -> AppResult<TokenPair> {
        let token = self.codec.issue(subject, role, TokenKind::Access)?;
        let refresh_token = self.codec.issue(subject, role, TokenKind::Refresh)?;

        Ok(TokenPair {
            token,
            refresh_token,
        })
    }

    /// Single-use rotation: the presented refresh token is revoked before the
    /// new pair is handed out, so replaying it fails as revoked.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshOutcome> {
        let (subject, role) = match self.validator.validate_refresh(refresh_token).await {
            Verdict::Valid { subject, role } => (subject, role),
            Verdict::Expired { reason } => return Err(AppError::ExpiredToken(reason)),
            Verdict::Invalid { reason } => return Err(AppError::InvalidToken(reason)),
        };

        self.revocation.revoke(refresh_token).await;

        let pair = self.issue_pair(&subject, role)?;
        log::info!("Rotated token pair for {}", subject);

        Ok(RefreshOutcome {
            token: pair.token,
            refresh_token: pair.refresh_token,
            subject,
            role,
        })
    }

    /// Best-effort: revokes the exact presented string. Subsequent
    /// validations of that string fail regardless of its signature.
    pub async fn logout(&self, access_token: &str) {
        self.revocation.revoke(access_token).await;
        log::info!("Token revoked on logout");
    }
}

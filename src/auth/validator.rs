use std::sync::Arc;

use crate::auth::{
    claims::{TokenKind, UserRole},
    codec::TokenCodec,
    revocation::RevocationStore,
};

/// Tri-state outcome of validation. `Expired` is distinguished from the
/// general invalid case so clients know to attempt a refresh rather than
/// re-authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid { subject: String, role: UserRole },
    Invalid { reason: String },
    Expired { reason: String },
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid { .. })
    }
}

/// Combines the codec's signature/expiry facts with the revocation store
/// into a single verdict per token kind.
pub struct TokenValidator {
    codec: Arc<TokenCodec>,
    revocation: Arc<dyn RevocationStore>,
}

impl TokenValidator {
    pub fn new(codec: Arc<TokenCodec>, revocation: Arc<dyn RevocationStore>) -> Self {
        Self { codec, revocation }
    }

    pub async fn validate_access(&self, token: &str) -> Verdict {
        self.validate(token, TokenKind::Access).await
    }

    pub async fn validate_refresh(&self, token: &str) -> Verdict {
        self.validate(token, TokenKind::Refresh).await
    }

    /// The access and refresh paths are one algorithm parameterized by the
    /// expected kind. The kind lives inside the signed payload, so the
    /// type check itself is tamper-proof.
    async fn validate(&self, token: &str, expected: TokenKind) -> Verdict {
        if token.trim().is_empty() {
            return Verdict::Invalid {
                reason: "empty token".to_string(),
            };
        }

        // Revocation beats everything else; a revoked token is never parsed.
        if self.revocation.is_revoked(token).await {
            log::debug!("Rejected revoked {} token", expected);
            return Verdict::Invalid {
                reason: "token has been revoked".to_string(),
            };
        }

        let claims = match self.codec.parse(token) {
            Ok(claims) => claims,
            Err(e) => {
                // Logged with the specific cause; the verdict stays generic
                // so callers cannot probe which check failed.
                log::debug!("Token rejected: {}", e);
                return Verdict::Invalid {
                    reason: "invalid token format".to_string(),
                };
            }
        };

        if claims.kind != expected {
            return Verdict::Invalid {
                reason: format!("wrong token type, expected {}", expected),
            };
        }

        // Checked only after the kind matches, so a type-confused probe
        // learns nothing about expiry.
        if self.codec.is_expired(&claims) {
            return Verdict::Expired {
                reason: "token has expired".to_string(),
            };
        }

        Verdict::Valid {
            subject: claims.sub,
            role: claims.role,
        }
    }
}

use std::fmt;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Role tag carried inside the signed payload. A single tag per token; role
/// permission matrices live with the routes, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Student,
    Teacher,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Student => write!(f, "STUDENT"),
            UserRole::Teacher => write!(f, "TEACHER"),
            UserRole::Admin => write!(f, "ADMIN"),
        }
    }
}

/// The two token kinds are cryptographically identical but never
/// interchangeable: the kind is signed along with everything else, so a
/// leaked refresh token cannot be replayed as an access credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // Subject (normalized email)
    pub role: UserRole,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

impl TokenClaims {
    pub fn new(subject: &str, role: UserRole, kind: TokenKind, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_seconds);

        Self {
            sub: subject.to_string(),
            role,
            kind,
            // Pre-epoch timestamps would wrap when narrowed to usize; clamp
            // them so a misconfigured TTL yields an expired token instead of
            // one that never expires.
            iat: now.timestamp().max(0) as usize,
            exp: exp.timestamp().max(0) as usize,
        }
    }
}

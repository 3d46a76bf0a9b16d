pub mod claims;
pub mod codec;
pub mod middleware;
pub mod revocation;
pub mod validator;

pub use claims::{TokenClaims, TokenKind, UserRole};
pub use codec::{TokenCodec, TokenError};
pub use middleware::{AuthGate, AuthenticatedUser};
pub use revocation::{InMemoryRevocationStore, RevocationStore};
pub use validator::{TokenValidator, Verdict};

use std::sync::Arc;

use crate::{
    auth::{
        codec::TokenCodec,
        revocation::{InMemoryRevocationStore, RevocationStore},
        validator::TokenValidator,
    },
    config::Config,
    errors::AppResult,
    services::token_service::TokenService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub codec: Arc<TokenCodec>,
    pub revocation: Arc<dyn RevocationStore>,
    pub validator: Arc<TokenValidator>,
    pub token_service: Arc<TokenService>,
}

impl AppState {
    /// Wires the token subsystem. Fails when the signing configuration is
    /// unusable; the caller must refuse to serve rather than continue.
    pub fn new(config: Config) -> AppResult<Self> {
        let codec = Arc::new(TokenCodec::new(&config)?);
        let revocation: Arc<dyn RevocationStore> = Arc::new(InMemoryRevocationStore::new());
        let validator = Arc::new(TokenValidator::new(
            Arc::clone(&codec),
            Arc::clone(&revocation),
        ));
        let token_service = Arc::new(TokenService::new(
            Arc::clone(&codec),
            Arc::clone(&revocation),
            Arc::clone(&validator),
        ));

        Ok(Self {
            config: Arc::new(config),
            codec,
            revocation,
            validator,
            token_service,
        })
    }
}

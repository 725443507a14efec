// state.rs
use std::sync::Arc;

use crate::{
    auth::{CredentialVerifier, DemoCredentials, SessionStore},
    config::AppConfig,
    store::WalletStore,
};

/// Shared application state, handed to every handler through `State`.
pub struct AppState {
    pub config: AppConfig,
    pub store: WalletStore,
    pub sessions: SessionStore,
    pub verifier: Box<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new(config: AppConfig, store: WalletStore, verifier: Box<dyn CredentialVerifier>) -> Arc<Self> {
        let sessions = SessionStore::new(config.session_ttl);
        Arc::new(Self {
            config,
            store,
            sessions,
            verifier,
        })
    }

    /// Demo account from the config and the seeded store.
    /// The clear-text password is dropped once the verifier holds its digest.
    pub fn demo(mut config: AppConfig) -> Arc<Self> {
        let password = std::mem::take(&mut config.demo_password);
        let verifier = DemoCredentials::new(config.demo_user.clone(), &password);
        Self::new(config, WalletStore::seeded(), Box::new(verifier))
    }
}

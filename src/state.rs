use std::sync::Arc;

use crate::auth::{build_authenticator, Authenticator, PasswordHasher};
use crate::config::AppConfig;
use crate::database::Store;

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub authenticator: Arc<dyn Authenticator>,
    pub hasher: PasswordHasher,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        let authenticator = build_authenticator(&config.security);
        let hasher = PasswordHasher::new(config.security.bcrypt_cost);

        Self {
            store,
            authenticator,
            hasher,
            config: Arc::new(config),
        }
    }
}

use std::sync::Arc;

use common::storage::BlobStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::utils::jwt::TokenKeys;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub blob_store: Arc<dyn BlobStore>,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig, blob_store: Arc<dyn BlobStore>) -> Self {
        let tokens = TokenKeys::new(
            &config.auth.jwt_secret,
            chrono::Duration::minutes(config.auth.token_ttl_minutes),
        );
        Self {
            db,
            config,
            blob_store,
            tokens,
        }
    }
}

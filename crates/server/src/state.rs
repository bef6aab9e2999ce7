use std::sync::Arc;

use configs::{AppConfig, PaginationConfig};
use sea_orm::DatabaseConnection;
use service::media::MediaStorage;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub media: Arc<MediaStorage>,
    pub pagination: PaginationConfig,
    /// Origins trusted for state-changing requests, without trailing `/`.
    pub allowed_origins: Arc<Vec<String>>,
    pub max_upload_bytes: usize,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, cfg: &AppConfig) -> Self {
        Self {
            db,
            media: Arc::new(MediaStorage::from_config(&cfg.media)),
            pagination: cfg.pagination,
            allowed_origins: Arc::new(cfg.server.allowed_origins.clone()),
            max_upload_bytes: cfg.media.max_upload_bytes,
        }
    }
}

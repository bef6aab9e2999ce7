//! On-disk storage for uploaded advertisement images.
//!
//! Files are written under `<root>/ads/` with a random prefix so that two
//! uploads of `photo.jpg` never overwrite each other. The database keeps the
//! path relative to `root`; [`MediaStorage::url`] turns it into a public URL.

use std::path::{Path, PathBuf};

use configs::MediaConfig;
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;

pub const UPLOAD_DIR: &str = "ads";
const MAX_NAME_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    url_prefix: String,
    public_base_url: String,
}

impl MediaStorage {
    pub fn new<P: Into<PathBuf>>(root: P, url_prefix: &str, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(cfg: &MediaConfig) -> Self {
        Self::new(&cfg.root, &cfg.url_prefix, &cfg.public_base_url)
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn url_prefix(&self) -> &str { &self.url_prefix }

    /// Public URL of a stored relative path.
    pub fn url(&self, rel: &str) -> String {
        format!("{}{}/{}", self.public_base_url, self.url_prefix, rel.trim_start_matches('/'))
    }

    /// Validate and persist an uploaded image; returns its path relative to the media root.
    pub async fn save_image(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, ServiceError> {
        if bytes.is_empty() {
            return Err(ServiceError::Validation("uploaded image is empty".into()));
        }
        match content_type {
            Some(ct) if ct.trim().to_ascii_lowercase().starts_with("image/") => {}
            Some(ct) => return Err(ServiceError::Validation(format!("unsupported content type {ct:?}, expected image/*"))),
            None => return Err(ServiceError::Validation("image content type missing".into())),
        }

        let name = sanitize_filename(original_name.unwrap_or_default());
        let rel = format!("{UPLOAD_DIR}/{}_{}", Uuid::new_v4().simple(), name);
        let dir = self.root.join(UPLOAD_DIR);
        fs::create_dir_all(&dir).await?;
        fs::write(self.root.join(&rel), bytes).await?;
        info!(path = %rel, size = bytes.len(), "image_stored");
        Ok(rel)
    }
}

/// Reduce a client-supplied file name to a safe basename.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .take(MAX_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() { "image".to_string() } else { cleaned }
}

//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::info;

/// Ensure the media directory (and its upload subdirectory) exists.
pub async fn ensure_media_dir(media_root: &str, upload_subdir: &str) -> anyhow::Result<()> {
    let path = std::path::Path::new(media_root).join(upload_subdir);
    tokio::fs::create_dir_all(&path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", path.display()))?;
    info!(media_root, "media directory ready");
    Ok(())
}

//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the uploads directory exists and is writable.
pub async fn ensure_uploads_dir(dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    let meta = tokio::fs::metadata(dir).await?;
    if meta.permissions().readonly() {
        warn!(dir = %dir.display(), "uploads directory is read-only; logo uploads will fail");
    }
    info!(dir = %dir.display(), "uploads directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_nested_uploads_dir() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("common_env_{}", uuid::Uuid::new_v4()));
        let nested = root.join("a").join("uploads");
        ensure_uploads_dir(&nested).await?;
        assert!(tokio::fs::metadata(&nested).await?.is_dir());
        // second call is a no-op
        ensure_uploads_dir(&nested).await?;
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}

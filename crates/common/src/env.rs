//! Environment/runtime helpers
//!
//! Sanity checks run by binaries before the session store is opened.

use std::path::Path;

use tracing::warn;

/// Ensure the directory holding a file-backed store exists.
pub async fn ensure_parent_dir(file: &str) -> anyhow::Result<()> {
    let Some(parent) = Path::new(file).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if tokio::fs::metadata(parent).await.is_err() {
        warn!(dir = %parent.display(), "session directory missing; creating it");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    Ok(())
}

//! Environment/runtime helpers used at startup.

/// Deployment environment name from `APP_ENV`, defaulting to `development`.
pub fn app_environment() -> String {
    std::env::var("APP_ENV")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "development".to_string())
}

/// Make sure a writable directory exists (used for the SQLite dev database).
pub async fn ensure_dir(dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    Ok(())
}

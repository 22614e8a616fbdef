use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use common::env as app_env;
use configs::{AppConfig, DatabaseConfig};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::{routes, state::AppState};

/// Directory holding a file-backed SQLite database, if any.
fn sqlite_dir(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite:")?;
    let rest = rest.trim_start_matches("//");
    let path = rest.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path).parent().and_then(|p| p.to_str()).filter(|p| !p.is_empty())
}

/// Connect the pool and bring the schema up to date when enabled.
pub async fn prepare_database(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    if let Some(dir) = sqlite_dir(&cfg.url) {
        app_env::ensure_dir(dir).await?;
    }
    let db = models::db::connect_with_config(cfg).await?;
    if cfg.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    } else {
        warn!("RUN_MIGRATIONS disabled; assuming schema is current");
    }
    Ok(db)
}

/// Public entry: build the app from an already loaded config and run the HTTP server.
/// Logging and `.env` are the caller's job.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let environment = app_env::app_environment();
    let db = prepare_database(&cfg.database).await?;

    let app: Router = routes::build_router(AppState::new(db, environment.clone()));

    let addr: SocketAddr = cfg.bind_addr().parse()?;
    info!(%addr, %environment, "starting fundx server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, sqlite_dir};
    use configs::{AppConfig, DatabaseConfig, ServerConfig};

    #[test]
    fn sqlite_dir_only_for_file_databases() {
        assert_eq!(sqlite_dir("sqlite://data/fundx.db?mode=rwc"), Some("data"));
        assert_eq!(sqlite_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_dir("sqlite://fundx.db"), None);
        assert_eq!(sqlite_dir("postgres://localhost/fundx"), None);
    }

    #[tokio::test]
    async fn run_uses_the_config_it_is_given() {
        let cfg = AppConfig {
            server: ServerConfig { host: "not a host".into(), port: 8080, worker_threads: None },
            database: DatabaseConfig {
                url: "sqlite::memory:".into(),
                max_connections: 1,
                min_connections: 1,
                ..DatabaseConfig::default()
            },
        };
        // schema comes up on the in-memory db, then the bad host fails the bind parse
        let err = run(cfg).await.unwrap_err();
        assert!(err.to_string().contains("invalid socket address"), "{err}");
    }
}

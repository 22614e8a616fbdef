use std::sync::Arc;
use std::time::Instant;

use sea_orm::DatabaseConnection;
use service::profile::repo::seaorm::SeaOrmProfileRepository;
use service::profile::ProfileService;

/// Shared handler state. Cloned per request; everything inside is a handle.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub profiles: Arc<ProfileService<SeaOrmProfileRepository>>,
    pub started_at: Instant,
    pub environment: String,
}

impl AppState {
    pub fn new(db: DatabaseConnection, environment: impl Into<String>) -> Self {
        let repo = Arc::new(SeaOrmProfileRepository::new(db.clone()));
        Self {
            profiles: Arc::new(ProfileService::new(repo)),
            db,
            started_at: Instant::now(),
            environment: environment.into(),
        }
    }
}

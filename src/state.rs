use std::sync::Arc;

use anyhow::Context;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::config::AppConfig;
use crate::storage::{LocalUploads, UploadStore};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub uploads: Arc<dyn UploadStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = SqlitePoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let uploads =
            Arc::new(LocalUploads::new(&config.upload_dir).await?) as Arc<dyn UploadStore>;

        Ok(Self {
            db,
            config,
            uploads,
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        uploads: Arc<dyn UploadStore>,
    ) -> Self {
        Self {
            db,
            config,
            uploads,
        }
    }

    /// In-memory state for tests: single-connection SQLite (each connection
    /// to `sqlite::memory:` is its own database), migrations applied, uploads
    /// in a throwaway temp directory.
    #[cfg(test)]
    pub(crate) async fn for_tests(tag: &str) -> Self {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .expect("run migrations");

        let dir = std::env::temp_dir().join(format!(
            "snapbook-test-{tag}-{}",
            time::OffsetDateTime::now_utc().unix_timestamp_nanos()
        ));
        let uploads =
            Arc::new(LocalUploads::new(&dir).await.expect("temp uploads")) as Arc<dyn UploadStore>;

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            upload_dir: dir,
            session_ttl: std::time::Duration::from_secs(24 * 60 * 60),
            cookie_secure: false,
        });

        Self {
            db,
            config,
            uploads,
        }
    }
}

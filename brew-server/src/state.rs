//! Application state for brew-server

use std::sync::Arc;

use shared::credentials::CredentialHasher;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::{Argon2Hasher, JwtConfig, JwtService};
use crate::config::Config;
use crate::storage::{BlobStore, LocalBlobStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Access token issuing and checking (with the revocation list)
    pub jwt: Arc<JwtService>,
    /// Password hashing
    pub hasher: Arc<dyn CredentialHasher>,
    /// Upload storage
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    /// Connect, migrate and provision storage
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let blobs = LocalBlobStore::open(&config.upload_root, &config.public_base_url)?;
        tracing::info!(root = %config.upload_root, "Upload storage ready");

        Ok(Self::from_parts(
            pool,
            JwtService::new(JwtConfig {
                secret: config.jwt_secret.clone(),
                expires_secs: config.jwt_expires_secs,
            }),
            Arc::new(Argon2Hasher::new()),
            Arc::new(blobs),
        ))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        pool: PgPool,
        jwt: JwtService,
        hasher: Arc<dyn CredentialHasher>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            pool,
            jwt: Arc::new(jwt),
            hasher,
            blobs,
        }
    }
}

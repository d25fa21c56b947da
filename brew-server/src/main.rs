//! brew-server: brewery tour discovery and booking service
//!
//! Serves the public catalogue, the authenticated booking API and the admin
//! API over one HTTP listener.

use std::path::Path;
use std::time::Duration;

use brew_server::{AppState, Config, api, db};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// How often expired entries are dropped from the token revocation list
const REVOCATION_PRUNE_INTERVAL: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "brew_server=info,tower_http=info".into());
    if config.debug {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    }

    tracing::info!(
        "Starting brew-server (env: {}, db: {})",
        config.profile,
        config.redacted_database_url()
    );

    let state = AppState::new(&config).await?;

    if let Some(username) = &config.admin_username {
        promote_admin(&state, username).await?;
    }

    // Periodic revocation list cleanup
    let jwt = state.jwt.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(REVOCATION_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            let pruned = jwt.prune_revoked();
            if pruned > 0 {
                tracing::debug!(pruned, "Pruned revoked tokens");
            }
        }
    });

    let app = api::create_router(state, Path::new(&config.upload_root));

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("brew-server HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Grant admin rights to an existing account
async fn promote_admin(state: &AppState, username: &str) -> Result<(), BoxError> {
    match db::users::find_by_username(&state.pool, username).await? {
        Some(user) if user.is_admin => {}
        Some(user) => {
            db::users::set_admin(&state.pool, user.id, true).await?;
            tracing::info!(user_id = user.id, %username, "Promoted to admin");
        }
        None => tracing::warn!(%username, "ADMIN_USERNAME does not match any user"),
    }
    Ok(())
}

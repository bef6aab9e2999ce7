use std::{future::Future, net::SocketAddr};

use axum::Router;
use common::{env::ensure_media_dir, utils::logging::init_logging_from_env};
use configs::AppConfig;
use dotenvy::dotenv;
use sea_orm::DatabaseConnection;
use service::media::UPLOAD_DIR;
use tracing::info;

use crate::{errors::StartupError, routes, state::ServerState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_from_env();
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Router over an already migrated database.
pub fn build_app(db: DatabaseConnection, cfg: &AppConfig) -> Router {
    let state = ServerState::new(db, cfg);
    let cors = routes::build_cors(&state.allowed_origins);
    routes::build_router(state, cors)
}

/// Build the app and serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run_until<F>(shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    dotenv().ok();
    init_logging();

    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    ensure_media_dir(&cfg.media.root, UPLOAD_DIR).await?;

    // DB connection
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    models::db::migrate(&db).await?;

    let app = build_app(db, &cfg);

    // Bind and serve
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "classifieds server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("classifieds server stopped");
    Ok(())
}

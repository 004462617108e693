use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use carenest_api::{AppState, AppStateInner};
use carenest_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carenest=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("CARENEST_DB_PATH").unwrap_or_else(|_| "carenest.db".into());
    let host = std::env::var("CARENEST_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CARENEST_PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()?;
    let seed = std::env::var("CARENEST_SEED_FIXTURES")
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
        .unwrap_or(false);

    // Init database
    let db = Database::open(&PathBuf::from(&db_path))?;
    if seed {
        if db.is_empty()? {
            db.load_fixtures()?;
        } else {
            warn!("CARENEST_SEED_FIXTURES set but {} already has data; skipping", db_path);
        }
    }

    let app_state: AppState = Arc::new(AppStateInner { db });

    let app = carenest_api::router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Carenest server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, shutting down"),
        _ = terminate => warn!("Received SIGTERM, shutting down"),
    }
}

use kerfboard_core::CanvasState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Bridge port when `HTTP_PORT` is unset.
const DEFAULT_PORT: u16 = 8765;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kerfboard_server=info,tower_http=info".into()),
        )
        .init();

    let port = std::env::var("HTTP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let state = Arc::new(CanvasState::new());
    let app = kerfboard_server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Kerfboard bridge listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

use std::future::Future;

use axum::Router;
use configs::{AppConfig, ServerConfig};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

/// Any origin, any method, any header.
pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the configured store and wire repository -> service -> router.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let repo = service::message::repository::open(&cfg.database).await?;
    let state = ServerState::new(repo);
    Ok(routes::build_router(state, build_cors()))
}

/// Bind `host:port`. The host may be a name such as `localhost` or a bare
/// IPv4/IPv6 address.
pub async fn bind_listener(cfg: &ServerConfig) -> std::io::Result<TcpListener> {
    TcpListener::bind((cfg.host.as_str(), cfg.port)).await
}

/// Public entry: build the app and serve HTTP until `shutdown` resolves, then
/// drain in-flight requests.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;

    let listener = bind_listener(&cfg.server).await?;
    let addr = listener.local_addr()?;
    info!(%addr, backend = ?cfg.database.backend, "starting message board server");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped accepting connections");
    Ok(())
}

mod relay_service;
mod ws_handler;

pub use relay_service::RelayService;
pub use ws_handler::ws_handler;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

pub fn router(service: RelayService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(service)
}

/// Serves the relay on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, service: RelayService) -> std::io::Result<()> {
    info!("relay listening on {}", listener.local_addr()?);
    axum::serve(listener, router(service)).await
}

use anyhow::Result;
use duet_relay::{RelayService, serve};
use tokio::net::TcpListener;

/// Starts a relay on an ephemeral port. Returns its WebSocket URL.
pub async fn spawn_relay() -> Result<(String, RelayService)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("ws://{}/ws", listener.local_addr()?);
    let service = RelayService::new();

    tokio::spawn({
        let service = service.clone();
        async move {
            let _ = serve(listener, service).await;
        }
    });

    Ok((url, service))
}

/// Receives with a timeout so a missing frame fails the test instead of hanging.
pub async fn recv<T>(rx: &mut tokio::sync::mpsc::UnboundedReceiver<T>) -> Option<T> {
    tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv())
        .await
        .ok()
        .flatten()
}

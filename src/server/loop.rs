//! Server loop module
//!
//! Accepts connections until shutdown, then waits for in-flight ones to drain

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the connection counter
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` is cancelled.
///
/// Must run inside a `LocalSet`: connections are served with `spawn_local`.
/// After shutdown the listener is closed immediately and open connections get
/// `performance.shutdown_grace` seconds to finish.
pub async fn run_server(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &shutdown,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.cancelled() => break,
        }
    }

    drop(listener);

    let grace = Duration::from_secs(state.config.performance.shutdown_grace);
    let remaining = wait_for_drain(&active_connections, grace).await;
    logger::log_shutdown_complete(remaining);
    Ok(())
}

/// Wait until no connections remain or `grace` elapses; returns the count left
async fn wait_for_drain(active_connections: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 || tokio::time::Instant::now() >= deadline {
            return remaining;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_wait_for_drain_returns_early_when_idle() {
        let counter = AtomicUsize::new(0);
        assert_eq!(wait_for_drain(&counter, Duration::from_secs(30)).await, 0);
    }

    #[tokio::test]
    async fn test_wait_for_drain_gives_up_after_grace() {
        let counter = AtomicUsize::new(2);
        assert_eq!(wait_for_drain(&counter, Duration::from_millis(10)).await, 2);
    }

    #[tokio::test]
    async fn test_serves_over_tcp_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(test_config(&dir.path().join("blog_posts.json"))));
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(run_server(
                    listener,
                    Arc::clone(&state),
                    shutdown.clone(),
                ));

                let body = "title=Over+TCP";
                let response = raw_request(
                    addr,
                    &format!(
                        "POST /add HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
                         Content-Type: application/x-www-form-urlencoded\r\n\
                         Content-Length: {}\r\n\r\n{body}",
                        body.len()
                    ),
                )
                .await;
                assert!(response.starts_with("HTTP/1.1 302"), "{response}");

                let response = raw_request(
                    addr,
                    "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(response.starts_with("HTTP/1.1 200"), "{response}");
                assert!(response.contains("Over TCP"));

                shutdown.cancel();
                server.await.unwrap().unwrap();
            })
            .await;
    }
}

//! Server startup and graceful shutdown

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use axum::Router;
use orderly_core::Config;
use tokio::net::TcpListener;

/// Bind `0.0.0.0:SERVER_PORT` and serve `app` until SIGINT or SIGTERM.
pub async fn start_server(config: &Config, app: Router) -> io::Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(
        service = %config.log.service_name,
        app_env = %config.app_env,
        request_timeout_secs = config.request_timeout_secs,
        "Server ready and accepting connections"
    );

    serve_until(listener, app, async {
        let signal = wait_for_signal().await;
        tracing::info!(signal, "Shutdown signal received, draining connections");
    })
    .await
}

/// Serve on `listener` until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve_until<F>(listener: TcpListener, app: Router, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for SIGINT only");
            return interrupt().await;
        }
    };

    tokio::select! {
        name = interrupt() => name,
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    interrupt().await
}

/// Never resolves when the Ctrl+C handler cannot be installed
async fn interrupt() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "SIGINT handler unavailable");
        std::future::pending::<()>().await;
    }
    "SIGINT"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_serves_until_shutdown_then_returns() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/health", get(|| async { "OK" }));
        let (stop, stopped) = oneshot::channel::<()>();

        let server = tokio::spawn(serve_until(listener, app, async {
            let _ = stopped.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.ends_with("OK"));

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
        assert!(TcpStream::connect(addr).await.is_err());
    }
}

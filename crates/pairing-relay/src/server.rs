//! Accept loop: TCP accept, WebSocket upgrade on the configured path, one task per client.

use std::future::Future;

use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;

use crate::config::Config;
use crate::connection::handle_connection;
use crate::coordinator::Coordinator;
use crate::error::RelayError;

/// Bind the configured address and serve until Ctrl-C.
pub async fn run(config: Config) -> Result<(), RelayError> {
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| RelayError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!("pairing-relay listening on {} (path {})", addr, config.path);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    serve(listener, Coordinator::new(), &config, shutdown).await;
    tracing::info!("Shutting down");
    Ok(())
}

/// Accept connections on `listener` until `shutdown` resolves.
///
/// Connections already being served keep running on their own tasks.
pub async fn serve<F>(listener: TcpListener, coordinator: Coordinator, config: &Config, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let outbox_capacity = config.outbox_capacity as usize;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,

            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let coordinator = coordinator.clone();
                    let path = config.path.clone();
                    tokio::spawn(async move {
                        match accept_hdr_async(stream, |req: &Request, resp: Response| {
                            check_path(&path, req, resp)
                        })
                        .await
                        {
                            Ok(ws) => handle_connection(ws, addr, coordinator, outbox_capacity).await,
                            Err(source) => {
                                let err = RelayError::Handshake { peer: addr, source };
                                tracing::warn!(error = %err, "WS handshake failed");
                            }
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "TCP accept error");
                }
            },
        }
    }
}

/// Handshake callback: only upgrade requests for `path` are accepted.
fn check_path(path: &str, req: &Request, resp: Response) -> Result<Response, ErrorResponse> {
    if req.uri().path() == path {
        return Ok(resp);
    }
    tracing::debug!(requested = %req.uri().path(), "Upgrade refused, unknown path");
    let mut err = ErrorResponse::new(Some("Not Found".into()));
    *err.status_mut() = StatusCode::NOT_FOUND;
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> Request {
        Request::builder().uri(uri).body(()).unwrap()
    }

    #[test]
    fn matching_path_is_accepted() {
        assert!(check_path("/ws", &request("/ws"), Response::new(())).is_ok());
        assert!(check_path("/ws", &request("/ws?token=abc"), Response::new(())).is_ok());
    }

    #[test]
    fn other_paths_get_404() {
        for uri in ["/", "/ws/extra", "/index.html"] {
            let err = check_path("/ws", &request(uri), Response::new(())).unwrap_err();
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
        }
    }
}

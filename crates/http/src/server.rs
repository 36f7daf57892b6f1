//! TCP server plumbing: bind, accept, spawn a worker per connection.
//!
//! [`serve`] is the whole surface. It binds a listener, hands back a
//! [`Server`] handle immediately, and keeps accepting on a background task
//! until [`Server::close`] is called. Each accepted connection is served by
//! its own task; a failed or slow connection never stalls the others, and
//! closing the server never interrupts connections already being served.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::TcpListener;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::connection::HttpConnection;
use crate::handler::Handler;

/// Binds `0.0.0.0:<port>` and starts accepting connections.
///
/// Returns as soon as the listener is bound; failing to bind is the only
/// fatal error. Port `0` asks the OS for an ephemeral port, which
/// [`Server::local_addr`] reports. There is no cap on concurrent
/// connections: every accept spawns a fresh worker task.
pub async fn serve<H>(port: u16, handler: H) -> io::Result<Server>
where
    H: Handler + 'static,
{
    let listener = match TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(cause = %e, port, "bind server error");
            return Err(e);
        }
    };
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "start listening");

    let server = Server {
        local_addr,
        closed: Arc::new(AtomicBool::new(false)),
        shutdown: CancellationToken::new(),
    };

    tokio::spawn(accept_loop(
        listener,
        Arc::new(handler),
        Arc::clone(&server.closed),
        server.shutdown.clone(),
    ));

    Ok(server)
}

/// Handle to a running server.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl Server {
    /// The address the listener actually bound, port 0 already resolved.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting new connections. Idempotent.
    ///
    /// Only the listener goes away; workers for connections accepted
    /// before the close run to completion.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::Relaxed) {
            self.shutdown.cancel();
        }
    }
}

async fn accept_loop<H>(
    listener: TcpListener,
    handler: Arc<H>,
    closed: Arc<AtomicBool>,
    shutdown: CancellationToken,
) where
    H: Handler + 'static,
{
    loop {
        let accepted = select! {
            () = shutdown.cancelled() => {
                info!("server closed, stop accepting connections");
                return;
            }
            accepted = listener.accept() => accepted,
        };

        let (tcp_stream, remote_addr) = match accepted {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                // Accept errors after close just mean the listener is gone.
                if closed.load(Ordering::Relaxed) {
                    return;
                }
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::new(reader, writer);
            match connection.process(handler).await {
                Ok(()) => {
                    info!(peer = %remote_addr, "finished process, connection shutdown");
                }
                Err(e) => {
                    error!(peer = %remote_addr, cause = %e, "process error, connection shutdown");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
    use tokio::net::TcpStream;

    use crate::codec::ResponseWriter;
    use crate::protocol::{Request, StatusCode, default_headers};

    use super::*;

    struct RespondOk;

    #[async_trait]
    impl<W> Handler<W> for RespondOk
    where
        W: AsyncWrite + Send + Unpin,
    {
        async fn handle(&self, writer: &mut ResponseWriter<W>, request: &Request) {
            let body = format!("served {}", request.request_line.request_target);
            writer.write_status_line(StatusCode::OK).await.unwrap();
            writer.write_headers(&default_headers(body.len())).await.unwrap();
            writer.write_body(body.as_bytes()).await.unwrap();
        }
    }

    #[tokio::test]
    async fn serves_requests_over_tcp() {
        let server = serve(0, RespondOk).await.unwrap();
        let port = server.local_addr().port();
        assert_ne!(port, 0);

        let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        stream.write_all(b"GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n").await.unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        let response = String::from_utf8(response).unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with("served /hello"));

        server.close();
    }

    #[tokio::test]
    async fn malformed_requests_get_the_automatic_bad_request() {
        let server = serve(0, RespondOk).await.unwrap();
        let port = server.local_addr().port();

        let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        stream.write_all(b"definitely not http\r\n\r\n").await.unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        let response = String::from_utf8(response).unwrap();

        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(response.contains("Error parsing request: "));

        server.close();
    }

    #[tokio::test]
    async fn close_stops_accepting_but_not_inflight_connections() {
        let server = serve(0, RespondOk).await.unwrap();
        let port = server.local_addr().port();

        // Open a connection and park it mid-request before closing.
        let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        stream.write_all(b"GET /inflight HTTP/1.1\r\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        server.close();
        server.close();

        // The worker accepted before the close still answers.
        stream.write_all(b"Host: localhost\r\n\r\n").await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        assert!(String::from_utf8(response).unwrap().ends_with("served /inflight"));

        // New connections are refused once the listener is gone.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
    }
}

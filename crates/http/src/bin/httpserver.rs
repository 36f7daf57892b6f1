//! Demo HTTP server.
//!
//! Serves a plain `200 OK` for every path except `/chunked`, which streams
//! its body with chunked transfer encoding and closes with a trailer
//! reporting the total body length. Ctrl-c stops the listener.

use std::io;

use async_trait::async_trait;
use tokio::net::tcp::OwnedWriteHalf;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use wire_http::codec::ResponseWriter;
use wire_http::handler::Handler;
use wire_http::protocol::{Headers, Request, SendError, StatusCode, default_headers};
use wire_http::server::serve;

const PORT: u16 = 42069;

#[tokio::main]
async fn main() -> io::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let server = serve(PORT, DemoHandler).await?;
    info!(addr = %server.local_addr(), "server started, press ctrl-c to stop");

    tokio::signal::ctrl_c().await?;
    server.close();
    info!("server gracefully stopped");
    Ok(())
}

struct DemoHandler;

#[async_trait]
impl Handler for DemoHandler {
    async fn handle(&self, writer: &mut ResponseWriter<OwnedWriteHalf>, request: &Request) {
        let result = match request.request_line.request_target.as_str() {
            "/chunked" => chunked_response(writer).await,
            _ => plain_response(writer, request).await,
        };

        if let Err(e) = result {
            error!(cause = %e, "failed to send response");
        }
    }
}

async fn plain_response(
    writer: &mut ResponseWriter<OwnedWriteHalf>,
    request: &Request,
) -> Result<(), SendError> {
    let body = format!("Hello from {}\n", request.request_line.request_target);
    writer.write_status_line(StatusCode::OK).await?;
    writer.write_headers(&default_headers(body.len())).await?;
    writer.write_body(body.as_bytes()).await
}

async fn chunked_response(writer: &mut ResponseWriter<OwnedWriteHalf>) -> Result<(), SendError> {
    writer.write_status_line(StatusCode::OK).await?;

    let mut headers = Headers::new();
    headers.set("Transfer-Encoding", "chunked");
    headers.set("Trailer", "X-Content-Length");
    headers.set("Content-Type", "text/plain");
    writer.write_headers(&headers).await?;

    let mut total = 0;
    for chunk in ["every", " chunk", " is length-prefixed\n"] {
        total += chunk.len();
        writer.write_chunked_body(chunk.as_bytes()).await?;
    }
    writer.write_chunked_body_done().await?;

    let mut trailers = Headers::new();
    trailers.set("X-Content-Length", total.to_string());
    writer.write_trailers(&trailers).await
}

//! An asynchronous HTTP/1.1 server built directly over raw byte streams
//!
//! This crate implements the wire protocol itself rather than wrapping an
//! existing HTTP stack: requests are parsed incrementally out of raw TCP
//! bytes by a resumable state-machine decoder, and responses are emitted
//! through an ordered writer that enforces the status-line / headers / body
//! sequence at the type-error level. Everything in between is tokio.
//!
//! # Features
//!
//! - Full HTTP/1.1 request parsing: request line, headers, content-length body
//! - Incremental, resumable parsing over arbitrarily fragmented input
//! - Case-folding, insertion-ordered header table with duplicate merging
//! - Ordered response writing with chunked transfer encoding and trailers
//! - Asynchronous I/O using tokio, one worker task per connection
//! - Clean error handling with automatic `400 Bad Request` replies
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use tokio::io::AsyncWrite;
//! use tracing::Level;
//! use tracing_subscriber::FmtSubscriber;
//! use wire_http::codec::ResponseWriter;
//! use wire_http::handler::Handler;
//! use wire_http::protocol::{Request, StatusCode, default_headers};
//! use wire_http::server::serve;
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl<W> Handler<W> for HelloWorld
//! where
//!     W: AsyncWrite + Send + Unpin,
//! {
//!     async fn handle(&self, writer: &mut ResponseWriter<W>, _request: &Request) {
//!         let body = b"Hello World!\n";
//!         let _ = writer.write_status_line(StatusCode::OK).await;
//!         let _ = writer.write_headers(&default_headers(body.len())).await;
//!         let _ = writer.write_body(body).await;
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let server = serve(8080, HelloWorld).await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.close();
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`protocol`]: Protocol types: requests, headers, status codes, errors
//! - [`codec`]: The request decoder and the response writer
//! - [`connection`]: Per-connection lifecycle, request in / response out
//! - [`handler`]: Request handler traits and utilities
//! - [`server`]: TCP bind/accept loop and graceful close
//!
//! # Core Components
//!
//! ## Request Parsing
//!
//! [`codec::RequestDecoder`] is a [`tokio_util::codec::Decoder`] that consumes
//! bytes as they arrive and tracks its progress through the request
//! explicitly, so a request split across any number of reads parses
//! identically to one that arrives whole. [`protocol::Request::read_from`]
//! wraps it for one-shot reading from any [`tokio::io::AsyncRead`].
//!
//! ## Response Writing
//!
//! [`codec::ResponseWriter`] writes the pieces of a response in protocol
//! order and rejects calls made out of sequence before anything reaches the
//! wire. Bodies can be written whole or streamed as chunked transfer
//! encoding with optional trailers.
//!
//! ## Connection Handling
//!
//! [`connection::HttpConnection`] ties one decoder and one writer to a
//! connection: it reads a single request, dispatches it to a
//! [`handler::Handler`], and replies with `400 Bad Request` itself when the
//! bytes never amounted to a request.
//!
//! ## Error Handling
//!
//! The crate uses custom error types that implement `std::error::Error`:
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: Request parsing errors
//! - [`protocol::SendError`]: Response sending errors
//!
//! # Limitations
//!
//! - HTTP/1.1 only (no HTTP/2 or HTTP/3)
//! - No TLS support (use a reverse proxy for HTTPS)
//! - One request per connection; no keep-alive
//! - Request bodies are buffered in memory, not streamed


pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;

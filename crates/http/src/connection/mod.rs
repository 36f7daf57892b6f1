//! Connection handling: the per-connection worker logic.
//!
//! A connection owns the two halves of an accepted stream and carries one
//! request: parse it, let the handler answer it, and close. Parse failures
//! are answered on the spot with a `400 Bad Request` so a client always
//! hears back before the connection goes away.
//!
//! [`HttpConnection`] is transport-agnostic; the TCP specifics live in
//! [`crate::server`].

mod http_connection;

pub use http_connection::HttpConnection;

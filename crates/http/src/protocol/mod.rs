//! Core protocol types shared by the parsing and writing halves.
//!
//! Everything in this module is plain data: the wire-level grammar lives in
//! [`crate::codec`], the transport plumbing in [`crate::connection`] and
//! [`crate::server`]. What is defined here is the vocabulary those layers
//! exchange:
//!
//! - **Requests**: [`RequestLine`] and the complete [`Request`] handed to
//!   handlers, plus the [`ParserState`] a decoder advances through.
//!
//! - **Headers**: the insertion-ordered, case-folding [`Headers`] table
//!   used for request headers, response headers and trailers alike,
//!   including the field-line parser that feeds it.
//!
//! - **Responses**: [`StatusCode`] with its reason phrases, the
//!   [`WriterState`] ordering gate, and [`default_headers`] for stock
//!   plain-text responses.
//!
//! - **Errors**: [`ParseError`] for everything that can go wrong reading a
//!   request, [`SendError`] for the writing side, and [`HttpError`] rolling
//!   both up for connection-level reporting.

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;

mod headers;
pub use headers::Headers;

mod request;
pub use request::ParserState;
pub use request::Request;
pub use request::RequestLine;

mod response;
pub use response::StatusCode;
pub use response::WriterState;
pub use response::default_headers;

//! Wire grammar: turning raw bytes into requests and responses into raw
//! bytes.
//!
//! Both halves work directly on byte buffers, one unit at a time:
//!
//! - [`RequestDecoder`] implements [`tokio_util::codec::Decoder`] and
//!   resumes cleanly across arbitrarily fragmented reads, so it slots into
//!   a `FramedRead` over any byte stream.
//!
//! - [`ResponseWriter`] wraps the write half of a connection and emits the
//!   status line, headers, body chunks and trailers in their one legal
//!   order, rejecting anything else before it touches the wire.
//!
//! Neither side interprets message semantics beyond framing: what a
//! request means is the handler's business.

mod request_decoder;
mod response_writer;

pub use request_decoder::RequestDecoder;
pub use response_writer::ResponseWriter;

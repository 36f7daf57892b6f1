//! Response-side protocol types: status codes, the response writer's
//! ordering states, and the stock header set most responses start from.

use std::fmt;

use super::headers::Headers;

/// A response status code.
///
/// Any integer code can be written; only the codes this server itself
/// produces carry a reason phrase, every other code is sent with an empty
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// The reason phrase paired with this code on the status line.
    pub fn reason(self) -> &'static str {
        match self.0 {
            200 => "OK",
            400 => "Bad Request",
            500 => "Internal Server Error",
            _ => "",
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the response writer is prepared to accept next.
///
/// Writes outside the status-line, headers, body, trailers order are
/// rejected before anything reaches the wire. Trailers hand the writer
/// back to [`WriterState::Body`]; there is no dedicated terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    StatusLine,
    Headers,
    Body,
    Trailers,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriterState::StatusLine => "status-line",
            WriterState::Headers => "headers",
            WriterState::Body => "body",
            WriterState::Trailers => "trailers",
        };
        f.write_str(name)
    }
}

/// Builds the header set for a plain fixed-length response.
///
/// Declares the given body length, marks the connection for close and
/// labels the body `text/plain`, in that order.
pub fn default_headers(content_len: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set("Content-Length", content_len.to_string());
    headers.set("Connection", "close");
    headers.set("Content-Type", "text/plain");
    headers
}

//! Request-side protocol types: the request line, the parser states a
//! request moves through, and the fully parsed [`Request`] itself.

use std::fmt;

use bytes::Bytes;

use crate::ensure;

use super::error::ParseError;
use super::headers::Headers;

/// The only version token accepted on a request line.
const SUPPORTED_VERSION: &str = "HTTP/1.1";

/// The stage an in-flight request parse has reached.
///
/// A parse only ever moves forward: request line, then header lines, then
/// the body, then [`ParserState::Done`]. There is no transition out of
/// `Done`; a decoder that has produced its request is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParserState::Initialized => "initialized",
            ParserState::ParsingHeaders => "parsing-headers",
            ParserState::ParsingBody => "parsing-body",
            ParserState::Done => "done",
        };
        f.write_str(name)
    }
}

/// The first line of a request: method, target and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub request_target: String,
    pub http_version: String,
}

impl RequestLine {
    /// Parses a request line from its raw bytes, CRLF already stripped.
    ///
    /// The line must hold exactly three tokens separated by single spaces.
    /// The method may only contain uppercase ASCII letters, and the version
    /// token must be the literal `HTTP/1.1`; only its `1.1` suffix is kept.
    pub fn parse(line: &[u8]) -> Result<RequestLine, ParseError> {
        let line = str::from_utf8(line)
            .map_err(|_| ParseError::invalid_request_line(String::from_utf8_lossy(line)))?;

        let parts: Vec<&str> = line.split(' ').collect();
        ensure!(parts.len() == 3, ParseError::invalid_request_line(line));
        let (method, request_target, version) = (parts[0], parts[1], parts[2]);

        ensure!(
            method.bytes().all(|b| b.is_ascii_uppercase()),
            ParseError::invalid_request_line(line)
        );
        ensure!(
            version == SUPPORTED_VERSION,
            ParseError::unsupported_version(version)
        );

        Ok(RequestLine {
            method: method.to_string(),
            request_target: request_target.to_string(),
            http_version: version.strip_prefix("HTTP/").unwrap_or(version).to_string(),
        })
    }
}

/// A fully parsed request.
///
/// Produced only by the request decoder once it reaches its terminal state,
/// so every `Request` value is complete: request line, header table and
/// body. The body is empty when the request declared no `Content-Length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: Headers,
    pub body: Bytes,
}

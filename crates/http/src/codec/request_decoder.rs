//! Incremental request decoder.
//!
//! [`RequestDecoder`] implements [`tokio_util::codec::Decoder`] over the raw
//! read buffer of a connection. It consumes input a unit at a time (request
//! line, header lines, body bytes) and remembers where it stopped, so a
//! request split across any number of reads decodes to exactly the same
//! [`Request`] as one delivered whole. `Ok(None)` always means "feed me more
//! bytes"; every malformed input is a hard error, never a resynchronization.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use tokio_util::codec::Decoder;
//! use wire_http::codec::RequestDecoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"GET /coffee HTTP/1.1\r\nHost: localhost\r\n\r\n"[..]);
//!
//! let request = decoder.decode(&mut buffer).unwrap().expect("request is complete");
//! assert_eq!(request.request_line.method, "GET");
//! assert_eq!(request.headers.get("host"), Some("localhost"));
//! ```

use std::mem;

use bytes::{Buf, BytesMut};
use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::{Decoder, FramedRead};
use tracing::trace;

use crate::ensure;
use crate::protocol::{Headers, ParseError, ParserState, Request, RequestLine};
use crate::utils::{CRLF, find_crlf};

const CONTENT_LENGTH: &str = "content-length";

/// A resumable decoder for a single request.
///
/// The decoder advances through [`ParserState`] one way only. Interior
/// progress survives between `decode` calls: a parsed request line and any
/// completed header lines are kept, and partial body bytes accumulate until
/// the declared `Content-Length` is reached. Once the decoder yields its
/// request it is spent; decoding again is an error.
#[derive(Debug)]
pub struct RequestDecoder {
    state: ParserState,
    request_line: Option<RequestLine>,
    headers: Headers,
    body: BytesMut,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    /// The state the decoder is currently paused in.
    pub fn state(&self) -> ParserState {
        self.state
    }

    fn decode_body(&mut self, src: &mut BytesMut) -> Result<Option<Request>, ParseError> {
        let declared = match self.headers.get(CONTENT_LENGTH) {
            // No declared length: the request has no body, and whatever
            // else sits in the buffer does not belong to it.
            None => {
                src.clear();
                return self.finish().map(Some);
            }
            Some(value) => value
                .parse::<usize>()
                .map_err(|_| ParseError::malformed_content_length(value))?,
        };

        if !src.is_empty() {
            self.body.extend_from_slice(src.as_ref());
            src.clear();
        }

        ensure!(
            self.body.len() <= declared,
            ParseError::body_length_mismatch(declared, self.body.len())
        );
        if self.body.len() == declared {
            trace!(length = declared, "body complete");
            return self.finish().map(Some);
        }

        Ok(None)
    }

    fn finish(&mut self) -> Result<Request, ParseError> {
        self.state = ParserState::Done;
        let request_line = self
            .request_line
            .take()
            .ok_or_else(|| ParseError::unknown_state(ParserState::Done))?;

        Ok(Request {
            request_line,
            headers: mem::take(&mut self.headers),
            body: mem::take(&mut self.body).freeze(),
        })
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self {
            state: ParserState::Initialized,
            request_line: None,
            headers: Headers::new(),
            body: BytesMut::new(),
        }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Consumes as much of `src` as currently forms complete units.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the request is complete
    /// - `Ok(None)`: more data is needed, progress so far is retained
    /// - `Err(_)`: the input can never become a valid request
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                ParserState::Initialized => {
                    let Some(idx) = find_crlf(src) else {
                        return Ok(None);
                    };
                    let line = src.split_to(idx + CRLF.len());
                    let request_line = RequestLine::parse(&line[..idx])?;
                    trace!(
                        method = %request_line.method,
                        target = %request_line.request_target,
                        "parsed request line"
                    );
                    self.request_line = Some(request_line);
                    self.state = ParserState::ParsingHeaders;
                }

                ParserState::ParsingHeaders => {
                    let (consumed, done) = self.headers.parse_line(src.as_ref())?;
                    if consumed == 0 {
                        return Ok(None);
                    }
                    src.advance(consumed);
                    if done {
                        trace!(header_count = self.headers.len(), "headers complete");
                        self.state = ParserState::ParsingBody;
                    }
                }

                ParserState::ParsingBody => return self.decode_body(src),

                ParserState::Done => {
                    return Err(ParseError::unknown_state(ParserState::Done));
                }
            }
        }
    }

    /// Handles the stream ending.
    ///
    /// A request that already completed makes EOF unremarkable; anything
    /// still in flight becomes [`ParseError::IncompleteRequest`] naming the
    /// state the parser was stuck in.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.state == ParserState::Done {
            return Ok(None);
        }

        match self.decode(src)? {
            Some(request) => Ok(Some(request)),
            None => Err(ParseError::incomplete(self.state)),
        }
    }
}

impl Request {
    /// Reads one complete request from `reader`.
    ///
    /// Drives a [`RequestDecoder`] over the stream until the request
    /// completes or fails. Bytes past the end of the request are discarded
    /// along with the reader.
    pub async fn read_from<R>(reader: R) -> Result<Request, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        let mut framed_read = FramedRead::with_capacity(reader, RequestDecoder::new(), 8 * 1024);
        match framed_read.next().await {
            Some(result) => result,
            None => Err(ParseError::incomplete(framed_read.decoder().state())),
        }
    }
}

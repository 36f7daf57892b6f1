use std::io;
use thiserror::Error;

use super::request::ParserState;
use super::response::WriterState;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid request line: {line}")]
    InvalidRequestLine { line: String },

    #[error("unsupported http version: {version}")]
    UnsupportedVersion { version: String },

    #[error("invalid header format: {reason}")]
    InvalidHeaderFormat { reason: String },

    #[error("malformed content-length: {value}")]
    MalformedContentLength { value: String },

    #[error("body length mismatch: declared {declared}, actual {actual}")]
    BodyLengthMismatch { declared: usize, actual: usize },

    #[error("incomplete request, parser in state: {state}")]
    IncompleteRequest { state: ParserState },

    #[error("unknown parser state: {state}")]
    UnknownParserState { state: ParserState },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_request_line<S: ToString>(line: S) -> Self {
        Self::InvalidRequestLine { line: line.to_string() }
    }

    pub fn unsupported_version<S: ToString>(version: S) -> Self {
        Self::UnsupportedVersion { version: version.to_string() }
    }

    pub fn invalid_header_format<S: ToString>(reason: S) -> Self {
        Self::InvalidHeaderFormat { reason: reason.to_string() }
    }

    pub fn malformed_content_length<S: ToString>(value: S) -> Self {
        Self::MalformedContentLength { value: value.to_string() }
    }

    pub fn body_length_mismatch(declared: usize, actual: usize) -> Self {
        Self::BodyLengthMismatch { declared, actual }
    }

    pub fn incomplete(state: ParserState) -> Self {
        Self::IncompleteRequest { state }
    }

    pub fn unknown_state(state: ParserState) -> Self {
        Self::UnknownParserState { state }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid writer state: required {required}, actual {actual}")]
    InvalidWriterState {
        required: WriterState,
        actual: WriterState,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_state(required: WriterState, actual: WriterState) -> Self {
        Self::InvalidWriterState { required, actual }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

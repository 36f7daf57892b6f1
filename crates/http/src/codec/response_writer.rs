//! Ordered response writer.
//!
//! [`ResponseWriter`] produces response bytes directly onto a connection's
//! write half, enforcing the only order a response can legally take:
//! status line, headers, body. A chunk-encoded body is closed off by the
//! terminal zero-size chunk and an optional trailer section.
//!
//! The writer holds a [`WriterState`] gate in front of every operation. An
//! out-of-order call fails with [`SendError::InvalidWriterState`] before a
//! single byte reaches the transport. Once the gate passes, the state
//! transition is taken even if the transport write itself fails; a failed
//! connection is closed by its worker, never resumed.

use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::ensure;
use crate::protocol::{Headers, SendError, StatusCode, WriterState};
use crate::utils::CRLF;

const INIT_BUFFER_SIZE: usize = 4 * 1024;

/// Writes one response, in order, to an async byte sink.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    state: WriterState,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, INIT_BUFFER_SIZE)
    }

    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self {
            writer,
            buffer: BytesMut::with_capacity(buffer_size),
            state: WriterState::StatusLine,
        }
    }

    /// The operation the writer will accept next.
    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes `HTTP/1.1 <code> <reason>` and the line terminator.
    ///
    /// Codes without a known reason phrase are sent with an empty one.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        ensure!(
            self.state == WriterState::StatusLine,
            SendError::invalid_state(WriterState::StatusLine, self.state)
        );

        write!(FastWrite(&mut self.buffer), "HTTP/1.1 {status} {}\r\n", status.reason())?;
        self.state = WriterState::Headers;
        self.flush().await
    }

    /// Writes every header as `name: value` followed by the blank line
    /// separating headers from the body.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), SendError> {
        ensure!(
            self.state == WriterState::Headers,
            SendError::invalid_state(WriterState::Headers, self.state)
        );

        for (name, value) in headers.iter() {
            self.buffer.put_slice(name.as_bytes());
            self.buffer.put_slice(b": ");
            self.buffer.put_slice(value.as_bytes());
            self.buffer.put_slice(CRLF);
        }
        self.buffer.put_slice(CRLF);
        self.state = WriterState::Body;
        self.flush().await
    }

    /// Writes raw body bytes. May be called repeatedly.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<(), SendError> {
        ensure!(
            self.state == WriterState::Body,
            SendError::invalid_state(WriterState::Body, self.state)
        );

        self.buffer.put_slice(body);
        self.flush().await
    }

    /// Writes one chunk of a chunk-encoded body: the byte count in lowercase
    /// hex, a line terminator, the bytes themselves, and another terminator.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<(), SendError> {
        ensure!(
            self.state == WriterState::Body,
            SendError::invalid_state(WriterState::Body, self.state)
        );

        write!(FastWrite(&mut self.buffer), "{:x}\r\n", chunk.len())?;
        self.buffer.reserve(chunk.len() + 2);
        self.buffer.put_slice(chunk);
        self.buffer.put_slice(CRLF);
        self.flush().await
    }

    /// Writes the terminal zero-size chunk marker and moves the writer to
    /// the trailer section.
    pub async fn write_chunked_body_done(&mut self) -> Result<(), SendError> {
        ensure!(
            self.state == WriterState::Body,
            SendError::invalid_state(WriterState::Body, self.state)
        );

        self.buffer.put_slice(b"0\r\n");
        self.state = WriterState::Trailers;
        self.flush().await
    }

    /// Writes the trailer section: each trailer as a header line, then the
    /// blank line that ends the response. An empty table writes only the
    /// blank line. Hands the writer back to [`WriterState::Body`].
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), SendError> {
        ensure!(
            self.state == WriterState::Trailers,
            SendError::invalid_state(WriterState::Trailers, self.state)
        );

        for (name, value) in trailers.iter() {
            self.buffer.put_slice(name.as_bytes());
            self.buffer.put_slice(b": ");
            self.buffer.put_slice(value.as_bytes());
            self.buffer.put_slice(CRLF);
        }
        self.buffer.put_slice(CRLF);
        self.state = WriterState::Body;
        self.flush().await
    }

    async fn flush(&mut self) -> Result<(), SendError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.writer.write_all(self.buffer.as_ref()).await?;
        self.buffer.clear();
        Ok(self.writer.flush().await?)
    }
}

/// Fast writer implementation for writing formatted text to BytesMut.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::default_headers;

    use super::*;

    #[tokio::test]
    async fn writes_a_complete_plain_response() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&default_headers(13)).await.unwrap();
        writer.write_body(b"Hello, World!").await.unwrap();

        let expected = "HTTP/1.1 200 OK\r\n\
                        content-length: 13\r\n\
                        connection: close\r\n\
                        content-type: text/plain\r\n\
                        \r\n\
                        Hello, World!";
        assert_eq!(writer.get_ref().as_slice(), expected.as_bytes());
    }

    #[tokio::test]
    async fn unknown_codes_get_an_empty_reason_phrase() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::from(418)).await.unwrap();
        assert_eq!(writer.get_ref().as_slice(), b"HTTP/1.1 418 \r\n");
    }

    #[tokio::test]
    async fn chunks_are_framed_with_their_lowercase_hex_size() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&Headers::new()).await.unwrap();

        let mark = writer.get_ref().len();
        writer.write_chunked_body(b"abc").await.unwrap();
        assert_eq!(&writer.get_ref()[mark..], b"3\r\nabc\r\n");

        let mark = writer.get_ref().len();
        writer.write_chunked_body(b"abcdefghijklmnopqrstuvwxyz").await.unwrap();
        assert_eq!(&writer.get_ref()[mark..], b"1a\r\nabcdefghijklmnopqrstuvwxyz\r\n");
    }

    #[tokio::test]
    async fn done_marker_and_trailers_finish_a_chunked_body() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&Headers::new()).await.unwrap();
        writer.write_chunked_body(b"abc").await.unwrap();

        let mark = writer.get_ref().len();
        writer.write_chunked_body_done().await.unwrap();
        assert_eq!(writer.state(), WriterState::Trailers);

        let mut trailers = Headers::new();
        trailers.set("X", "Y");
        writer.write_trailers(&trailers).await.unwrap();

        // Trailer names go out in their folded form.
        assert_eq!(&writer.get_ref()[mark..], b"0\r\nx: Y\r\n\r\n");
        assert_eq!(writer.state(), WriterState::Body);
    }

    #[tokio::test]
    async fn an_empty_trailer_table_just_ends_the_response() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&Headers::new()).await.unwrap();
        writer.write_chunked_body_done().await.unwrap();

        let mark = writer.get_ref().len();
        writer.write_trailers(&Headers::new()).await.unwrap();
        assert_eq!(&writer.get_ref()[mark..], b"\r\n");
    }

    #[tokio::test]
    async fn out_of_order_writes_fail_before_reaching_the_wire() {
        let mut writer = ResponseWriter::new(Vec::new());

        let err = writer.write_body(b"too early").await.unwrap_err();
        assert!(matches!(
            err,
            SendError::InvalidWriterState {
                required: WriterState::Body,
                actual: WriterState::StatusLine,
            }
        ));
        assert!(writer.get_ref().is_empty(), "rejected write must not emit bytes");

        let err = writer.write_trailers(&Headers::new()).await.unwrap_err();
        assert!(matches!(
            err,
            SendError::InvalidWriterState {
                required: WriterState::Trailers,
                actual: WriterState::StatusLine,
            }
        ));
        assert!(writer.get_ref().is_empty());
    }

    #[tokio::test]
    async fn the_status_line_can_only_be_written_once() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();

        let before = writer.get_ref().len();
        let err = writer.write_status_line(StatusCode::OK).await.unwrap_err();
        assert!(matches!(
            err,
            SendError::InvalidWriterState {
                required: WriterState::StatusLine,
                actual: WriterState::Headers,
            }
        ));
        assert_eq!(writer.get_ref().len(), before);
    }

    #[tokio::test]
    async fn the_body_accepts_repeated_writes() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&default_headers(10)).await.unwrap();

        let mark = writer.get_ref().len();
        writer.write_body(b"hello").await.unwrap();
        writer.write_body(b"world").await.unwrap();

        assert_eq!(&writer.get_ref()[mark..], b"helloworld");
        assert_eq!(writer.state(), WriterState::Body);
    }
}

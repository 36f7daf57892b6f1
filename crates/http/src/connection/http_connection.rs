use std::sync::Arc;

use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::FramedRead;
use tracing::{info, trace, warn};

use crate::codec::{RequestDecoder, ResponseWriter};
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, SendError, StatusCode, default_headers};

/// One accepted connection, carrying exactly one request.
///
/// The read half is framed through a [`RequestDecoder`]; the write half is
/// wrapped in a [`ResponseWriter`]. Dropping the connection closes the
/// transport, which is also how a response is terminated.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    writer: ResponseWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Send + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), 8 * 1024),
            writer: ResponseWriter::new(writer),
        }
    }

    /// Serves the request this connection carries.
    ///
    /// A successfully parsed request is handed to `handler` along with the
    /// response writer; whatever the handler writes is the response. A
    /// request that cannot be parsed never reaches the handler: the
    /// connection answers it with an automatic `400 Bad Request` naming the
    /// parse failure, and the parse error is returned to the caller.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler<W>,
    {
        match self.framed_read.next().await {
            Some(Ok(request)) => {
                trace!(
                    method = %request.request_line.method,
                    target = %request.request_line.request_target,
                    "dispatching request to handler"
                );
                handler.handle(&mut self.writer, &request).await;
                Ok(())
            }

            Some(Err(e)) => {
                warn!(cause = %e, "can't parse request, sending error response");
                self.send_error_response(&e).await?;
                Err(e.into())
            }

            None => {
                info!("cant read more request, break this connection down");
                Ok(())
            }
        }
    }

    async fn send_error_response(&mut self, cause: &ParseError) -> Result<(), SendError> {
        let body = format!("Error parsing request: {cause}");
        self.writer.write_status_line(StatusCode::BAD_REQUEST).await?;
        self.writer.write_headers(&default_headers(body.len())).await?;
        self.writer.write_body(body.as_bytes()).await
    }
}

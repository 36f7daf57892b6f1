use async_trait::async_trait;
use futures::future::BoxFuture;

use tokio::io::AsyncWrite;
use tokio::net::tcp::OwnedWriteHalf;

use crate::codec::ResponseWriter;
use crate::protocol::Request;

/// Answers one parsed request by driving the response writer.
///
/// The handler owns the whole response: status line, headers and body all
/// go through `writer`. Write errors are the handler's to deal with; the
/// connection is torn down when handling returns either way.
#[async_trait]
pub trait Handler<W = OwnedWriteHalf>: Send + Sync
where
    W: AsyncWrite + Send + Unpin,
{
    async fn handle(&self, writer: &mut ResponseWriter<W>, request: &Request);
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<W, F> Handler<W> for HandlerFn<F>
where
    W: AsyncWrite + Send + Unpin,
    F: for<'a> Fn(&'a mut ResponseWriter<W>, &'a Request) -> BoxFuture<'a, ()> + Send + Sync,
{
    async fn handle(&self, writer: &mut ResponseWriter<W>, request: &Request) {
        (self.f)(writer, request).await;
    }
}

pub fn make_handler<W, F>(f: F) -> HandlerFn<F>
where
    W: AsyncWrite + Send + Unpin,
    F: for<'a> Fn(&'a mut ResponseWriter<W>, &'a Request) -> BoxFuture<'a, ()> + Send + Sync,
{
    HandlerFn { f }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use crate::protocol::{StatusCode, default_headers};

    use super::*;

    fn greet<'a>(writer: &'a mut ResponseWriter<Vec<u8>>, request: &'a Request) -> BoxFuture<'a, ()> {
        async move {
            let body = format!("hello, {}", request.request_line.request_target);
            writer.write_status_line(StatusCode::OK).await.unwrap();
            writer.write_headers(&default_headers(body.len())).await.unwrap();
            writer.write_body(body.as_bytes()).await.unwrap();
        }
        .boxed()
    }

    #[tokio::test]
    async fn plain_functions_can_serve_as_handlers() {
        let raw = &b"GET /crew HTTP/1.1\r\nHost: localhost\r\n\r\n"[..];
        let request = Request::read_from(raw).await.unwrap();

        let handler = make_handler(greet);
        let mut writer = ResponseWriter::new(Vec::new());
        handler.handle(&mut writer, &request).await;

        let written = String::from_utf8(writer.into_inner()).unwrap();
        assert!(written.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(written.ends_with("hello, /crew"));
    }
}

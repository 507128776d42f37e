use bytes::BytesMut;
use futures::StreamExt;
use http::Response;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::FramedRead;
use tracing::{debug, error, trace};

use crate::client::ClientConfig;
use crate::client::DEFAULT_READ_BUFFER_SIZE;
use crate::codec::{RequestEncoder, ResponseDecoder};
use crate::connection::RequestWriter;
use crate::protocol::{ClientRequest, FullResponse, HttpError, Message, ParseError, PayloadItem, ResponseHead};

/// A single HTTP/1.1 exchange over an already established stream
///
/// `HttpConnection` writes one request, then reads exactly one response:
/// - the request is encoded and flushed in full before any read
/// - the response head is decoded, then the body is collected until its end
/// - bytes after the body are never consumed
///
/// [`send`](HttpConnection::send) takes `self`, so a connection can't be used
/// for a second exchange; both halves are dropped, and the stream closed, once
/// it returns.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, ResponseDecoder>,
    request_writer: RequestWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, ResponseDecoder::new(), DEFAULT_READ_BUFFER_SIZE),
            request_writer: RequestWriter::new(writer, RequestEncoder::default()),
        }
    }

    /// Applies the host header and the parser limits of `config`.
    pub fn with_config(reader: R, writer: W, config: &ClientConfig) -> Self {
        let decoder = ResponseDecoder::with_limits(config.max_line_length(), config.max_headers());
        Self {
            framed_read: FramedRead::with_capacity(reader, decoder, config.read_buffer_size()),
            request_writer: RequestWriter::new(writer, RequestEncoder::new(config.host().clone())),
        }
    }

    /// Sends `request` and reads the whole response.
    ///
    /// # Errors
    ///
    /// - [`HttpError::RequestError`] if the request can't be encoded or written
    /// - [`HttpError::ResponseError`] if the response is malformed or the peer
    ///   closes the stream before the response is complete
    pub async fn send(mut self, request: ClientRequest) -> Result<FullResponse, HttpError> {
        self.framed_read.decoder_mut().set_request_method(request.method());
        debug!(method = %request.method(), target = request.head().target(), "send request");

        if let Err(e) = self.request_writer.send(request).await {
            error!(cause = %e, "can't send request");
            return Err(e.into());
        }

        let head = self.read_head().await?;
        debug!(status = head.status().as_u16(), "receive response head");

        let mut body = BytesMut::new();
        loop {
            match self.framed_read.next().await {
                Some(Ok(Message::Payload(PayloadItem::Chunk(bytes)))) => {
                    trace!(len = bytes.len(), "receive body chunk");
                    body.extend_from_slice(&bytes);
                }

                Some(Ok(Message::Payload(PayloadItem::Eof))) => break,

                Some(Ok(Message::Header(_))) => {
                    error!("expect payload item but receive response head");
                    return Err(ParseError::invalid_header("second response head inside one exchange").into());
                }

                Some(Err(e)) => {
                    error!(cause = %e, "can't receive response body");
                    return Err(e.into());
                }

                None => return Err(ParseError::ConnectionClosed.into()),
            }
        }

        debug!(status = head.status().as_u16(), len = body.len(), "finished exchange");
        let (parts, ()) = head.into_parts();
        Ok(Response::from_parts(parts, body.freeze()))
    }

    async fn read_head(&mut self) -> Result<ResponseHead, HttpError> {
        match self.framed_read.next().await {
            Some(Ok(Message::Header((head, _payload_size)))) => Ok(head),

            Some(Ok(Message::Payload(_))) => {
                error!("expect response head but receive payload item");
                Err(ParseError::invalid_header("payload before response head").into())
            }

            Some(Err(e)) => {
                error!(cause = %e, "can't receive response head");
                Err(e.into())
            }

            None => Err(ParseError::ConnectionClosed.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode, header};
    use indoc::indoc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex, split};

    /// Plays the daemon on the other end of a duplex pipe: reads the request
    /// head, writes `response` and closes. Returns the request bytes seen.
    async fn serve_once(server: tokio::io::DuplexStream, response: Vec<u8>) -> Vec<u8> {
        let (mut reader, mut writer) = split(server);
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        while !received.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = reader.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        writer.write_all(&response).await.unwrap();
        writer.shutdown().await.unwrap();
        received
    }

    async fn exchange(request: ClientRequest, response: &[u8]) -> (Result<FullResponse, HttpError>, Vec<u8>) {
        let (client, server) = duplex(4096);
        let server = tokio::spawn(serve_once(server, response.to_vec()));

        let (reader, writer) = split(client);
        let result = HttpConnection::new(reader, writer).send(request).await;
        (result, server.await.unwrap())
    }

    #[tokio::test]
    async fn test_ping() {
        let request = ClientRequest::new(Method::GET, "/_ping").unwrap();
        let (result, received) = exchange(request, b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nOK").await;

        assert_eq!(received, b"GET /_ping HTTP/1.1\r\nhost: docker\r\n\r\n");

        let response = result.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(&response.body()[..], b"OK");
    }

    #[tokio::test]
    async fn test_chunked_response() {
        let wire = indoc! {"
        HTTP/1.1 200 OK
        Content-Type: application/json
        Transfer-Encoding: chunked

        5
        [1,2]
        0

        "}
        .replace('\n', "\r\n");
        let request = ClientRequest::new(Method::GET, "/volumes").unwrap();
        let (result, _) = exchange(request, wire.as_bytes()).await;

        let response = result.unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(&response.body()[..], b"[1,2]");
    }

    #[tokio::test]
    async fn test_head_request_has_no_body() {
        let request = ClientRequest::new(Method::HEAD, "/_ping").unwrap();
        let (result, _) = exchange(request, b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n").await;

        let response = result.unwrap();
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "2");
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_is_a_response() {
        let request = ClientRequest::new(Method::GET, "/volumes/missing").unwrap();
        let (result, _) = exchange(
            request,
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 29\r\n\r\n{\"message\":\"no such volume\"}\n",
        )
        .await;

        let response = result.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body().len(), 29);
    }

    #[tokio::test]
    async fn test_closed_before_head() {
        let request = ClientRequest::new(Method::GET, "/info").unwrap();
        let (result, _) = exchange(request, b"HTTP/1.1 200 OK\r\n").await;

        let error = result.unwrap_err();
        assert!(error.is_connection_closed());
        assert!(matches!(error, HttpError::ResponseError { source: ParseError::ConnectionClosed }));
    }

    #[tokio::test]
    async fn test_closed_mid_chunk() {
        let request = ClientRequest::new(Method::GET, "/info").unwrap();
        let (result, _) =
            exchange(request, b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n8\r\nabc").await;

        let error = result.unwrap_err();
        assert!(matches!(error, HttpError::ResponseError { source: ParseError::IncompleteBody { expected: 13, received: 8 } }));
    }

    #[tokio::test]
    async fn test_missing_content_length() {
        let request = ClientRequest::new(Method::GET, "/version").unwrap();
        let (result, _) = exchange(request, b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nOK").await;

        assert!(matches!(result, Err(HttpError::ResponseError { source: ParseError::MissingContentLength })));
    }

    #[tokio::test]
    async fn test_with_config_limits() {
        let config = ClientConfig::builder().socket_path("/unused").host("podman").max_headers(1).build().unwrap();
        let (client, server) = duplex(4096);
        let server = tokio::spawn(serve_once(server, b"HTTP/1.1 200 OK\r\nA: 1\r\nB: 2\r\nContent-Length: 0\r\n\r\n".to_vec()));

        let (reader, writer) = split(client);
        let request = ClientRequest::new(Method::GET, "/info").unwrap();
        let result = HttpConnection::with_config(reader, writer, &config).send(request).await;

        assert!(matches!(result, Err(HttpError::ResponseError { source: ParseError::TooManyHeaders { max_num: 1 } })));
        assert_eq!(server.await.unwrap(), b"GET /info HTTP/1.1\r\nhost: podman\r\n\r\n");
    }
}

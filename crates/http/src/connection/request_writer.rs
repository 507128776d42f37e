use crate::codec::RequestEncoder;
use crate::protocol::{ClientRequest, SendError};
use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;

/// Initial capacity of the write buffer; grows as needed for large bodies.
const INIT_BUFFER_SIZE: usize = 1024;

/// Serializes a request into an owned buffer, then hands the bytes to the
/// writer with a single `write_all` and a flush.
#[derive(Debug)]
pub struct RequestWriter<W> {
    writer: W,
    buffer: BytesMut,
    encoder: RequestEncoder,
}

impl<W> RequestWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W, encoder: RequestEncoder) -> Self {
        Self::with_capacity(writer, encoder, INIT_BUFFER_SIZE)
    }

    pub fn with_capacity(writer: W, encoder: RequestEncoder, buffer_size: usize) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(buffer_size), encoder }
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Encodes `request` into the buffer without touching the writer.
    #[inline]
    pub fn write(&mut self, request: ClientRequest) -> Result<(), SendError> {
        self.encoder.encode(request, &mut self.buffer)
    }

    pub async fn flush(&mut self) -> Result<(), SendError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.writer.write_all(self.buffer.as_ref()).await?;
        self.buffer.clear();
        Ok(self.writer.flush().await?)
    }

    /// Encodes and flushes `request`. Nothing reaches the writer if encoding fails.
    pub async fn send(&mut self, request: ClientRequest) -> Result<(), SendError> {
        self.write(request)?;
        self.flush().await
    }
}

//! Message framing over a byte-stream transport.
//!
//! One logical message is the UTF-8 JSON bytes of a [`Message`]
//! followed by a half-close of the sender's write direction. The
//! receiver reads until the peer's EOF. This one-shot framing carries
//! exactly one request/response pair per connection, which is all the
//! handshake needs; a session extended beyond the handshake would want
//! length-prefixed or delimiter framing instead.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::endpoint::ServerEndpoint;
use crate::error::PtzError;
use crate::message::Message;

const READ_CHUNK_SIZE: usize = 1024;

/// Encodes and decodes [`Message`]s over a transport stream.
///
/// Generic over the transport so tests can run against in-memory
/// duplex streams instead of a live socket.
#[derive(Debug)]
pub struct MessageChannel<T> {
    transport: T,
    endpoint: ServerEndpoint,
}

impl<T> MessageChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(transport: T, endpoint: ServerEndpoint) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    /// Serialize `msg`, write it out, and half-close the write
    /// direction to mark end-of-message.
    pub async fn send(&mut self, msg: &Message) -> Result<(), PtzError> {
        debug!("sending to {}: {:?}", self.endpoint, msg);
        self.transport.write_all(&msg.encode()).await?;
        self.transport.flush().await?;
        self.transport.shutdown().await?;
        Ok(())
    }

    /// Read until the peer's end-of-message (its write half-close),
    /// then decode the accumulated bytes.
    pub async fn receive(&mut self) -> Result<Message, PtzError> {
        let mut buf = BytesMut::with_capacity(READ_CHUNK_SIZE);
        loop {
            buf.reserve(READ_CHUNK_SIZE);
            let n = self.transport.read_buf(&mut buf).await?;
            if n == 0 {
                break;
            }
        }
        let msg = Message::decode(&buf)?;
        debug!("received from {}: {:?}", self.endpoint, msg);
        Ok(msg)
    }

    /// Tear down the transport. Any buffered output is flushed and the
    /// write direction is closed before the stream is dropped.
    pub async fn close(mut self) -> Result<(), PtzError> {
        self.transport.shutdown().await?;
        Ok(())
    }
}

//! DNS exchanges over TCP.

use super::{ExchangeError, SrvExchange};
use async_trait::async_trait;
use hickory_proto::op::Message;
use std::{future::Future, time::Duration};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

/// Exchanges messages with a nameserver over TCP, one connection per
/// request, using the two-byte length prefix framing of RFC 1035 4.2.2.
#[derive(Clone, Debug)]
pub struct TcpExchange {
    server: String,
    timeout: Duration,
}

impl TcpExchange {
    /// Time allowed for connecting, and separately for the reply to arrive.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

    /// Creates an exchange talking to `server`, given as `host:port`.
    pub fn new(server: impl ToString) -> Self {
        Self {
            server: server.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the connect and reply timeouts.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    async fn within<T>(
        &self,
        fut: impl Future<Output = std::io::Result<T>>,
    ) -> Result<T, ExchangeError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => Ok(res?),
            Err(_) => Err(ExchangeError::Timeout(self.server.clone())),
        }
    }
}

#[async_trait]
impl SrvExchange for TcpExchange {
    async fn exchange(&self, request: &Message) -> Result<Message, ExchangeError> {
        let bytes = request.to_vec()?;
        let len = u16::try_from(bytes.len())
            .map_err(|_| ExchangeError::RequestTooLarge(bytes.len()))?;

        let mut stream = self.within(TcpStream::connect(self.server.as_str())).await?;
        let mut framed = Vec::with_capacity(bytes.len() + 2);
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(&bytes);
        stream.write_all(&framed).await?;

        let reply = self
            .within(async {
                let mut len = [0u8; 2];
                stream.read_exact(&mut len).await?;
                let mut reply = vec![0u8; u16::from_be_bytes(len) as usize];
                stream.read_exact(&mut reply).await?;
                Ok::<_, std::io::Error>(reply)
            })
            .await?;

        let reply = Message::from_vec(&reply)?;
        if reply.id() != request.id() {
            return Err(ExchangeError::IdMismatch {
                sent: request.id(),
                received: reply.id(),
            });
        }
        Ok(reply)
    }
}

//! Line-protocol client for a running index.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use super::protocol::Response;
use crate::error::{IndexError, Result};

pub struct IndexClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl IndexClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
        })
    }

    /// Send one message (a newline is appended) and read the response code.
    pub async fn send(&mut self, message: &str) -> Result<Response> {
        let mut line = String::with_capacity(message.len() + 1);
        line.push_str(message);
        line.push('\n');
        self.send_raw(line.as_bytes()).await
    }

    /// Write `bytes` as-is and read one response line.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> Result<Response> {
        self.writer.write_all(bytes).await?;
        self.read_response().await
    }

    pub async fn read_response(&mut self) -> Result<Response> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(IndexError::Protocol(
                "connection closed by server".to_string(),
            ));
        }
        Response::parse(&line)
    }
}

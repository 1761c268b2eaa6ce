use crate::constants::MAX_COMMAND_LINE;
use crate::core_ftpcommand::reply::Reply;
use crate::core_network::data_channel::{DataChannel, DataMode};
use crate::core_network::error::TransferError;
use async_trait::async_trait;
use log::debug;
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::ops::RangeInclusive;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf,
    WriteHalf,
};

/// Everything a command handler needs from a client connection: the control
/// channel plus the data channel rendezvous.
#[async_trait]
pub trait FtpConnection: Send {
    /// Reads one command line, without its line terminator. EOF and lines
    /// over `MAX_COMMAND_LINE` bytes are errors.
    async fn read_command(&mut self) -> io::Result<String>;

    async fn respond(&mut self, reply: Reply) -> io::Result<()>;

    /// Replaces any pending transfer with a passive one; returns its port.
    async fn set_passive(
        &mut self,
        host: Ipv4Addr,
        ports: Option<RangeInclusive<u16>>,
    ) -> Result<u16, TransferError>;

    /// Replaces any pending transfer with an active one dialing `target`.
    fn set_active(&mut self, target: SocketAddrV4);

    fn reset(&mut self);

    fn data_mode(&self) -> Option<DataMode>;

    async fn send(&mut self, payload: Vec<u8>) -> Result<(), TransferError>;

    async fn receive(&mut self) -> Result<Vec<u8>, TransferError>;
}

/// `FtpConnection` over any byte stream, normally a `TcpStream`.
pub struct StreamConnection<S> {
    id: usize,
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    data: DataChannel,
}

impl<S> StreamConnection<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    pub fn new(stream: S, id: usize) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            id,
            reader: BufReader::new(reader),
            writer,
            data: DataChannel::new(),
        }
    }
}

#[async_trait]
impl<S> FtpConnection for StreamConnection<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    async fn read_command(&mut self) -> io::Result<String> {
        let mut line = Vec::new();
        let n = (&mut self.reader)
            .take(MAX_COMMAND_LINE as u64)
            .read_until(b'\n', &mut line)
            .await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "control connection closed",
            ));
        }
        if n == MAX_COMMAND_LINE && !line.ends_with(b"\n") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("command line longer than {} bytes", MAX_COMMAND_LINE),
            ));
        }
        Ok(String::from_utf8_lossy(&line).trim().to_string())
    }

    async fn respond(&mut self, reply: Reply) -> io::Result<()> {
        self.writer.write_all(reply.to_line().as_bytes()).await?;
        self.writer.flush().await?;
        debug!("[#{}] RESPONSE {}", self.id, reply);
        Ok(())
    }

    async fn set_passive(
        &mut self,
        host: Ipv4Addr,
        ports: Option<RangeInclusive<u16>>,
    ) -> Result<u16, TransferError> {
        self.data.open_passive(host, ports).await
    }

    fn set_active(&mut self, target: SocketAddrV4) {
        self.data.open_active(target);
    }

    fn reset(&mut self) {
        self.data.reset();
    }

    fn data_mode(&self) -> Option<DataMode> {
        self.data.mode()
    }

    async fn send(&mut self, payload: Vec<u8>) -> Result<(), TransferError> {
        self.data.send(payload).await
    }

    async fn receive(&mut self) -> Result<Vec<u8>, TransferError> {
        self.data.receive().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_ftpcommand::reply::ReplyCode;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_read_commands_and_write_replies() {
        let (client, server) = tokio::io::duplex(1024);
        let mut conn = StreamConnection::new(server, 1);
        let (mut client_reader, mut client_writer) = tokio::io::split(client);

        client_writer.write_all(b"USER anon\r\n  noop  \n").await.unwrap();
        assert_eq!(conn.read_command().await.unwrap(), "USER anon");
        assert_eq!(conn.read_command().await.unwrap(), "noop");

        conn.respond(Reply::new(ReplyCode::NeedPassword)).await.unwrap();
        let mut buffer = [0u8; 64];
        let n = client_reader.read(&mut buffer).await.unwrap();
        assert_eq!(&buffer[..n], b"331 User name okay, need password\r\n");

        drop(client_writer);
        drop(client_reader);
        let eof = conn.read_command().await.unwrap_err();
        assert_eq!(eof.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_overlong_command_line_is_refused() {
        let (client, server) = tokio::io::duplex(4 * MAX_COMMAND_LINE);
        let mut conn = StreamConnection::new(server, 1);
        let (_client_reader, mut client_writer) = tokio::io::split(client);

        let mut line = format!("RETR {}", "a".repeat(MAX_COMMAND_LINE - 7));
        line.push_str("\r\n");
        client_writer.write_all(line.as_bytes()).await.unwrap();
        client_writer
            .write_all(&vec![b'x'; MAX_COMMAND_LINE + 1])
            .await
            .unwrap();

        let accepted = conn.read_command().await.unwrap();
        assert_eq!(accepted.len(), MAX_COMMAND_LINE - 2);

        let refused = conn.read_command().await.unwrap_err();
        assert_eq!(refused.kind(), io::ErrorKind::InvalidData);
    }
}

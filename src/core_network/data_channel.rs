//! Rendezvous between the control loop and the data connection task.
//!
//! Every PASV or PORT spawns one data task and replaces the three one-shot
//! channels it shares with the control loop: the transfer direction, the
//! payload, and the completion status. A transfer consumes them, so each
//! RETR/STOR/LIST/NLST needs its own PASV or PORT.

use crate::constants::{DATA_CONNECTION_TIMEOUT, PASSIVE_PORT_TIMEOUT};
use crate::core_network::error::TransferError;
use crate::core_network::pasv::setup_pasv_listener;
use log::{debug, trace, warn};
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::ops::RangeInclusive;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Receive bytes from the peer.
    Upload,
    /// Send bytes to the peer.
    Download,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Passive,
    Active,
}

/// Aborts the data task once the rendezvous is dropped.
struct TaskGuard(JoinHandle<()>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Control loop side of one pending transfer.
struct Rendezvous {
    mode: DataMode,
    direction: oneshot::Sender<Direction>,
    outbound: oneshot::Sender<Vec<u8>>,
    inbound: oneshot::Receiver<Vec<u8>>,
    completion: oneshot::Receiver<io::Result<()>>,
    task: TaskGuard,
}

/// Data task side of one pending transfer.
struct DataTask {
    direction: oneshot::Receiver<Direction>,
    outbound: oneshot::Receiver<Vec<u8>>,
    inbound: oneshot::Sender<Vec<u8>>,
    completion: oneshot::Sender<io::Result<()>>,
}

fn channel_pair(mode: DataMode) -> (DataTask, impl FnOnce(JoinHandle<()>) -> Rendezvous) {
    let (direction_tx, direction_rx) = oneshot::channel();
    let (outbound_tx, outbound_rx) = oneshot::channel();
    let (inbound_tx, inbound_rx) = oneshot::channel();
    let (completion_tx, completion_rx) = oneshot::channel();

    let task = DataTask {
        direction: direction_rx,
        outbound: outbound_rx,
        inbound: inbound_tx,
        completion: completion_tx,
    };
    let rendezvous = move |handle| Rendezvous {
        mode,
        direction: direction_tx,
        outbound: outbound_tx,
        inbound: inbound_rx,
        completion: completion_rx,
        task: TaskGuard(handle),
    };
    (task, rendezvous)
}

impl DataTask {
    /// Passive mode: accept first, then wait for the direction.
    async fn run_passive(self, listener: tokio::net::TcpListener) {
        let accepted = tokio::time::timeout(DATA_CONNECTION_TIMEOUT, listener.accept()).await;
        drop(listener);
        let stream = match accepted {
            Ok(Ok((stream, peer))) => {
                debug!("Accepted data connection from {}", peer);
                stream
            }
            Ok(Err(e)) => return self.fail(e),
            Err(_) => {
                return self.fail(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "no data connection within timeout",
                ))
            }
        };

        let DataTask {
            direction,
            outbound,
            inbound,
            completion,
        } = self;
        let direction = match direction.await {
            Ok(direction) => direction,
            Err(_) => {
                trace!("Passive transfer abandoned before a direction was set");
                return;
            }
        };
        let result = exchange(stream, direction, outbound).await;
        deliver(result, inbound, completion);
    }

    /// Active mode: wait for the direction, then dial the peer.
    async fn run_active(self, target: SocketAddrV4) {
        let DataTask {
            direction,
            outbound,
            inbound,
            completion,
        } = self;
        let direction = match direction.await {
            Ok(direction) => direction,
            Err(_) => {
                trace!("Active transfer abandoned before a direction was set");
                return;
            }
        };
        let result = match TcpStream::connect(target).await {
            Ok(stream) => {
                debug!("Connected data connection to {}", target);
                exchange(stream, direction, outbound).await
            }
            Err(e) => Err(e),
        };
        deliver(result, inbound, completion);
    }

    fn fail(self, error: io::Error) {
        warn!("Data connection failed: {}", error);
        let _ = self.completion.send(Err(error));
    }
}

async fn exchange(
    mut stream: TcpStream,
    direction: Direction,
    outbound: oneshot::Receiver<Vec<u8>>,
) -> io::Result<Option<Vec<u8>>> {
    match direction {
        Direction::Download => {
            let payload = outbound.await.map_err(|_| {
                io::Error::new(io::ErrorKind::BrokenPipe, "payload was never handed over")
            })?;
            stream.write_all(&payload).await?;
            stream.shutdown().await?;
            trace!("Sent {} bytes on data connection", payload.len());
            Ok(None)
        }
        Direction::Upload => {
            let mut buffer = Vec::new();
            stream.read_to_end(&mut buffer).await?;
            trace!("Received {} bytes on data connection", buffer.len());
            Ok(Some(buffer))
        }
    }
}

fn deliver(
    result: io::Result<Option<Vec<u8>>>,
    inbound: oneshot::Sender<Vec<u8>>,
    completion: oneshot::Sender<io::Result<()>>,
) {
    match result {
        Ok(Some(buffer)) => {
            let _ = completion.send(Ok(()));
            let _ = inbound.send(buffer);
        }
        Ok(None) => {
            let _ = completion.send(Ok(()));
        }
        Err(e) => {
            warn!("Data transfer failed: {}", e);
            let _ = completion.send(Err(e));
        }
    }
}

/// Per-session data connection state: at most one pending transfer.
#[derive(Default)]
pub struct DataChannel {
    pending: Option<Rendezvous>,
}

impl DataChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the pending transfer, if any, and aborts its task.
    pub fn reset(&mut self) {
        self.pending = None;
    }

    pub fn mode(&self) -> Option<DataMode> {
        self.pending.as_ref().map(|rendezvous| rendezvous.mode)
    }

    /// Starts a passive data task and returns the port it listens on.
    pub async fn open_passive(
        &mut self,
        host: Ipv4Addr,
        ports: Option<RangeInclusive<u16>>,
    ) -> Result<u16, TransferError> {
        self.reset();
        let (task, rendezvous) = channel_pair(DataMode::Passive);
        let (port_tx, port_rx) = oneshot::channel::<io::Result<u16>>();

        let handle = tokio::spawn(async move {
            let listener = match setup_pasv_listener(host, ports).await {
                Ok(listener) => listener,
                Err(e) => {
                    let _ = port_tx.send(Err(e));
                    return;
                }
            };
            let port = match listener.local_addr() {
                Ok(addr) => addr.port(),
                Err(e) => {
                    let _ = port_tx.send(Err(e));
                    return;
                }
            };
            if port_tx.send(Ok(port)).is_err() {
                return;
            }
            task.run_passive(listener).await;
        });
        let pending = rendezvous(handle);

        match tokio::time::timeout(PASSIVE_PORT_TIMEOUT, port_rx).await {
            Ok(Ok(Ok(port))) => {
                self.pending = Some(pending);
                Ok(port)
            }
            Ok(Ok(Err(e))) => Err(TransferError::Io(e)),
            Ok(Err(_)) => Err(TransferError::Abandoned),
            Err(_) => Err(TransferError::PassiveTimeout),
        }
    }

    /// Starts an active data task that dials `target` once a transfer begins.
    pub fn open_active(&mut self, target: SocketAddrV4) {
        self.reset();
        let (task, rendezvous) = channel_pair(DataMode::Active);
        let handle = tokio::spawn(task.run_active(target));
        self.pending = Some(rendezvous(handle));
    }

    /// Hands `payload` to the data task and waits until the peer has it.
    pub async fn send(&mut self, payload: Vec<u8>) -> Result<(), TransferError> {
        let Rendezvous {
            direction,
            outbound,
            completion,
            task: _task,
            ..
        } = self.pending.take().ok_or(TransferError::NotPrepared)?;

        if direction.send(Direction::Download).is_err() || outbound.send(payload).is_err() {
            return Err(failure(completion).await);
        }
        match completion.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(TransferError::Io(e)),
            Err(_) => Err(TransferError::Abandoned),
        }
    }

    /// Waits until the peer has sent everything and returns the bytes.
    pub async fn receive(&mut self) -> Result<Vec<u8>, TransferError> {
        let Rendezvous {
            direction,
            inbound,
            completion,
            task: _task,
            ..
        } = self.pending.take().ok_or(TransferError::NotPrepared)?;

        if direction.send(Direction::Upload).is_err() {
            return Err(failure(completion).await);
        }
        match completion.await {
            Ok(Ok(())) => inbound.await.map_err(|_| TransferError::Abandoned),
            Ok(Err(e)) => Err(TransferError::Io(e)),
            Err(_) => Err(TransferError::Abandoned),
        }
    }
}

/// The data task stopped listening; its completion status says why.
async fn failure(completion: oneshot::Receiver<io::Result<()>>) -> TransferError {
    match completion.await {
        Ok(Err(e)) => TransferError::Io(e),
        _ => TransferError::Abandoned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_transfer_without_preparation_is_rejected() {
        let mut channel = DataChannel::new();
        assert!(matches!(
            channel.send(b"data".to_vec()).await,
            Err(TransferError::NotPrepared)
        ));
        assert!(matches!(
            channel.receive().await,
            Err(TransferError::NotPrepared)
        ));
    }

    #[tokio::test]
    async fn test_passive_download() {
        let mut channel = DataChannel::new();
        let port = channel.open_passive(Ipv4Addr::LOCALHOST, None).await.unwrap();
        assert_eq!(channel.mode(), Some(DataMode::Passive));

        let peer = tokio::spawn(async move {
            let mut stream = TcpStream::connect((Ipv4Addr::LOCALHOST, port)).await.unwrap();
            let mut received = Vec::new();
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        channel.send(b"hello, world".to_vec()).await.unwrap();
        assert_eq!(peer.await.unwrap(), b"hello, world");
        assert_eq!(channel.mode(), None);
    }

    #[tokio::test]
    async fn test_passive_upload() {
        let mut channel = DataChannel::new();
        let port = channel.open_passive(Ipv4Addr::LOCALHOST, None).await.unwrap();

        let peer = tokio::spawn(async move {
            let mut stream = TcpStream::connect((Ipv4Addr::LOCALHOST, port)).await.unwrap();
            stream.write_all(b"uploaded bytes").await.unwrap();
            stream.shutdown().await.unwrap();
        });

        let received = channel.receive().await.unwrap();
        peer.await.unwrap();
        assert_eq!(received, b"uploaded bytes");
    }

    #[tokio::test]
    async fn test_active_download() {
        let peer_listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let target = match peer_listener.local_addr().unwrap() {
            std::net::SocketAddr::V4(addr) => addr,
            other => panic!("unexpected address {}", other),
        };
        let peer = tokio::spawn(async move {
            let (mut stream, _) = peer_listener.accept().await.unwrap();
            let mut received = Vec::new();
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        let mut channel = DataChannel::new();
        channel.open_active(target);
        assert_eq!(channel.mode(), Some(DataMode::Active));
        channel.send(b"active payload".to_vec()).await.unwrap();
        assert_eq!(peer.await.unwrap(), b"active payload");
    }

    #[tokio::test]
    async fn test_active_dial_failure_is_reported() {
        let spare = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let target = match spare.local_addr().unwrap() {
            std::net::SocketAddr::V4(addr) => addr,
            other => panic!("unexpected address {}", other),
        };
        drop(spare);

        let mut channel = DataChannel::new();
        channel.open_active(target);
        assert!(matches!(
            channel.receive().await,
            Err(TransferError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_reset_discards_pending_transfer() {
        let mut channel = DataChannel::new();
        channel.open_passive(Ipv4Addr::LOCALHOST, None).await.unwrap();
        channel.open_passive(Ipv4Addr::LOCALHOST, None).await.unwrap();
        assert_eq!(channel.mode(), Some(DataMode::Passive));

        channel.reset();
        assert_eq!(channel.mode(), None);
        assert!(matches!(
            channel.send(Vec::new()).await,
            Err(TransferError::NotPrepared)
        ));
    }

    #[tokio::test]
    async fn test_new_transfer_after_failed_one() {
        let spare = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let closed = match spare.local_addr().unwrap() {
            std::net::SocketAddr::V4(addr) => addr,
            other => panic!("unexpected address {}", other),
        };
        drop(spare);

        let mut channel = DataChannel::new();
        channel.open_active(closed);
        assert!(channel.send(b"lost".to_vec()).await.is_err());
        assert_eq!(channel.mode(), None);

        let port = channel.open_passive(Ipv4Addr::LOCALHOST, None).await.unwrap();
        let peer = tokio::spawn(async move {
            let mut stream = TcpStream::connect((Ipv4Addr::LOCALHOST, port)).await.unwrap();
            let mut received = Vec::new();
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        channel.send(b"second try".to_vec()).await.unwrap();
        assert_eq!(peer.await.unwrap(), b"second try");
    }
}

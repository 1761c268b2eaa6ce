pub mod connection;
pub mod data_channel;
pub mod error;
pub mod network;
pub mod pasv;
pub mod port;

pub use connection::{FtpConnection, StreamConnection};
pub use error::{HostPortError, TransferError};

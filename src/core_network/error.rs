// Data connection errors
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("No data connection prepared; send PASV or PORT first")]
    NotPrepared,

    #[error("Timed out waiting for the passive listener")]
    PassiveTimeout,

    #[error("Data connection task ended before completing the transfer")]
    Abandoned,

    #[error("Data connection failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HostPortError {
    #[error("Expected six comma separated numbers, got {0}")]
    FieldCount(usize),

    #[error("Invalid number in host/port argument: {0:?}")]
    InvalidNumber(String),
}

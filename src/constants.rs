// src/constants.rs

use std::time::Duration;

pub const USERNAME_REGEX: &str = r"^[a-zA-Z0-9_.-]{1,32}$";

/// Transfer type selected for every new session ("ASCII NON PRINT").
pub const DEFAULT_TRANSFER_TYPE: &str = "AN";

/// strftime pattern of MDTM replies.
pub const MOD_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

pub const DEFAULT_CONFIG_PATH: &str = "/etc/easyftpd.conf";

/// How long PASV waits for the data task to report its listening port.
pub const PASSIVE_PORT_TIMEOUT: Duration = Duration::from_secs(1);

/// How long a passive listener waits for the peer to connect.
pub const DATA_CONNECTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Random ports tried before PASV gives up on a configured port range.
pub const PASSIVE_BIND_ATTEMPTS: usize = 16;

/// Longest command line accepted on the control connection, terminator included.
pub const MAX_COMMAND_LINE: usize = 8192;

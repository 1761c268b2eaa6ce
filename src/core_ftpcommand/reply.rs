use std::fmt;

/// The reply codes this server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyCode {
    TransferReady = 125,
    TransferStart = 150,
    Ok = 200,
    FileInfo = 213,
    SystemType = 215,
    ServiceReady = 220,
    CloseConnection = 221,
    TransferDone = 226,
    PassiveMode = 227,
    Authenticated = 230,
    WorkingDirectory = 257,
    NeedPassword = 331,
    NeedAccount = 332,
    TransferAbort = 426,
    ActionNotTaken = 450,
    LocalError = 451,
    SyntaxError = 500,
    SyntaxParamError = 501,
    NotImplemented = 502,
    BadSequence = 503,
    NotLoggedIn = 530,
}

/// Default reply texts, keyed by code.
const REPLY_TEXTS: &[(ReplyCode, &str)] = &[
    (ReplyCode::TransferReady, "Data connection already open; transfer starting"),
    (ReplyCode::TransferStart, "Opening data connection"),
    (ReplyCode::Ok, "Command okay"),
    (ReplyCode::FileInfo, "File status"),
    (ReplyCode::SystemType, "UNIX Type: L8"),
    (ReplyCode::ServiceReady, "FTP Service ready"),
    (ReplyCode::CloseConnection, "Service closing control connection"),
    (ReplyCode::TransferDone, "Closing data connection"),
    (ReplyCode::PassiveMode, "Entering Passive Mode"),
    (ReplyCode::Authenticated, "User logged in, proceed"),
    (ReplyCode::WorkingDirectory, "Working directory"),
    (ReplyCode::NeedPassword, "User name okay, need password"),
    (ReplyCode::NeedAccount, "Need account for login"),
    (ReplyCode::TransferAbort, "Connection closed; transfer aborted"),
    (ReplyCode::ActionNotTaken, "Requested file action not taken; file unavailable"),
    (ReplyCode::LocalError, "Requested action aborted; local error in processing"),
    (ReplyCode::SyntaxError, "Syntax error"),
    (ReplyCode::SyntaxParamError, "Syntax error in parameters or arguments"),
    (ReplyCode::NotImplemented, "Command not implemented"),
    (ReplyCode::BadSequence, "Bad sequence of commands"),
    (ReplyCode::NotLoggedIn, "Not logged in"),
];

impl ReplyCode {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn default_text(self) -> &'static str {
        REPLY_TEXTS
            .iter()
            .find(|(code, _)| *code == self)
            .map_or("", |(_, text)| text)
    }
}

/// One control connection reply line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: ReplyCode,
    pub text: String,
}

impl Reply {
    pub fn new(code: ReplyCode) -> Self {
        Self {
            code,
            text: code.default_text().to_string(),
        }
    }

    pub fn with_text(code: ReplyCode, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }

    /// Wire form, CRLF terminated.
    pub fn to_line(&self) -> String {
        format!("{}\r\n", self)
    }
}

impl From<ReplyCode> for Reply {
    fn from(code: ReplyCode) -> Self {
        Reply::new(code)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code.code(), self.text)
    }
}

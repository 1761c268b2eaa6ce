// Error handling for user store loading
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to read user file {path}: {source}")]
    UserFileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write user file {path}: {source}")]
    UserFileWrite {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse user file: {0}")]
    UserFileParse(#[from] toml::de::Error),

    #[error("Failed to serialize user file: {0}")]
    UserFileSerialize(#[from] toml::ser::Error),

    #[error("Invalid user name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid user name: {0}")]
    InvalidUsername(String),

    #[error("Home directory of user {0} is not absolute")]
    RelativeHome(String),

    #[error("Failed to hash password of user {user}: {source}")]
    Hash {
        user: String,
        source: bcrypt::BcryptError,
    },
}

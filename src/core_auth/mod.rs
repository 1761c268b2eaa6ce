pub mod core_auth;
pub mod error;
pub mod helper;
pub mod user_file;

pub use core_auth::{DefaultUserStore, User, UserStore};
pub use error::AuthError;
pub use user_file::FileUserStore;

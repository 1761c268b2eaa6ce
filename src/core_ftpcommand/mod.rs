// Here's the list of the FTP commands implemented
pub mod cwd;
pub mod list;
pub mod mdtm;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod size;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

pub mod ftpcommand;
pub mod handlers;
pub mod reply;

// The utils and common functions are here
pub mod transfer;
pub mod utils;

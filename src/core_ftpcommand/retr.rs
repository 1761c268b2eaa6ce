use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_ftpcommand::transfer::send_payload;
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};
use std::io;

/// Handles the RETR (Retrieve) FTP command.
///
/// The whole file is read before the transfer starts and is then handed to
/// the pending data connection.
///
/// # Arguments
///
/// * `conn` - The client connection.
/// * `_ctx` - The shared server context (not used in this command).
/// * `session` - The session of this connection.
/// * `arg` - The name of the file to retrieve.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_retr_command<C>(
    conn: &mut C,
    _ctx: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    let path = match session.resolve_path(arg).await {
        Some(path) => path,
        None => {
            warn!("{} RETR outside of home directory: {}", session.tag(), arg);
            return conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await;
        }
    };

    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) => {
            warn!("{} Failed to read {:?}: {}", session.tag(), path, e);
            return conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await;
        }
    };

    if send_payload(conn, session, content).await? {
        info!("{} File {:?} sent", session.tag(), path);
    }
    Ok(())
}

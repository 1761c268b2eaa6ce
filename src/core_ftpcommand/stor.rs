use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_ftpcommand::transfer::receive_payload;
use crate::core_groups::{EntryKind, GroupPermission};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info, warn};
use std::io;

/// Handles the STOR (Store) FTP command.
///
/// Needs the create file permission. The upload is received completely
/// and then written over any existing file.
///
/// # Arguments
///
/// * `conn` - The client connection.
/// * `_ctx` - The shared server context (not used in this command).
/// * `session` - The session of this connection.
/// * `arg` - The name of the file to store.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_stor_command<C>(
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
            warn!("{} STOR outside of home directory: {}", session.tag(), arg);
            return conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await;
        }
    };

    if !session.permits(GroupPermission::Create, EntryKind::File) {
        warn!("{} STOR denied for {:?}", session.tag(), path);
        return conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await;
    }

    let content = match receive_payload(conn, session).await? {
        Some(content) => content,
        None => return Ok(()),
    };

    match tokio::fs::write(&path, &content).await {
        Ok(()) => {
            info!("{} Stored {} bytes in {:?}", session.tag(), content.len(), path);
            Ok(())
        }
        Err(e) => {
            error!("{} Failed to write {:?}: {}", session.tag(), path, e);
            conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await
        }
    }
}

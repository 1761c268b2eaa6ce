use crate::constants::MOD_TIME_FORMAT;
use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use chrono::{DateTime, Utc};
use log::warn;
use std::io;

/// Handles the MDTM FTP command: the modification time of a file, in UTC.
pub async fn handle_mdtm_command<C>(
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
        None => return conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await,
    };

    let modified = match tokio::fs::metadata(&path).await.and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(e) => {
            warn!("{} MDTM failed for {:?}: {}", session.tag(), path, e);
            return conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await;
        }
    };

    let timestamp = DateTime::<Utc>::from(modified)
        .format(MOD_TIME_FORMAT)
        .to_string();
    conn.respond(Reply::with_text(ReplyCode::FileInfo, timestamp))
        .await
}

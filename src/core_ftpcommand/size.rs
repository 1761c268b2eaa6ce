use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use log::warn;
use std::io;

pub async fn handle_size_command<C>(
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

    match tokio::fs::metadata(&path).await {
        Ok(metadata) => {
            conn.respond(Reply::with_text(
                ReplyCode::FileInfo,
                metadata.len().to_string(),
            ))
            .await
        }
        Err(e) => {
            warn!("{} SIZE failed for {:?}: {}", session.tag(), path, e);
            conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await
        }
    }
}

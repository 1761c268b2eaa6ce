use crate::core_ftpcommand::pwd::working_directory_text;
use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};
use std::io;

pub async fn handle_cwd_command<C>(
    conn: &mut C,
    _ctx: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    let new_dir = match session.resolve_path(arg).await {
        Some(dir) => dir,
        None => {
            warn!("{} CWD outside of home directory: {}", session.tag(), arg);
            return conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await;
        }
    };

    let is_dir = tokio::fs::metadata(&new_dir)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);
    if !is_dir {
        warn!("{} CWD to a missing directory: {:?}", session.tag(), new_dir);
        return conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await;
    }

    info!("{} Changed directory to {:?}", session.tag(), new_dir);
    let text = working_directory_text(&new_dir);
    session.current_dir = new_dir;
    conn.respond(Reply::with_text(ReplyCode::WorkingDirectory, text))
        .await
}

use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use log::info;
use std::io;

/// Handles the QUIT FTP command. The control loop stops after the reply.
pub async fn handle_quit_command<C>(
    conn: &mut C,
    _ctx: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    info!("{} Client quit", session.tag());
    session.keep_alive = false;
    conn.respond(Reply::new(ReplyCode::CloseConnection)).await
}

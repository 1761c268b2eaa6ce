use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};
use std::io;

/// Handles the USER FTP command.
///
/// Any previous login is dropped. A known username becomes the pending user
/// and the client is asked for its password.
///
/// # Arguments
///
/// * `conn` - The client connection.
/// * `_ctx` - The shared server context (not used in this command).
/// * `session` - The session of this connection.
/// * `username` - The username provided by the client.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_user_command<C>(
    conn: &mut C,
    _ctx: &ServerContext,
    session: &mut Session,
    username: &str,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    session.logout();

    let username = username.trim();
    if username.is_empty() {
        session.pending_user = None;
        warn!("{} USER command received without a username", session.tag());
        return conn.respond(Reply::new(ReplyCode::SyntaxParamError)).await;
    }

    if session.users().find_user(username).is_some() {
        info!("{} Username accepted: {}", session.tag(), username);
        session.pending_user = Some(username.to_string());
        conn.respond(Reply::new(ReplyCode::NeedPassword)).await
    } else {
        warn!("{} Unknown username: {}", session.tag(), username);
        session.pending_user = None;
        conn.respond(Reply::new(ReplyCode::NotLoggedIn)).await
    }
}

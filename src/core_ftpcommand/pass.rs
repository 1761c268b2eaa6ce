use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};
use std::io;

/// Handles the PASS FTP command.
///
/// The password is checked against the user named by USER. A failed attempt
/// is answered only after the configured delay.
///
/// # Arguments
///
/// * `conn` - The client connection.
/// * `ctx` - The shared server context.
/// * `session` - The session of this connection.
/// * `password` - The password provided by the client. It is never logged.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_pass_command<C>(
    conn: &mut C,
    ctx: &ServerContext,
    session: &mut Session,
    password: &str,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    let user = match session
        .pending_user
        .as_deref()
        .and_then(|name| session.users().find_user(name))
    {
        Some(user) => user.clone(),
        None => {
            warn!("{} PASS command received before USER", session.tag());
            session.pending_user = None;
            return conn.respond(Reply::new(ReplyCode::NeedAccount)).await;
        }
    };

    // bcrypt blocks, keep it off the reactor threads.
    let home = user.home_dir().to_path_buf();
    let password = password.to_string();
    let authenticated = tokio::task::spawn_blocking(move || user.auth(&password))
        .await
        .unwrap_or(false);

    if authenticated {
        let name = session.pending_user.take().unwrap_or_default();
        info!("{} User {} logged in, home {:?}", session.tag(), name, home);
        session.login(name, &home);
        conn.respond(Reply::new(ReplyCode::Authenticated)).await
    } else {
        warn!(
            "{} Authentication failed for {}",
            session.tag(),
            session.pending_user.as_deref().unwrap_or_default()
        );
        tokio::time::sleep(ctx.config.login_failure_delay()).await;
        conn.respond(Reply::new(ReplyCode::NotLoggedIn)).await
    }
}

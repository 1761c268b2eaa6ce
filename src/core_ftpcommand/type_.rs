use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_ftpcommand::utils::{encode_transfer_type, normalize_transfer_type};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};
use std::io;

/// Handles the TYPE FTP command.
///
/// Only records the transfer type; payloads always go over the wire as
/// they are stored.
pub async fn handle_type_command<C>(
    conn: &mut C,
    _ctx: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    let code = normalize_transfer_type(arg);
    match encode_transfer_type(&code) {
        Some(description) => {
            info!("{} Transfer type set to {}", session.tag(), description);
            session.transfer_type = code;
            let text = format!("TYPE set to {}", description);
            conn.respond(Reply::with_text(ReplyCode::Ok, text)).await
        }
        None => {
            warn!("{} Invalid transfer type: {}", session.tag(), arg);
            conn.respond(Reply::new(ReplyCode::SyntaxParamError)).await
        }
    }
}

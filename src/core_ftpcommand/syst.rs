use crate::constants::DEFAULT_TRANSFER_TYPE;
use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_ftpcommand::utils::encode_transfer_type;
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use std::io;

/// Handles the SYST FTP command: the configured system name and the
/// default transfer type.
pub async fn handle_syst_command<C>(
    conn: &mut C,
    ctx: &ServerContext,
    _session: &mut Session,
    _arg: &str,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    let transfer_type = encode_transfer_type(DEFAULT_TRANSFER_TYPE).unwrap_or_default();
    let text = format!("{} Type: {}", ctx.config.system_name, transfer_type);
    conn.respond(Reply::with_text(ReplyCode::SystemType, text)).await
}

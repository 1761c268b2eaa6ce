use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{cwd, list, mdtm, pass, pwd, quit, retr, size, stor, syst, type_, user};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use std::io;

// Specific crates for PORT and PASV commands
use crate::core_network::pasv;
use crate::core_network::port;

/// Runs the handler of `command`. Errors are control connection failures;
/// protocol errors have already been answered with a reply.
pub async fn dispatch_command<C>(
    command: FtpCommand,
    conn: &mut C,
    ctx: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    match command {
        FtpCommand::USER => user::handle_user_command(conn, ctx, session, arg).await,
        FtpCommand::PASS => pass::handle_pass_command(conn, ctx, session, arg).await,
        FtpCommand::SYST => syst::handle_syst_command(conn, ctx, session, arg).await,
        FtpCommand::PWD => pwd::handle_pwd_command(conn, ctx, session, arg).await,
        FtpCommand::CWD => cwd::handle_cwd_command(conn, ctx, session, arg).await,
        FtpCommand::TYPE => type_::handle_type_command(conn, ctx, session, arg).await,
        FtpCommand::MDTM => mdtm::handle_mdtm_command(conn, ctx, session, arg).await,
        FtpCommand::SIZE => size::handle_size_command(conn, ctx, session, arg).await,
        FtpCommand::RETR => retr::handle_retr_command(conn, ctx, session, arg).await,
        FtpCommand::STOR => stor::handle_stor_command(conn, ctx, session, arg).await,
        FtpCommand::PASV => pasv::handle_pasv_command(conn, ctx, session, arg).await,
        FtpCommand::PORT => port::handle_port_command(conn, ctx, session, arg).await,
        FtpCommand::NLST => list::handle_nlst_command(conn, ctx, session, arg).await,
        FtpCommand::LIST => list::handle_list_command(conn, ctx, session, arg).await,
        FtpCommand::QUIT => quit::handle_quit_command(conn, ctx, session, arg).await,
    }
}

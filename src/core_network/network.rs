use crate::core_ftpcommand::ftpcommand::{parse_command_line, FtpCommand};
use crate::core_ftpcommand::handlers::dispatch_command;
use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_network::connection::{FtpConnection, StreamConnection};
use crate::server::ServerContext;
use crate::session::Session;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;

pub async fn start_server(ctx: Arc<ServerContext>) -> Result<()> {
    let address = (ctx.config.listen_address.as_str(), ctx.config.listen_port);
    let listener = TcpListener::bind(address).await.with_context(|| {
        format!(
            "Failed to listen on {}:{}",
            ctx.config.listen_address, ctx.config.listen_port
        )
    })?;
    info!("Server listening on {}", listener.local_addr()?);

    serve(listener, ctx).await
}

/// Accepts control connections forever, one task per client.
pub async fn serve(listener: TcpListener, ctx: Arc<ServerContext>) -> Result<()> {
    let mut next_id: usize = 0;
    loop {
        let (socket, addr) = listener.accept().await?;
        next_id += 1;
        let id = next_id;
        info!("[#{}] New connection from {}", id, addr);

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let mut conn = StreamConnection::new(socket, id);
            if let Err(e) = handle_connection(&mut conn, &ctx, id).await {
                error!("[#{}] Connection error: {}", id, e);
            }
            info!("[#{}] Connection closed for {}", id, addr);
        });
    }
}

/// The control loop of one client: greets it, then reads and dispatches
/// commands until QUIT or until the connection fails.
pub async fn handle_connection<C>(conn: &mut C, ctx: &ServerContext, id: usize) -> io::Result<()>
where
    C: FtpConnection,
{
    let mut session = Session::new(id, Arc::clone(&ctx.users));
    conn.respond(Reply::with_text(
        ReplyCode::ServiceReady,
        ctx.config.motd.as_str(),
    ))
    .await?;

    while session.keep_alive {
        let line = match conn.read_command().await {
            Ok(line) => line,
            Err(e) => {
                debug!("{} Control connection ended: {}", session.tag(), e);
                break;
            }
        };

        let (verb, arg) = parse_command_line(&line);
        if verb.is_empty() {
            conn.respond(Reply::new(ReplyCode::SyntaxError)).await?;
            continue;
        }

        if verb == "PASS" {
            debug!("{} REQUEST PASS ****", session.tag());
        } else {
            debug!("{} REQUEST {}", session.tag(), line);
        }

        let command = verb.parse::<FtpCommand>().ok();
        let allowed = session.is_authenticated()
            || command.map_or(false, FtpCommand::allowed_before_login);
        if !allowed {
            warn!("{} {} refused before login", session.tag(), verb);
            conn.respond(Reply::new(ReplyCode::NeedAccount)).await?;
            continue;
        }

        match command {
            Some(command) => dispatch_command(command, conn, ctx, &mut session, arg).await?,
            None => {
                warn!("{} Command not implemented: {}", session.tag(), verb);
                conn.respond(Reply::new(ReplyCode::NotImplemented)).await?;
            }
        }
    }

    conn.reset();
    Ok(())
}

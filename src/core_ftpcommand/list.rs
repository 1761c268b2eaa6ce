use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_ftpcommand::transfer::send_payload;
use crate::core_groups::{EntryKind, GroupPermission};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, warn};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListingKind {
    Detailed,
    Names,
}

/// The directory to list. No argument, or `ls` style flags such as `-la`,
/// list the current directory.
async fn listing_target(session: &Session, arg: &str) -> Option<PathBuf> {
    let arg = arg.trim();
    if arg.is_empty() || arg.starts_with('-') {
        Some(session.current_dir.clone())
    } else {
        session.resolve_path(arg).await
    }
}

async fn send_listing<C>(
    conn: &mut C,
    ctx: &ServerContext,
    session: &mut Session,
    arg: &str,
    kind: ListingKind,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    let dir = match listing_target(session, arg).await {
        Some(dir) => dir,
        None => {
            warn!("{} Listing outside of home directory: {}", session.tag(), arg);
            return conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await;
        }
    };

    if !session.permits(GroupPermission::Handle, EntryKind::Dir) {
        warn!("{} Listing denied for {:?}", session.tag(), dir);
        return conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await;
    }

    let listing = match kind {
        ListingKind::Detailed => ctx.lister.list(&dir).await,
        ListingKind::Names => ctx.lister.name_list(&dir).await,
    };
    let listing = match listing {
        Ok(listing) => listing,
        Err(e) => {
            error!("{} Failed to list {:?}: {}", session.tag(), dir, e);
            return conn.respond(Reply::new(ReplyCode::LocalError)).await;
        }
    };

    send_payload(conn, session, listing).await?;
    Ok(())
}

/// Handles the LIST FTP command.
pub async fn handle_list_command<C>(
    conn: &mut C,
    ctx: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    send_listing(conn, ctx, session, arg, ListingKind::Detailed).await
}

/// Handles the NLST FTP command.
pub async fn handle_nlst_command<C>(
    conn: &mut C,
    ctx: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    send_listing(conn, ctx, session, arg, ListingKind::Names).await
}

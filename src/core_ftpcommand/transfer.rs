use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_network::connection::FtpConnection;
use crate::core_network::data_channel::DataMode;
use crate::session::Session;
use log::{info, warn};
use std::io;

fn start_reply(mode: DataMode) -> Reply {
    match mode {
        DataMode::Passive => Reply::new(ReplyCode::TransferReady),
        DataMode::Active => Reply::new(ReplyCode::TransferStart),
    }
}

/// Checks that PASV or PORT prepared a transfer and announces its start.
async fn begin_transfer<C>(conn: &mut C, session: &Session) -> io::Result<bool>
where
    C: FtpConnection + ?Sized,
{
    match conn.data_mode() {
        Some(mode) => {
            conn.respond(start_reply(mode)).await?;
            Ok(true)
        }
        None => {
            warn!("{} Transfer requested without PASV or PORT", session.tag());
            conn.respond(Reply::new(ReplyCode::BadSequence)).await?;
            Ok(false)
        }
    }
}

/// Sends `payload` to the peer. Returns whether the transfer completed.
pub async fn send_payload<C>(conn: &mut C, session: &Session, payload: Vec<u8>) -> io::Result<bool>
where
    C: FtpConnection + ?Sized,
{
    if !begin_transfer(conn, session).await? {
        return Ok(false);
    }
    let size = payload.len();
    match conn.send(payload).await {
        Ok(()) => {
            info!("{} Sent {} bytes", session.tag(), size);
            conn.respond(Reply::new(ReplyCode::TransferDone)).await?;
            Ok(true)
        }
        Err(e) => {
            warn!("{} Transfer aborted: {}", session.tag(), e);
            conn.respond(Reply::new(ReplyCode::TransferAbort)).await?;
            Ok(false)
        }
    }
}

/// Receives everything the peer sends; `None` when the transfer failed.
pub async fn receive_payload<C>(conn: &mut C, session: &Session) -> io::Result<Option<Vec<u8>>>
where
    C: FtpConnection + ?Sized,
{
    if !begin_transfer(conn, session).await? {
        return Ok(None);
    }
    match conn.receive().await {
        Ok(payload) => {
            info!("{} Received {} bytes", session.tag(), payload.len());
            conn.respond(Reply::new(ReplyCode::TransferDone)).await?;
            Ok(Some(payload))
        }
        Err(e) => {
            warn!("{} Transfer aborted: {}", session.tag(), e);
            conn.respond(Reply::new(ReplyCode::TransferAbort)).await?;
            Ok(None)
        }
    }
}

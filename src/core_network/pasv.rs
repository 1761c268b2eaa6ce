use crate::constants::PASSIVE_BIND_ATTEMPTS;
use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, error, info};
use rand::Rng;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::ops::RangeInclusive;
use tokio::net::TcpListener;

/// Formats an address the way PASV replies carry it: `h1,h2,h3,h4,p1,p2`.
pub fn encode_host(addr: SocketAddrV4) -> String {
    let [h1, h2, h3, h4] = addr.ip().octets();
    format!(
        "{},{},{},{},{},{}",
        h1,
        h2,
        h3,
        h4,
        addr.port() / 256,
        addr.port() % 256
    )
}

/// Binds the passive listener. Without a port range the OS picks an
/// ephemeral port, otherwise random ports from the range are tried.
pub async fn setup_pasv_listener(
    pasv_ip: Ipv4Addr,
    ports: Option<RangeInclusive<u16>>,
) -> std::io::Result<TcpListener> {
    let ports = match ports {
        Some(ports) => ports,
        None => return TcpListener::bind((pasv_ip, 0)).await,
    };

    let mut last_error = None;
    for _ in 0..PASSIVE_BIND_ATTEMPTS {
        let port = rand::thread_rng().gen_range(ports.clone());
        match TcpListener::bind((pasv_ip, port)).await {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                debug!("Passive port {} unavailable: {}", port, e);
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::AddrInUse, "no passive port available")
    }))
}

/// Handles the PASV FTP command.
///
/// Any pending transfer is dropped and a new passive listener is announced
/// with the configured passive address.
pub async fn handle_pasv_command<C>(
    conn: &mut C,
    ctx: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> std::io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    conn.reset();
    match conn.set_passive(ctx.pasv_ip, ctx.config.passive_ports()).await {
        Ok(port) => {
            let addr = SocketAddrV4::new(ctx.pasv_ip, port);
            info!("{} Passive mode on {}", session.tag(), addr);
            let text = format!("Entering Passive Mode ({})", encode_host(addr));
            conn.respond(Reply::with_text(ReplyCode::PassiveMode, text))
                .await
        }
        Err(e) => {
            error!("{} Failed to enter passive mode: {}", session.tag(), e);
            conn.reset();
            conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_host() {
        let addr: SocketAddrV4 = "10.0.0.1:2121".parse().unwrap();
        assert_eq!(encode_host(addr), "10,0,0,1,8,77");
        let addr: SocketAddrV4 = "127.0.0.1:255".parse().unwrap();
        assert_eq!(encode_host(addr), "127,0,0,1,0,255");
    }

    #[tokio::test]
    async fn test_ephemeral_listener() {
        let listener = setup_pasv_listener(Ipv4Addr::LOCALHOST, None).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_listener_within_range() {
        let spare = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = spare.local_addr().unwrap().port();
        drop(spare);

        let listener = setup_pasv_listener(Ipv4Addr::LOCALHOST, Some(port..=port))
            .await
            .unwrap();
        assert_eq!(listener.local_addr().unwrap().port(), port);
    }
}

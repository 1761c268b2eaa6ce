use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_network::connection::FtpConnection;
use crate::core_network::error::HostPortError;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};
use std::net::{Ipv4Addr, SocketAddrV4};

/// Parses a PORT argument (`h1,h2,h3,h4,p1,p2`) into the address to dial.
pub fn parse_host(arg: &str) -> Result<SocketAddrV4, HostPortError> {
    let parts: Vec<&str> = arg.trim().split(',').collect();
    if parts.len() != 6 {
        return Err(HostPortError::FieldCount(parts.len()));
    }

    let mut numbers = [0u8; 6];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse::<u8>()
            .map_err(|_| HostPortError::InvalidNumber(part.to_string()))?;
    }

    let ip = Ipv4Addr::new(numbers[0], numbers[1], numbers[2], numbers[3]);
    let port = (numbers[4] as u16) << 8 | numbers[5] as u16;
    Ok(SocketAddrV4::new(ip, port))
}

/// Handles the PORT FTP command: the next transfer dials the given address.
pub async fn handle_port_command<C>(
    conn: &mut C,
    _ctx: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> std::io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    let target = match parse_host(arg) {
        Ok(target) => target,
        Err(e) => {
            warn!("{} Invalid PORT argument {:?}: {}", session.tag(), arg, e);
            return conn.respond(Reply::new(ReplyCode::SyntaxParamError)).await;
        }
    };

    conn.reset();
    conn.set_active(target);
    info!("{} Active mode to {}", session.tag(), target);
    conn.respond(Reply::with_text(ReplyCode::Ok, "PORT command successful"))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_network::pasv::encode_host;

    #[test]
    fn test_parse_host() {
        let addr = parse_host("10,0,0,1,8,77").unwrap();
        assert_eq!(addr.to_string(), "10.0.0.1:2121");
        assert_eq!(addr.port(), 8 * 256 + 77);
    }

    #[test]
    fn test_encoding_is_inverse_of_parsing() {
        let addr: SocketAddrV4 = "10.0.0.1:2121".parse().unwrap();
        assert_eq!(parse_host(&encode_host(addr)).unwrap(), addr);
        assert_eq!(encode_host(parse_host("192,168,1,20,117,48").unwrap()), "192,168,1,20,117,48");
    }

    #[test]
    fn test_malformed_arguments() {
        assert_eq!(parse_host("10,0,0,1,8"), Err(HostPortError::FieldCount(5)));
        assert_eq!(parse_host(""), Err(HostPortError::FieldCount(1)));
        assert_eq!(
            parse_host("10,0,0,256,8,77"),
            Err(HostPortError::InvalidNumber("256".to_string()))
        );
        assert!(parse_host("a,b,c,d,e,f").is_err());
    }
}

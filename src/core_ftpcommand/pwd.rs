// src/core_ftpcommand/pwd.rs
use crate::core_ftpcommand::reply::{Reply, ReplyCode};
use crate::core_groups::{EntryKind, GroupPermission};
use crate::core_network::connection::FtpConnection;
use crate::server::ServerContext;
use crate::session::Session;
use std::io;
use std::path::Path;

/// `"<dir>" is working directory.`, with embedded quotes doubled.
pub fn working_directory_text(dir: &Path) -> String {
    let dir = dir.display().to_string();

    // Most FTP clients expect UNIX separators.
    #[cfg(windows)]
    let dir = dir.replace(std::path::MAIN_SEPARATOR, "/");

    format!("\"{}\" is working directory.", dir.replace('"', "\"\""))
}

pub async fn handle_pwd_command<C>(
    conn: &mut C,
    _ctx: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> io::Result<()>
where
    C: FtpConnection + ?Sized,
{
    if !session.permits(GroupPermission::Handle, EntryKind::Dir) {
        return conn.respond(Reply::new(ReplyCode::ActionNotTaken)).await;
    }
    let text = working_directory_text(&session.current_dir);
    conn.respond(Reply::with_text(ReplyCode::WorkingDirectory, text))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_directory_text() {
        assert_eq!(
            working_directory_text(Path::new("/srv/ftp")),
            "\"/srv/ftp\" is working directory."
        );
        assert_eq!(
            working_directory_text(Path::new("/srv/say \"hi\"")),
            "\"/srv/say \"\"hi\"\"\" is working directory."
        );
    }
}

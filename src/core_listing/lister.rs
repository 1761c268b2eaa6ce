use async_trait::async_trait;
use log::debug;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tokio::process::Command;

/// Produces the bytes sent over the data connection for LIST and NLST.
#[async_trait]
pub trait DirectoryLister: Send + Sync {
    /// Detailed listing of `dir`.
    async fn list(&self, dir: &Path) -> io::Result<Vec<u8>>;

    /// Bare entry names of `dir`, one per line.
    async fn name_list(&self, dir: &Path) -> io::Result<Vec<u8>>;
}

/// Listings produced by the system `ls`.
#[derive(Debug, Clone, Default)]
pub struct LsLister;

#[async_trait]
impl DirectoryLister for LsLister {
    async fn list(&self, dir: &Path) -> io::Result<Vec<u8>> {
        run_ls("-l", dir).await
    }

    async fn name_list(&self, dir: &Path) -> io::Result<Vec<u8>> {
        run_ls("-1", dir).await
    }
}

/// Easily Parsed LIST Format listings; NLST still goes through `ls`.
#[derive(Debug, Clone, Default)]
pub struct EplfLister;

#[async_trait]
impl DirectoryLister for EplfLister {
    async fn list(&self, dir: &Path) -> io::Result<Vec<u8>> {
        build_eplf_listing(dir).await
    }

    async fn name_list(&self, dir: &Path) -> io::Result<Vec<u8>> {
        run_ls("-1", dir).await
    }
}

async fn run_ls(flag: &str, dir: &Path) -> io::Result<Vec<u8>> {
    let output = Command::new("ls").arg(flag).arg(dir).output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("ls {} {:?} failed: {}", flag, dir, stderr.trim());
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("ls exited with {}", output.status),
        ));
    }
    Ok(encode_text(&output.stdout))
}

/// Converts local line endings to the CRLF the protocol expects.
pub fn encode_text(text: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(text.len() + text.len() / 16);
    let mut previous = 0u8;
    for &byte in text {
        if byte == b'\n' && previous != b'\r' {
            encoded.push(b'\r');
        }
        encoded.push(byte);
        previous = byte;
    }
    encoded
}

/// One `+facts,\tname\r\n` line per regular file or directory.
pub async fn build_eplf_listing(dir: &Path) -> io::Result<Vec<u8>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut lines = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_dir() && !metadata.is_file() {
            continue;
        }

        let mut facts = String::from("+");
        if let Some((dev, ino)) = device_and_inode(&metadata) {
            facts.push_str(&format!("i{}.{},", dev, ino));
        }
        if let Some(mtime) = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        {
            facts.push_str(&format!("m{},", mtime.as_secs()));
        }
        if metadata.is_file() {
            facts.push_str(&format!("s{},r,", metadata.len()));
        } else {
            facts.push_str("/,");
        }

        lines.push(format!(
            "{}\t{}\r\n",
            facts,
            entry.file_name().to_string_lossy()
        ));
    }

    lines.sort_by(|a, b| entry_name(a).cmp(entry_name(b)));
    Ok(lines.concat().into_bytes())
}

fn entry_name(line: &str) -> &str {
    line.split_once('\t').map_or(line, |(_, name)| name)
}

#[cfg(unix)]
fn device_and_inode(metadata: &std::fs::Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    Some((metadata.dev(), metadata.ino()))
}

#[cfg(not(unix))]
fn device_and_inode(_metadata: &std::fs::Metadata) -> Option<(u64, u64)> {
    None
}

use crate::config::Config;
use clap::Parser;

/// Command-line arguments. Flags override the configuration file.
#[derive(Parser, Debug, Default)]
#[command(name = "easyftpd", about = "A small FTP server written in Rust.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on
    #[arg(long)]
    pub ip: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Public IPv4 address announced in PASV replies
    #[arg(long)]
    pub pasv_address: Option<String>,

    /// Greeting sent to new clients
    #[arg(long)]
    pub motd: Option<String>,

    /// System name reported by SYST
    #[arg(long)]
    pub system: Option<String>,

    /// Send LIST output in the Easily Parsed LIST Format
    #[arg(long)]
    pub eplf: bool,

    /// TOML file of users and groups
    #[arg(short, long)]
    pub users: Option<String>,

    /// Write hashed passwords back to the users file
    #[arg(long)]
    pub writeback: bool,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn apply(&self, config: &mut Config) {
        let server = &mut config.server;
        if let Some(ip) = &self.ip {
            server.listen_address = ip.clone();
        }
        if let Some(port) = self.port {
            server.listen_port = port;
        }
        if let Some(pasv_address) = &self.pasv_address {
            server.pasv_address = pasv_address.clone();
        }
        if let Some(motd) = &self.motd {
            server.motd = motd.clone();
        }
        if let Some(system) = &self.system {
            server.system_name = system.clone();
        }
        if let Some(users) = &self.users {
            server.users_file = Some(users.clone());
        }
        server.enable_eplf |= self.eplf;
        server.rewrite_users_file |= self.writeback;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "easyftpd",
            "--port",
            "2200",
            "--motd",
            "Hello",
            "--eplf",
            "--users",
            "/etc/easyftpd/users.toml",
        ]);
        let mut config = Config::default();
        config.server.system_name = "LINUX".to_string();
        cli.apply(&mut config);

        assert_eq!(config.server.listen_port, 2200);
        assert_eq!(config.server.motd, "Hello");
        assert_eq!(config.server.system_name, "LINUX");
        assert!(config.server.enable_eplf);
        assert!(!config.server.rewrite_users_file);
        assert_eq!(
            config.server.users_file.as_deref(),
            Some("/etc/easyftpd/users.toml")
        );
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["easyftpd"]);
        let mut config = Config::default();
        config.server.enable_eplf = true;
        cli.apply(&mut config);
        assert!(config.server.enable_eplf);
        assert_eq!(config.server.listen_port, 2121);
        assert!(cli.config.is_none());
    }
}

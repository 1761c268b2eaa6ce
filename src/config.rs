use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    pub pasv_address: String, // Public IPv4 address announced in PASV replies
    pub pasv_port_range: Option<(u16, u16)>, // Ephemeral port when unset
    pub system_name: String,
    pub motd: String,
    pub enable_eplf: bool,
    pub users_file: Option<String>, // Zero-configuration mode when unset
    pub rewrite_users_file: bool,
    pub default_home: String,
    pub login_failure_delay_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from("127.0.0.1"),
            listen_port: 2121,
            pasv_address: String::from("127.0.0.1"),
            pasv_port_range: None,
            system_name: String::from("UNIX"),
            motd: String::from("FTP Service ready"),
            enable_eplf: false,
            users_file: None,
            rewrite_users_file: false,
            default_home: String::from("/"),
            login_failure_delay_ms: 3000,
        }
    }
}

impl ServerConfig {
    pub fn login_failure_delay(&self) -> Duration {
        Duration::from_millis(self.login_failure_delay_ms)
    }

    pub fn passive_ports(&self) -> Option<RangeInclusive<u16>> {
        self.pasv_port_range.map(|(start, end)| start..=end)
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        if let Some((start, end)) = config.server.pasv_port_range {
            anyhow::ensure!(
                start <= end,
                "Invalid passive port range: {} > {}",
                start,
                end
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_zero_configuration() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.listen_port, 2121);
        assert_eq!(config.server.default_home, "/");
        assert!(config.server.users_file.is_none());
        assert_eq!(config.server.login_failure_delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_server_table() {
        let config = Config::from_toml(
            r#"
            [server]
            listen_port = 2200
            pasv_port_range = [30000, 30010]
            users_file = "/etc/easyftpd.users"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.listen_port, 2200);
        assert_eq!(config.server.passive_ports(), Some(30000..=30010));
        assert_eq!(config.server.motd, "FTP Service ready");
        assert_eq!(
            config.server.users_file.as_deref(),
            Some("/etc/easyftpd.users")
        );
    }

    #[test]
    fn test_inverted_port_range_is_rejected() {
        let result = Config::from_toml("[server]\npasv_port_range = [40000, 30000]\n");
        assert!(result.is_err());
    }
}

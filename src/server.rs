use crate::config::{Config, ServerConfig};
use crate::core_auth::{DefaultUserStore, FileUserStore, UserStore};
use crate::core_listing::{DirectoryLister, EplfLister, LsLister};
use crate::core_network::network;
use anyhow::{Context, Result};
use log::{error, info};
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;

/// State shared by every connection of a running server.
pub struct ServerContext {
    pub config: ServerConfig,
    pub pasv_ip: Ipv4Addr,
    pub users: Arc<dyn UserStore>,
    pub lister: Arc<dyn DirectoryLister>,
}

impl ServerContext {
    pub fn new(
        config: ServerConfig,
        users: Arc<dyn UserStore>,
        lister: Arc<dyn DirectoryLister>,
    ) -> Result<Self> {
        let pasv_ip = config
            .pasv_address
            .parse::<Ipv4Addr>()
            .with_context(|| format!("Invalid passive address: {}", config.pasv_address))?;
        Ok(Self {
            config,
            pasv_ip,
            users,
            lister,
        })
    }

    /// Picks the user store and the listing format named by `config`.
    pub fn from_config(config: ServerConfig) -> Result<Self> {
        let users: Arc<dyn UserStore> = match &config.users_file {
            Some(path) => {
                let store = FileUserStore::load(Path::new(path), config.rewrite_users_file)
                    .with_context(|| format!("Failed to load users file: {}", path))?;
                info!("Loaded {} users from {}", store.len(), path);
                Arc::new(store)
            }
            None => {
                info!(
                    "No users file configured, any login is accepted with home {}",
                    config.default_home
                );
                Arc::new(DefaultUserStore::new(&config.default_home))
            }
        };

        let lister: Arc<dyn DirectoryLister> = if config.enable_eplf {
            Arc::new(EplfLister)
        } else {
            Arc::new(LsLister)
        };

        Self::new(config, users, lister)
    }
}

/// Runs the FTP server until the listener fails.
///
/// # Arguments
///
/// * `config` - The server configuration.
///
/// # Returns
///
/// Result<(), anyhow::Error> indicating the success or failure of the operation.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config: {:?}", config.server);
    let ctx = Arc::new(ServerContext::from_config(config.server)?);

    if let Err(e) = network::start_server(ctx).await {
        error!("Server stopped: {}", e);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_configuration_context() {
        let ctx = ServerContext::from_config(ServerConfig::default()).unwrap();
        assert_eq!(ctx.pasv_ip, Ipv4Addr::LOCALHOST);
        let user = ctx.users.find_user("whoever").unwrap();
        assert_eq!(user.home_dir(), Path::new("/"));
    }

    #[test]
    fn test_invalid_passive_address() {
        let config = ServerConfig {
            pasv_address: "ftp.example.com".to_string(),
            ..ServerConfig::default()
        };
        assert!(ServerContext::from_config(config).is_err());
    }

    #[test]
    fn test_missing_users_file() {
        let config = ServerConfig {
            users_file: Some("/nonexistent/users.toml".to_string()),
            ..ServerConfig::default()
        };
        assert!(ServerContext::from_config(config).is_err());
    }
}

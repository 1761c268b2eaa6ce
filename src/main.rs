use anyhow::Result;
use clap::Parser;
use easyftpd::constants::DEFAULT_CONFIG_PATH;
use easyftpd::core_cli::Cli;
use easyftpd::core_log::logger::init_logger;
use easyftpd::{server, Config};
use log::info;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    init_logger(args.verbose);

    // An explicit configuration file must load; the default one is optional
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::load_from_file(DEFAULT_CONFIG_PATH)?
        }
        None => {
            info!("No configuration file, using defaults");
            Config::default()
        }
    };
    args.apply(&mut config);

    // Run the FTP server
    server::run(config).await?;

    Ok(())
}

//! `recruit-relay` server binary.

// crates.io
use clap::Parser;
// self
use recruit_relay::{config::RelayConfig, obs, server};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let config = RelayConfig::parse();

	obs::init_logging(Some(&config.log_filter))?;
	server::serve(&config).await?;

	Ok(())
}

//! Main entry point for the batch wallet service.
//!
//! This binary runs one wallet session that connects an EIP-5792 capable
//! wallet, submits a fixed batch of transfers as a single request and checks
//! its status on demand. The session is driven through a small HTTP API.

use batch_config::Config;
use batch_core::{ViewController, ViewSettings};
use batch_wallet::{implementations::rpc::create_rpc_wallet, WalletHandles};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

/// Command-line arguments for the batch wallet service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the batch wallet service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the session against the configured wallet
/// 5. Serves the view API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started batch wallet service");

	let config_path = args.config.to_string_lossy();
	let config = Config::from_file(&config_path).await?;
	tracing::info!(
		chain_id = config.session.chain_id,
		connector = %config.session.connector,
		"Loaded configuration [{}]",
		config_path
	);

	let controller = build_controller(&config)?;

	tokio::select! {
		result = server::start_server(config.api.clone(), controller) => {
			tracing::info!("API server finished");
			result?;
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Shutting down");
		}
	}

	tracing::info!("Stopped batch wallet service");
	Ok(())
}

/// Builds the session controller with the JSON-RPC wallet from `config`.
fn build_controller(config: &Config) -> Result<Arc<ViewController>, Box<dyn std::error::Error>> {
	let wallet = create_rpc_wallet(config)?;
	let batch = config.batch_request()?;
	tracing::info!(calls = batch.len(), "Prepared transfer batch");

	Ok(Arc::new(ViewController::new(
		WalletHandles::from_shared(wallet),
		batch,
		ViewSettings::from(config),
	)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[tokio::test]
	async fn test_build_controller_from_config_file() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[wallet]
rpc_url = "http://127.0.0.1:8545"

[batch]
amounts = ["0.5", "0.25", "0.125"]

[explorer]
base_url = "https://etherscan.io"
"#
		)
		.unwrap();

		let config = Config::from_file(file.path().to_str().unwrap())
			.await
			.unwrap();
		let controller = build_controller(&config).unwrap();

		let view = controller.view();
		assert_eq!(view.batch.call_count, 3);
		assert_eq!(view.batch.summary[0], "0.5 ETH to 0x364C...8eE1");
		assert_eq!(view.connection.label, "Not connected");
	}

	#[test]
	fn test_args_defaults() {
		let args = Args::parse_from(["batch-wallet"]);
		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}
}

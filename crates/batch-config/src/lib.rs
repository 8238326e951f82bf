//! Configuration module for the batch wallet service.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files with
//! `${VAR}` / `${VAR:-default}` environment substitution and validates the
//! result before any component is built from it.

#[cfg(feature = "testing")]
pub mod builders;

use batch_types::{
	utils::{DEFAULT_BATCH_AMOUNTS, DEFAULT_EXPLORER_BASE_URL, DEFAULT_RECIPIENT, SEPOLIA_CHAIN_ID},
	BatchRequest, ConnectorKind,
};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the batch wallet service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Session-wide settings.
	#[serde(default)]
	pub session: SessionConfig,
	/// Wallet RPC endpoint settings.
	pub wallet: WalletConfig,
	/// The transfer batch submitted on send.
	#[serde(default)]
	pub batch: BatchConfig,
	/// Block explorer used for transaction links.
	#[serde(default)]
	pub explorer: ExplorerConfig,
	/// HTTP view server settings.
	#[serde(default)]
	pub api: ApiConfig,
}

/// Session-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
	/// Connector requested on connect.
	#[serde(default)]
	pub connector: ConnectorKind,
	/// Chain the batch is submitted on.
	#[serde(default = "default_chain_id")]
	pub chain_id: u64,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			connector: ConnectorKind::default(),
			chain_id: default_chain_id(),
		}
	}
}

/// Wallet RPC endpoint settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalletConfig {
	/// JSON-RPC endpoint of the wallet.
	pub rpc_url: String,
	/// Timeout for a single wallet request.
	/// Defaults to 120 seconds since wallets wait on user approval.
	#[serde(default = "default_request_timeout_seconds")]
	pub request_timeout_seconds: u64,
}

/// The transfer batch submitted on send.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
	/// Recipient of every call in the batch.
	#[serde(default = "default_recipient")]
	pub recipient: String,
	/// Ether amounts, one call per entry, in dispatch order.
	#[serde(default = "default_amounts")]
	pub amounts: Vec<String>,
}

impl Default for BatchConfig {
	fn default() -> Self {
		Self {
			recipient: default_recipient(),
			amounts: default_amounts(),
		}
	}
}

/// Block explorer settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExplorerConfig {
	#[serde(default = "default_explorer_base_url")]
	pub base_url: String,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			base_url: default_explorer_base_url(),
		}
	}
}

/// Configuration for the HTTP view server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			host: default_api_host(),
			port: default_api_port(),
		}
	}
}

fn default_chain_id() -> u64 {
	SEPOLIA_CHAIN_ID
}

fn default_request_timeout_seconds() -> u64 {
	120
}

fn default_recipient() -> String {
	DEFAULT_RECIPIENT.to_string()
}

fn default_amounts() -> Vec<String> {
	DEFAULT_BATCH_AMOUNTS.iter().map(|s| s.to_string()).collect()
}

fn default_explorer_base_url() -> String {
	DEFAULT_EXPLORER_BASE_URL.to_string()
}

/// Returns the default API host.
///
/// Binds to localhost unless configured otherwise.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	3000
}

/// Largest configuration input accepted for substitution.
const MAX_CONFIG_SIZE: usize = 1024 * 1024;

/// Substitutes `${VAR}` and `${VAR:-default}` with environment values.
///
/// Fails on the first variable that is unset and has no default.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	if input.len() > MAX_CONFIG_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_CONFIG_SIZE
		)));
	}

	let pattern = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut missing = None;
	let resolved = pattern.replace_all(input, |caps: &Captures| {
		match (std::env::var(&caps[1]), caps.get(2)) {
			(Ok(value), _) => value,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				missing.get_or_insert_with(|| caps[1].to_string());
				String::new()
			},
		}
	});

	match missing {
		Some(name) => Err(ConfigError::Validation(format!(
			"Environment variable '{}' not found",
			name
		))),
		None => Ok(resolved.into_owned()),
	}
}

impl Config {
	/// Loads configuration from a file, resolving environment variables.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	/// Builds the transfer batch described by the `[batch]` section.
	pub fn batch_request(&self) -> Result<BatchRequest, ConfigError> {
		BatchRequest::from_ether_amounts(&self.batch.recipient, &self.batch.amounts)
			.map_err(|e| ConfigError::Validation(format!("Invalid batch: {}", e)))
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// - Ensures the wallet RPC URL is an http(s) URL
	/// - Checks the request timeout is within bounds
	/// - Verifies the batch parses into at least one call
	/// - Validates the explorer base URL
	/// - Rejects a zero API port
	fn validate(&self) -> Result<(), ConfigError> {
		if self.wallet.rpc_url.is_empty() {
			return Err(ConfigError::Validation(
				"Wallet rpc_url cannot be empty".into(),
			));
		}
		if !is_http_url(&self.wallet.rpc_url) {
			return Err(ConfigError::Validation(format!(
				"Wallet rpc_url must be an http(s) URL, got '{}'",
				self.wallet.rpc_url
			)));
		}
		if self.wallet.request_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"Wallet request_timeout_seconds must be greater than 0".into(),
			));
		}
		if self.wallet.request_timeout_seconds > 3600 {
			return Err(ConfigError::Validation(
				"Wallet request_timeout_seconds cannot exceed 3600 (1 hour)".into(),
			));
		}

		if self.session.chain_id == 0 {
			return Err(ConfigError::Validation(
				"Session chain_id must be greater than 0".into(),
			));
		}

		self.batch_request()?;

		if !is_http_url(&self.explorer.base_url) {
			return Err(ConfigError::Validation(format!(
				"Explorer base_url must be an http(s) URL, got '{}'",
				self.explorer.base_url
			)));
		}

		if self.api.port == 0 {
			return Err(ConfigError::Validation("API port cannot be 0".into()));
		}

		Ok(())
	}
}

fn is_http_url(url: &str) -> bool {
	url.starts_with("http://") || url.starts_with("https://")
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// Resolves environment variables, parses the TOML and validates the result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

//! Configuration builder for creating test and development configurations.
//!
//! This module provides utilities for constructing Config instances with
//! sensible defaults, particularly useful for testing scenarios.

use crate::{ApiConfig, BatchConfig, Config, ExplorerConfig, SessionConfig, WalletConfig};
use batch_types::ConnectorKind;

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	rpc_url: String,
	request_timeout_seconds: u64,
	connector: ConnectorKind,
	batch: BatchConfig,
	explorer_base_url: String,
	api: ApiConfig,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		Self {
			rpc_url: "http://127.0.0.1:8545".to_string(),
			request_timeout_seconds: 5,
			connector: ConnectorKind::MetaMask,
			batch: BatchConfig::default(),
			explorer_base_url: ExplorerConfig::default().base_url,
			api: ApiConfig::default(),
		}
	}

	/// Sets the wallet RPC URL.
	pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
		self.rpc_url = url.into();
		self
	}

	/// Sets the wallet request timeout in seconds.
	pub fn request_timeout_seconds(mut self, timeout: u64) -> Self {
		self.request_timeout_seconds = timeout;
		self
	}

	pub fn connector(mut self, connector: ConnectorKind) -> Self {
		self.connector = connector;
		self
	}

	/// Sets the ether amounts of the batch.
	pub fn amounts(mut self, amounts: Vec<String>) -> Self {
		self.batch.amounts = amounts;
		self
	}

	pub fn explorer_base_url(mut self, url: impl Into<String>) -> Self {
		self.explorer_base_url = url.into();
		self
	}

	/// Sets the API server configuration.
	pub fn api(mut self, api: ApiConfig) -> Self {
		self.api = api;
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			session: SessionConfig {
				connector: self.connector,
				..SessionConfig::default()
			},
			wallet: WalletConfig {
				rpc_url: self.rpc_url,
				request_timeout_seconds: self.request_timeout_seconds,
			},
			batch: self.batch,
			explorer: ExplorerConfig {
				base_url: self.explorer_base_url,
			},
			api: self.api,
		}
	}
}

//! Wallet connection types.
//!
//! Describes which connector the session uses and the connection snapshot
//! the session holds for the currently connected account.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of wallet connector requested on connect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
	/// MetaMask (or a MetaMask-compatible endpoint).
	#[default]
	#[serde(rename = "metamask")]
	MetaMask,
	/// Any injected EIP-1193 provider.
	Injected,
}

impl fmt::Display for ConnectorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConnectorKind::MetaMask => write!(f, "metamask"),
			ConnectorKind::Injected => write!(f, "injected"),
		}
	}
}

/// Snapshot of the wallet connection.
///
/// The connected flag is derived from the address, so an address is present
/// exactly when the wallet is connected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletConnection {
	address: Option<String>,
}

impl WalletConnection {
	/// A disconnected wallet.
	pub fn disconnected() -> Self {
		Self { address: None }
	}

	/// A wallet connected as `address`.
	pub fn connected(address: impl Into<String>) -> Self {
		Self {
			address: Some(address.into()),
		}
	}

	pub fn address(&self) -> Option<&str> {
		self.address.as_deref()
	}

	pub fn is_connected(&self) -> bool {
		self.address.is_some()
	}
}

//! Wallet collaborator module for the batch wallet system.
//!
//! This module defines the external services the session depends on: the
//! wallet connector, the batched-call transport and the status query. The
//! session only consumes their request/response contracts; implementations
//! decide how to reach the wallet.

use async_trait::async_trait;
use batch_types::{BatchRequest, CallStatus, ConnectorKind, ErrorInfo, SubmissionResult};
use std::sync::Arc;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod rpc;
}

/// Errors that can occur while talking to the wallet.
#[derive(Debug, Error)]
pub enum WalletError {
	/// The wallet answered with a JSON-RPC error object.
	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// The wallet answered with a payload that could not be understood.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
}

impl WalletError {
	/// Whether the user declined the request in the wallet (EIP-1193 code 4001).
	pub fn is_user_rejection(&self) -> bool {
		matches!(self, WalletError::Rpc { code: 4001, .. })
	}
}

impl From<&WalletError> for ErrorInfo {
	fn from(err: &WalletError) -> Self {
		match err {
			WalletError::Rpc { message, .. } => ErrorInfo::from_message(message.as_str()),
			WalletError::Network(message) | WalletError::InvalidResponse(message) => {
				ErrorInfo::from_message(message.as_str())
			},
		}
	}
}

/// Connects and disconnects the user's wallet.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait WalletConnector: Send + Sync {
	/// Requests a connection through the given connector.
	///
	/// Returns the address of the connected account.
	async fn connect(&self, kind: ConnectorKind) -> Result<String, WalletError>;

	/// Requests disconnection of the current account.
	async fn disconnect(&self) -> Result<(), WalletError>;
}

/// Submits batched calls for execution.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait BatchTransport: Send + Sync {
	/// Submits all calls of `batch` from `from` as one execution attempt.
	///
	/// Returns the identifier to query the batch status with.
	async fn send_calls(
		&self,
		from: &str,
		batch: &BatchRequest,
	) -> Result<SubmissionResult, WalletError>;
}

/// Reports the execution status of a submitted batch.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait StatusQuery: Send + Sync {
	async fn get_calls_status(&self, id: &str) -> Result<CallStatus, WalletError>;
}

/// Shared handles to the three wallet collaborators.
///
/// The session holds these by reference; the wallet itself owns the
/// connection state behind them.
#[derive(Clone)]
pub struct WalletHandles {
	pub connector: Arc<dyn WalletConnector>,
	pub transport: Arc<dyn BatchTransport>,
	pub status: Arc<dyn StatusQuery>,
}

impl WalletHandles {
	pub fn new(
		connector: Arc<dyn WalletConnector>,
		transport: Arc<dyn BatchTransport>,
		status: Arc<dyn StatusQuery>,
	) -> Self {
		Self {
			connector,
			transport,
			status,
		}
	}

	/// Uses one wallet implementation for all three roles.
	pub fn from_shared<W>(wallet: Arc<W>) -> Self
	where
		W: WalletConnector + BatchTransport + StatusQuery + 'static,
	{
		Self {
			connector: wallet.clone(),
			transport: wallet.clone(),
			status: wallet,
		}
	}
}

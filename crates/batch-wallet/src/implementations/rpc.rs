//! JSON-RPC wallet implementation.
//!
//! Talks to an EIP-1193 style wallet endpoint over HTTP and implements all
//! three collaborator roles with the EIP-5792 batched-call methods:
//!
//! | role       | method                     |
//! |------------|----------------------------|
//! | connect    | `eth_requestAccounts`      |
//! | disconnect | `wallet_revokePermissions` |
//! | send       | `wallet_sendCalls`         |
//! | status     | `wallet_getCallsStatus`    |

use crate::{BatchTransport, StatusQuery, WalletConnector, WalletError};
use async_trait::async_trait;
use batch_config::Config;
use batch_types::{
	truncate_id, BatchRequest, CallStatus, CallsStatusResponse, ConnectorKind, SendCallsResponse,
	SubmissionResult,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Version of the `wallet_sendCalls` request shape.
const SEND_CALLS_VERSION: &str = "2.0.0";

#[derive(Serialize)]
struct RpcRequest<'a> {
	jsonrpc: &'static str,
	id: u64,
	method: &'a str,
	params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
	#[serde(default)]
	result: Option<Value>,
	#[serde(default)]
	error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
	code: i64,
	#[serde(default)]
	message: String,
}

/// Wallet reached through a JSON-RPC endpoint over HTTP.
pub struct RpcWallet {
	client: reqwest::Client,
	rpc_url: String,
	chain_id: u64,
	next_id: AtomicU64,
}

impl RpcWallet {
	/// Creates a new RpcWallet for the given endpoint and chain.
	pub fn new(
		rpc_url: impl Into<String>,
		chain_id: u64,
		request_timeout: Duration,
	) -> Result<Self, WalletError> {
		let client = reqwest::Client::builder()
			.timeout(request_timeout)
			.build()
			.map_err(|e| WalletError::Network(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			rpc_url: rpc_url.into(),
			chain_id,
			next_id: AtomicU64::new(1),
		})
	}

	/// Sends one JSON-RPC request and decodes its result.
	///
	/// A `null` or missing result is decoded as JSON `null`, so callers that
	/// expect no payload can ask for a [`Value`].
	async fn request<R: DeserializeOwned>(
		&self,
		method: &str,
		params: Value,
	) -> Result<R, WalletError> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let body = RpcRequest {
			jsonrpc: "2.0",
			id,
			method,
			params,
		};

		tracing::debug!(method, id, "Sending wallet request");

		let response = self
			.client
			.post(&self.rpc_url)
			.json(&body)
			.send()
			.await
			.map_err(|e| WalletError::Network(format!("{} request failed: {}", method, e)))?;

		let status = response.status();
		let text = response
			.text()
			.await
			.map_err(|e| WalletError::Network(format!("Failed to read {} response: {}", method, e)))?;

		let envelope: RpcResponse = match serde_json::from_str(&text) {
			Ok(envelope) => envelope,
			Err(_) if !status.is_success() => {
				return Err(WalletError::Network(format!(
					"{} returned HTTP {}",
					method, status
				)));
			},
			Err(e) => {
				return Err(WalletError::InvalidResponse(format!(
					"Malformed {} response: {}",
					method, e
				)));
			},
		};

		if let Some(error) = envelope.error {
			return Err(WalletError::Rpc {
				code: error.code,
				message: error.message,
			});
		}

		serde_json::from_value(envelope.result.unwrap_or(Value::Null)).map_err(|e| {
			WalletError::InvalidResponse(format!("Unexpected {} result: {}", method, e))
		})
	}
}

#[async_trait]
impl WalletConnector for RpcWallet {
	async fn connect(&self, kind: ConnectorKind) -> Result<String, WalletError> {
		tracing::debug!(connector = %kind, "Requesting wallet accounts");

		let accounts: Vec<String> = self.request("eth_requestAccounts", json!([])).await?;
		accounts
			.into_iter()
			.next()
			.ok_or_else(|| WalletError::InvalidResponse("Wallet returned no accounts".to_string()))
	}

	async fn disconnect(&self) -> Result<(), WalletError> {
		let _: Value = self
			.request("wallet_revokePermissions", json!([{ "eth_accounts": {} }]))
			.await?;
		Ok(())
	}
}

#[async_trait]
impl BatchTransport for RpcWallet {
	async fn send_calls(
		&self,
		from: &str,
		batch: &BatchRequest,
	) -> Result<SubmissionResult, WalletError> {
		let params = json!([{
			"version": SEND_CALLS_VERSION,
			"chainId": format!("{:#x}", self.chain_id),
			"from": from,
			"atomicRequired": true,
			"calls": batch,
		}]);

		let response: SendCallsResponse = self.request("wallet_sendCalls", params).await?;
		let result = SubmissionResult::from(response);

		tracing::info!(
			batch_id = %truncate_id(&result.id),
			calls = batch.len(),
			"Wallet accepted batch"
		);
		Ok(result)
	}
}

#[async_trait]
impl StatusQuery for RpcWallet {
	async fn get_calls_status(&self, id: &str) -> Result<CallStatus, WalletError> {
		let response: CallsStatusResponse =
			self.request("wallet_getCallsStatus", json!([id])).await?;
		Ok(response.into_call_status())
	}
}

/// Factory function to create the RPC wallet from configuration.
///
/// Uses `[wallet].rpc_url`, `[wallet].request_timeout_seconds` and
/// `[session].chain_id`.
pub fn create_rpc_wallet(config: &Config) -> Result<Arc<RpcWallet>, WalletError> {
	let wallet = RpcWallet::new(
		config.wallet.rpc_url.clone(),
		config.session.chain_id,
		Duration::from_secs(config.wallet.request_timeout_seconds),
	)?;
	Ok(Arc::new(wallet))
}

//! Submission results, receipts and call status types.
//!
//! This module defines what the wallet returns when a batch is accepted and
//! when its status is queried, together with the classification of the raw
//! EIP-5792 status payload into [`CallStatus`].

use alloy_primitives::U64;
use serde::{Deserialize, Serialize};

/// Identifier and metadata returned when the wallet accepts a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
	/// Opaque batch identifier used for later status queries.
	pub id: String,
	/// Capabilities echoed back by EIP-5792 v2 wallets.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub capabilities: Option<serde_json::Value>,
}

impl SubmissionResult {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			capabilities: None,
		}
	}
}

/// Raw `wallet_sendCalls` result.
///
/// Older wallets return the batch id as a bare string, newer ones return an
/// object carrying the id and optional capabilities.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SendCallsResponse {
	Id(String),
	Result(SubmissionResult),
}

impl From<SendCallsResponse> for SubmissionResult {
	fn from(response: SendCallsResponse) -> Self {
		match response {
			SendCallsResponse::Id(id) => SubmissionResult::new(id),
			SendCallsResponse::Result(result) => result,
		}
	}
}

/// Proof of execution for one call of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transaction_hash: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub block_hash: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub block_number: Option<U64>,
}

impl Receipt {
	pub fn with_hash(transaction_hash: impl Into<String>) -> Self {
		Self {
			transaction_hash: Some(transaction_hash.into()),
			..Default::default()
		}
	}
}

/// Classified execution status of a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallStatus {
	Pending,
	Success(Vec<Receipt>),
	Failure,
}

impl CallStatus {
	/// Transaction hash of the first receipt of a successful batch.
	///
	/// Returns `None` for pending or failed batches and for successful ones
	/// whose first receipt carries no hash.
	pub fn confirmed_hash(&self) -> Option<&str> {
		match self {
			CallStatus::Success(receipts) => receipts
				.first()
				.and_then(|receipt| receipt.transaction_hash.as_deref())
				.filter(|hash| !hash.is_empty()),
			_ => None,
		}
	}
}

/// Raw status value as reported by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireStatus {
	/// EIP-5792 numeric status code.
	Code(u64),
	/// Legacy or pre-classified label.
	Label(String),
}

/// Raw `wallet_getCallsStatus` result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallsStatusResponse {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub chain_id: Option<U64>,
	pub status: WireStatus,
	#[serde(default)]
	pub receipts: Option<Vec<Receipt>>,
}

impl CallsStatusResponse {
	/// Classifies the wallet payload.
	///
	/// Codes 100-199 are pending, 200-299 success and 300-699 failure. The
	/// labels `pending`/`success`/`failure` and the legacy `PENDING`/`CONFIRMED`
	/// are accepted as well. Anything unrecognised is reported as pending.
	pub fn into_call_status(self) -> CallStatus {
		let receipts = self.receipts.unwrap_or_default();
		match self.status {
			WireStatus::Code(100..=199) => CallStatus::Pending,
			WireStatus::Code(200..=299) => CallStatus::Success(receipts),
			WireStatus::Code(300..=699) => CallStatus::Failure,
			WireStatus::Code(_) => CallStatus::Pending,
			WireStatus::Label(label) => match label.as_str() {
				"success" | "CONFIRMED" => CallStatus::Success(receipts),
				"failure" => CallStatus::Failure,
				_ => CallStatus::Pending,
			},
		}
	}
}

//! Value-transfer calls and the batch that bundles them.
//!
//! A [`BatchRequest`] is an ordered, non-empty sequence of [`Call`]s sent to
//! the wallet as one execution attempt. It is immutable once constructed.

use crate::utils::{
	format_address, format_token_amount, DEFAULT_BATCH_AMOUNTS, DEFAULT_RECIPIENT, ETH_DECIMALS,
};
use alloy_primitives::{utils::parse_ether, Address, U256};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while building a batch.
#[derive(Debug, Error)]
pub enum CallError {
	/// The recipient is not a valid 20-byte hex address.
	#[error("Invalid recipient address '{0}'")]
	InvalidRecipient(String),
	/// The amount is not a valid ether decimal.
	#[error("Invalid amount '{amount}': {reason}")]
	InvalidAmount { amount: String, reason: String },
	/// A batch must contain at least one call.
	#[error("Batch must contain at least one call")]
	EmptyBatch,
}

/// A single value transfer within a batch.
///
/// Serializes to the `{ to, value }` shape used by `wallet_sendCalls`, with
/// the value as a hex quantity in wei.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Call {
	/// Recipient of the transfer.
	pub to: Address,
	/// Amount in wei.
	pub value: U256,
}

impl Call {
	/// Builds a call from a decimal ether amount such as `"0.001"`.
	pub fn ether(to: Address, amount: &str) -> Result<Self, CallError> {
		let value = parse_ether(amount).map_err(|e| CallError::InvalidAmount {
			amount: amount.to_string(),
			reason: e.to_string(),
		})?;
		Ok(Self { to, value })
	}

	/// Human-readable summary, e.g. `0.001 ETH to 0x364C...8eE1`.
	pub fn describe(&self) -> String {
		format!(
			"{} ETH to {}",
			format_token_amount(&self.value.to_string(), ETH_DECIMALS),
			format_address(&self.to.to_string())
		)
	}
}

/// Ordered sequence of calls submitted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BatchRequest {
	calls: Vec<Call>,
}

impl BatchRequest {
	pub fn new(calls: Vec<Call>) -> Result<Self, CallError> {
		if calls.is_empty() {
			return Err(CallError::EmptyBatch);
		}
		Ok(Self { calls })
	}

	/// Builds a batch sending each ether amount, in order, to one recipient.
	pub fn from_ether_amounts<S: AsRef<str>>(
		recipient: &str,
		amounts: &[S],
	) -> Result<Self, CallError> {
		let to: Address = recipient
			.parse()
			.map_err(|_| CallError::InvalidRecipient(recipient.to_string()))?;

		let calls = amounts
			.iter()
			.map(|amount| Call::ether(to, amount.as_ref()))
			.collect::<Result<Vec<_>, _>>()?;

		Self::new(calls)
	}

	/// The fixed two-call transfer: 0.001 ETH then 0.0001 ETH to the default recipient.
	pub fn default_transfer() -> Result<Self, CallError> {
		Self::from_ether_amounts(DEFAULT_RECIPIENT, &DEFAULT_BATCH_AMOUNTS)
	}

	pub fn calls(&self) -> &[Call] {
		&self.calls
	}

	pub fn len(&self) -> usize {
		self.calls.len()
	}

	pub fn is_empty(&self) -> bool {
		self.calls.is_empty()
	}
}

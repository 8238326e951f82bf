//! Status checks for a submitted batch.
//!
//! Queries the wallet once per user request and classifies the answer into
//! the transient fields shown by the view: a loading flag, a status error and
//! the confirmed transaction hash.

use crate::{lock, Dispatch};
use batch_types::utils::{STATUS_QUERY_FALLBACK_MESSAGE, TRANSACTION_FAILED_MESSAGE};
use batch_types::{truncate_id, CallStatus, ErrorInfo};
use batch_wallet::StatusQuery;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::instrument;

/// Outcome of the latest status check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCheckState {
	/// A check is in flight.
	pub loading: bool,
	pub error: Option<String>,
	/// Hash of the first receipt once the batch is reported successful.
	pub confirmed_hash: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
	state: StatusCheckState,
	latest_token: u64,
}

/// Clears the loading flag when a check ends, however it ends.
///
/// Only the check holding the latest token may clear it; a reset in between
/// already did.
struct LoadingGuard<'a> {
	inner: &'a Mutex<Inner>,
	token: u64,
}

impl Drop for LoadingGuard<'_> {
	fn drop(&mut self) {
		let mut inner = lock(self.inner);
		if inner.latest_token == self.token {
			inner.state.loading = false;
		}
	}
}

pub struct StatusPoller {
	status: Arc<dyn StatusQuery>,
	inner: Mutex<Inner>,
}

impl StatusPoller {
	pub fn new(status: Arc<dyn StatusQuery>) -> Self {
		Self {
			status,
			inner: Mutex::new(Inner::default()),
		}
	}

	/// Marks a check as started and clears the previous status error.
	///
	/// Returns `None` while another check is in flight.
	pub fn begin(&self) -> Option<u64> {
		let mut inner = lock(&self.inner);
		if inner.state.loading {
			return None;
		}

		inner.latest_token += 1;
		inner.state.loading = true;
		inner.state.error = None;
		Some(inner.latest_token)
	}

	/// Queries the status of batch `id` for a check started with `begin`.
	pub async fn complete(&self, token: u64, id: &str) -> Dispatch {
		self.complete_with(token, id, || ()).await
	}

	/// Like [`complete`](Self::complete); `commit` runs right before the
	/// answer is recorded and its return value is held until then.
	#[instrument(skip_all, fields(token = token, batch_id = %truncate_id(id)))]
	pub async fn complete_with<G>(
		&self,
		token: u64,
		id: &str,
		commit: impl FnOnce() -> G,
	) -> Dispatch {
		let _loading = LoadingGuard {
			inner: &self.inner,
			token,
		};

		let outcome = self.status.get_calls_status(id).await;

		let _commit = commit();
		let mut inner = lock(&self.inner);
		if inner.latest_token != token {
			tracing::debug!(
				latest = inner.latest_token,
				"Discarding result of superseded status check"
			);
			return Dispatch::Stale;
		}

		match outcome {
			Ok(status @ CallStatus::Success(_)) => {
				match status.confirmed_hash() {
					Some(hash) => {
						tracing::info!(tx_hash = %truncate_id(hash), "Batch confirmed");
						inner.state.confirmed_hash = Some(hash.to_string());
					},
					None => tracing::info!("Batch succeeded without a receipt hash"),
				}
			},
			Ok(CallStatus::Failure) => {
				tracing::warn!("Batch reported as failed");
				inner.state.error = Some(TRANSACTION_FAILED_MESSAGE.to_string());
			},
			Ok(CallStatus::Pending) => {
				tracing::debug!("Batch still pending");
			},
			Err(e) => {
				tracing::warn!(error = %e, "Status query failed");
				let info = ErrorInfo::from(&e);
				inner.state.error = Some(info.message_or(STATUS_QUERY_FALLBACK_MESSAGE).to_string());
			},
		}
		inner.state.loading = false;
		Dispatch::Applied
	}

	/// Checks the status of batch `id`.
	///
	/// Ignored while another check is in flight.
	pub async fn check_status(&self, id: &str) -> Dispatch {
		match self.begin() {
			Some(token) => self.complete(token, id).await,
			None => {
				tracing::debug!("Status check already in flight");
				Dispatch::Ignored
			},
		}
	}

	/// Clears all transient fields and discards any in-flight check.
	pub fn reset(&self) {
		let mut inner = lock(&self.inner);
		inner.latest_token += 1;
		inner.state = StatusCheckState::default();
	}

	pub fn state(&self) -> StatusCheckState {
		lock(&self.inner).state.clone()
	}

	pub fn is_loading(&self) -> bool {
		lock(&self.inner).state.loading
	}
}

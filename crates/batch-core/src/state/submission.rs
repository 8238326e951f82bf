//! Batch submission state machine.
//!
//! Tracks one batch submission through `Idle -> Pending -> Success | Error`.
//! A new submission may start from any phase and always re-enters `Pending`
//! from a clean slate. Every dispatch carries a request token; only the
//! completion holding the latest token is applied.

use crate::{lock, Dispatch};
use batch_types::{truncate_id, BatchRequest, ErrorInfo, SubmissionResult, WalletConnection};
use batch_wallet::BatchTransport;
use std::sync::{Arc, Mutex};
use tracing::instrument;

/// Phase of the current submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionPhase {
	#[default]
	Idle,
	Pending,
	/// Accepted by the transport.
	Success(SubmissionResult),
	/// Rejected by the transport.
	Error(ErrorInfo),
}

/// A submission that has entered `Pending` and awaits dispatch.
#[derive(Debug)]
pub struct SubmissionTicket {
	token: u64,
	from: String,
}

#[derive(Debug, Default)]
struct Inner {
	phase: SubmissionPhase,
	latest_token: u64,
}

pub struct BatchSubmissionState {
	transport: Arc<dyn BatchTransport>,
	inner: Mutex<Inner>,
}

impl BatchSubmissionState {
	pub fn new(transport: Arc<dyn BatchTransport>) -> Self {
		Self {
			transport,
			inner: Mutex::new(Inner::default()),
		}
	}

	/// Enters `Pending` for a new submission from the connected account.
	///
	/// Returns `None` without touching the state when the wallet is
	/// disconnected. Any previous result or error is dropped.
	pub fn begin(&self, connection: &WalletConnection) -> Option<SubmissionTicket> {
		let from = connection.address()?;

		let mut inner = lock(&self.inner);
		inner.latest_token += 1;
		inner.phase = SubmissionPhase::Pending;

		Some(SubmissionTicket {
			token: inner.latest_token,
			from: from.to_string(),
		})
	}

	/// Dispatches the batch for `ticket` and records the transport's answer.
	pub async fn complete(&self, ticket: SubmissionTicket, batch: &BatchRequest) -> Dispatch {
		self.complete_with(ticket, batch, || ()).await
	}

	/// Like [`complete`](Self::complete); `commit` runs right before the
	/// answer is recorded and its return value is held until then.
	#[instrument(skip_all, fields(token = ticket.token, calls = batch.len()))]
	pub async fn complete_with<G>(
		&self,
		ticket: SubmissionTicket,
		batch: &BatchRequest,
		commit: impl FnOnce() -> G,
	) -> Dispatch {
		let outcome = self.transport.send_calls(&ticket.from, batch).await;

		let _commit = commit();
		let mut inner = lock(&self.inner);
		if inner.latest_token != ticket.token {
			tracing::debug!(
				latest = inner.latest_token,
				"Discarding result of superseded submission"
			);
			return Dispatch::Stale;
		}

		inner.phase = match outcome {
			Ok(result) => {
				tracing::info!(batch_id = %truncate_id(&result.id), "Batch submitted");
				SubmissionPhase::Success(result)
			},
			Err(e) => {
				tracing::warn!(error = %e, "Batch submission rejected");
				SubmissionPhase::Error(ErrorInfo::from(&e))
			},
		};
		Dispatch::Applied
	}

	/// Submits `batch` from the connected account.
	///
	/// Ignored while disconnected.
	pub async fn submit(&self, connection: &WalletConnection, batch: &BatchRequest) -> Dispatch {
		match self.begin(connection) {
			Some(ticket) => self.complete(ticket, batch).await,
			None => {
				tracing::debug!("Ignoring submission while disconnected");
				Dispatch::Ignored
			},
		}
	}

	/// Returns to `Idle` and discards the outcome of any in-flight submission.
	pub fn reset(&self) {
		let mut inner = lock(&self.inner);
		inner.latest_token += 1;
		inner.phase = SubmissionPhase::Idle;
	}

	pub fn phase(&self) -> SubmissionPhase {
		lock(&self.inner).phase.clone()
	}

	pub fn is_pending(&self) -> bool {
		matches!(lock(&self.inner).phase, SubmissionPhase::Pending)
	}

	pub fn is_success(&self) -> bool {
		matches!(lock(&self.inner).phase, SubmissionPhase::Success(_))
	}

	pub fn error(&self) -> Option<ErrorInfo> {
		match &lock(&self.inner).phase {
			SubmissionPhase::Error(info) => Some(info.clone()),
			_ => None,
		}
	}

	pub fn last_result(&self) -> Option<SubmissionResult> {
		match &lock(&self.inner).phase {
			SubmissionPhase::Success(result) => Some(result.clone()),
			_ => None,
		}
	}
}

//! Renderable view of the session.
//!
//! [`UiState`] is a pure projection of the connection, the submission phase
//! and the latest status check. It carries everything a front end needs to
//! draw the page, including labels and button enablement.

use crate::monitoring::status::StatusCheckState;
use crate::state::submission::SubmissionPhase;
use batch_types::{explorer_tx_url, format_address, BatchRequest, WalletConnection};
use serde::Serialize;

const NOT_CONNECTED_LABEL: &str = "Not connected";
const CONNECT_BUTTON_LABEL: &str = "Connect with MetaMask";
const DISCONNECT_BUTTON_LABEL: &str = "Disconnect Wallet";
const SEND_LABEL: &str = "Send Batch Transaction";
const SENDING_LABEL: &str = "Sending Transaction...";
const CHECK_LABEL: &str = "Check Transaction Status";
const CHECKING_LABEL: &str = "Checking Status...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
	pub connection: ConnectionView,
	pub batch: BatchView,
	pub submission: SubmissionView,
	pub status: StatusView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView {
	pub is_connected: bool,
	pub address: Option<String>,
	/// Shortened address, e.g. `0xABCD...1234`.
	pub display_address: Option<String>,
	pub label: String,
	pub button_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchView {
	pub heading: String,
	/// One line per call, in dispatch order.
	pub summary: Vec<String>,
	pub call_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
	pub is_pending: bool,
	pub is_success: bool,
	pub error: Option<String>,
	pub last_result_id: Option<String>,
	pub can_send: bool,
	pub send_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
	/// The check button is shown once a submission result exists.
	pub visible: bool,
	pub loading: bool,
	pub can_check: bool,
	pub check_label: String,
	pub error: Option<String>,
	pub confirmed_hash: Option<String>,
	pub explorer_url: Option<String>,
}

/// Projects the component snapshots into a [`UiState`].
pub(crate) fn project(
	connection: &WalletConnection,
	batch: &BatchRequest,
	phase: &SubmissionPhase,
	status: &StatusCheckState,
	explorer_base_url: &str,
) -> UiState {
	let address = connection.address().map(str::to_string);
	let display_address = address.as_deref().map(format_address);
	let label = match &display_address {
		Some(short) => format!("Connected to {}", short),
		None => NOT_CONNECTED_LABEL.to_string(),
	};
	let button_label = if connection.is_connected() {
		DISCONNECT_BUTTON_LABEL
	} else {
		CONNECT_BUTTON_LABEL
	};

	let is_pending = matches!(phase, SubmissionPhase::Pending);
	let (is_success, last_result_id, error) = match phase {
		SubmissionPhase::Success(result) => (true, Some(result.id.clone()), None),
		SubmissionPhase::Error(info) => (false, None, Some(info.to_string())),
		SubmissionPhase::Idle | SubmissionPhase::Pending => (false, None, None),
	};

	let has_id = last_result_id.as_deref().is_some_and(|id| !id.is_empty());

	UiState {
		connection: ConnectionView {
			is_connected: connection.is_connected(),
			address,
			display_address,
			label,
			button_label: button_label.to_string(),
		},
		batch: BatchView {
			heading: format!("This will send {} transactions:", batch.len()),
			summary: batch.calls().iter().map(|call| call.describe()).collect(),
			call_count: batch.len(),
		},
		submission: SubmissionView {
			is_pending,
			is_success,
			error,
			can_send: connection.is_connected() && !is_pending,
			send_label: if is_pending { SENDING_LABEL } else { SEND_LABEL }.to_string(),
			last_result_id,
		},
		status: StatusView {
			visible: is_success,
			loading: status.loading,
			can_check: has_id && !status.loading,
			check_label: if status.loading { CHECKING_LABEL } else { CHECK_LABEL }.to_string(),
			error: status.error.clone(),
			explorer_url: status
				.confirmed_hash
				.as_deref()
				.map(|hash| explorer_tx_url(explorer_base_url, hash)),
			confirmed_hash: status.confirmed_hash.clone(),
		},
	}
}

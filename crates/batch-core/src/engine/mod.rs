//! View controller for the batch wallet session.
//!
//! Composes the connection, submission and status components, maps user
//! actions onto them and derives the [`UiState`] shown to the user. It is the
//! only place that reads all three components.
//!
//! Every change that spans components, and every completion that lands in
//! one, commits under the write side of the session lock. The view is
//! projected under the read side, so it never mixes states from before and
//! after a transition.

pub mod view;

use crate::monitoring::status::StatusPoller;
use crate::state::connection::ConnectionState;
use crate::state::submission::{BatchSubmissionState, SubmissionTicket};
use crate::{read, write, Dispatch};
use batch_config::Config;
use batch_types::utils::DEFAULT_EXPLORER_BASE_URL;
use batch_types::{BatchRequest, ConnectorKind};
use batch_wallet::{WalletError, WalletHandles};
use serde::Deserialize;
use std::sync::{Arc, RwLock};
use view::UiState;

/// A user intent coming from the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
	Connect,
	Disconnect,
	/// Connect when disconnected, disconnect otherwise.
	ToggleConnection,
	SendBatch,
	CheckStatus,
}

/// Presentation settings of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
	pub connector: ConnectorKind,
	pub explorer_base_url: String,
}

impl Default for ViewSettings {
	fn default() -> Self {
		Self {
			connector: ConnectorKind::default(),
			explorer_base_url: DEFAULT_EXPLORER_BASE_URL.to_string(),
		}
	}
}

impl From<&Config> for ViewSettings {
	fn from(config: &Config) -> Self {
		Self {
			connector: config.session.connector,
			explorer_base_url: config.explorer.base_url.clone(),
		}
	}
}

pub struct ViewController {
	connection: ConnectionState,
	submission: BatchSubmissionState,
	poller: StatusPoller,
	batch: BatchRequest,
	settings: ViewSettings,
	session: RwLock<()>,
}

impl ViewController {
	pub fn new(handles: WalletHandles, batch: BatchRequest, settings: ViewSettings) -> Self {
		Self {
			connection: ConnectionState::new(handles.connector),
			submission: BatchSubmissionState::new(handles.transport),
			poller: StatusPoller::new(handles.status),
			batch,
			settings,
			session: RwLock::new(()),
		}
	}

	pub fn batch(&self) -> &BatchRequest {
		&self.batch
	}

	/// Connects the wallet with the configured connector.
	pub async fn connect(&self) -> Result<Dispatch, WalletError> {
		self.connection
			.connect_with(self.settings.connector, || write(&self.session))
			.await
	}

	/// Disconnects the wallet and clears the submission and status fields.
	pub async fn disconnect(&self) -> Result<Dispatch, WalletError> {
		self.connection
			.disconnect_with(|| {
				let session = write(&self.session);
				self.submission.reset();
				self.poller.reset();
				session
			})
			.await
	}

	pub async fn toggle_connection(&self) -> Result<Dispatch, WalletError> {
		if self.connection.is_connected() {
			self.disconnect().await
		} else {
			self.connect().await
		}
	}

	/// Enters `Pending` for the fixed batch and clears the previous status
	/// outcome.
	///
	/// Ignored while disconnected or while a submission is pending, matching
	/// the disabled send button.
	fn begin_send(&self) -> Option<SubmissionTicket> {
		let _session = write(&self.session);
		let connection = self.connection.snapshot();
		if !connection.is_connected() {
			tracing::debug!("Ignoring send while disconnected");
			return None;
		}
		if self.submission.is_pending() {
			tracing::debug!("Ignoring send while a submission is pending");
			return None;
		}

		self.poller.reset();
		self.submission.begin(&connection)
	}

	/// Submits the batch and waits for the transport's answer.
	pub async fn send(&self) -> Dispatch {
		match self.begin_send() {
			Some(ticket) => {
				self.submission
					.complete_with(ticket, &self.batch, || write(&self.session))
					.await
			},
			None => Dispatch::Ignored,
		}
	}

	/// Submits the batch in the background.
	///
	/// The view shows `Pending` as soon as this returns.
	pub fn spawn_send(self: &Arc<Self>) -> Dispatch {
		let Some(ticket) = self.begin_send() else {
			return Dispatch::Ignored;
		};

		let controller = Arc::clone(self);
		tokio::spawn(async move {
			controller
				.submission
				.complete_with(ticket, &controller.batch, || write(&controller.session))
				.await;
		});
		Dispatch::Started
	}

	/// Starts a status check of the last submission result.
	///
	/// Ignored without a result id or while a check is in flight.
	fn begin_check(&self) -> Option<(u64, String)> {
		let _session = write(&self.session);
		let id = self.submission.last_result()?.id;
		if id.is_empty() {
			return None;
		}
		let token = self.poller.begin()?;
		Some((token, id))
	}

	/// Checks the status of the last submission and waits for the answer.
	pub async fn check_status(&self) -> Dispatch {
		match self.begin_check() {
			Some((token, id)) => {
				self.poller
					.complete_with(token, &id, || write(&self.session))
					.await
			},
			None => {
				tracing::debug!("Ignoring status check");
				Dispatch::Ignored
			},
		}
	}

	/// Checks the status of the last submission in the background.
	pub fn spawn_check_status(self: &Arc<Self>) -> Dispatch {
		let Some((token, id)) = self.begin_check() else {
			return Dispatch::Ignored;
		};

		let controller = Arc::clone(self);
		tokio::spawn(async move {
			controller
				.poller
				.complete_with(token, &id, || write(&controller.session))
				.await;
		});
		Dispatch::Started
	}

	/// Applies a user action.
	///
	/// Connection changes complete before returning; submissions and status
	/// checks run in the background. Only connector failures are returned as
	/// errors, everything else is recorded in the view state.
	pub async fn dispatch(self: &Arc<Self>, action: UserAction) -> Result<Dispatch, WalletError> {
		tracing::debug!(?action, "Dispatching user action");
		match action {
			UserAction::Connect => self.connect().await,
			UserAction::Disconnect => self.disconnect().await,
			UserAction::ToggleConnection => self.toggle_connection().await,
			UserAction::SendBatch => Ok(self.spawn_send()),
			UserAction::CheckStatus => Ok(self.spawn_check_status()),
		}
	}

	/// Snapshot of the renderable state.
	pub fn view(&self) -> UiState {
		let _session = read(&self.session);
		view::project(
			&self.connection.snapshot(),
			&self.batch,
			&self.submission.phase(),
			&self.poller.state(),
			&self.settings.explorer_base_url,
		)
	}
}

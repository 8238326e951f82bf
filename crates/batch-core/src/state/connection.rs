//! Wallet connection state.
//!
//! Tracks the connected address. The state changes only on the result of a
//! connect or disconnect request sent to the wallet connector.

use crate::{lock, Dispatch};
use batch_types::{format_address, ConnectorKind, WalletConnection};
use batch_wallet::{WalletConnector, WalletError};
use std::sync::{Arc, Mutex};
use tracing::instrument;

#[derive(Debug, Default)]
struct Inner {
	current: WalletConnection,
	/// A connect or disconnect request is awaiting the connector.
	in_flight: bool,
}

/// Clears the in-flight flag when a connector request ends.
struct RequestGuard<'a> {
	inner: &'a Mutex<Inner>,
}

impl Drop for RequestGuard<'_> {
	fn drop(&mut self) {
		lock(self.inner).in_flight = false;
	}
}

pub struct ConnectionState {
	connector: Arc<dyn WalletConnector>,
	inner: Mutex<Inner>,
}

impl ConnectionState {
	pub fn new(connector: Arc<dyn WalletConnector>) -> Self {
		Self {
			connector,
			inner: Mutex::new(Inner::default()),
		}
	}

	pub fn snapshot(&self) -> WalletConnection {
		lock(&self.inner).current.clone()
	}

	pub fn is_connected(&self) -> bool {
		lock(&self.inner).current.is_connected()
	}

	/// Claims the connector for a request that would move the connection to
	/// `target_connected`.
	///
	/// Returns `None` while another request is in flight or when the
	/// connection is already in the target state.
	fn begin(&self, target_connected: bool) -> Option<RequestGuard<'_>> {
		let mut inner = lock(&self.inner);
		if inner.in_flight || inner.current.is_connected() == target_connected {
			return None;
		}
		inner.in_flight = true;
		Some(RequestGuard { inner: &self.inner })
	}

	/// Requests a connection through the wallet connector.
	///
	/// On acceptance the returned address becomes the connected account. A
	/// rejection leaves the state untouched and is handed back to the caller;
	/// it is never recorded in the session. Connecting while already connected,
	/// or while another connector request is running, is ignored.
	pub async fn connect(&self, kind: ConnectorKind) -> Result<Dispatch, WalletError> {
		self.connect_with(kind, || ()).await
	}

	/// Like [`connect`](Self::connect); `commit` runs right before an accepted
	/// connection is recorded and its return value is held until then.
	#[instrument(skip(self, commit))]
	pub async fn connect_with<G>(
		&self,
		kind: ConnectorKind,
		commit: impl FnOnce() -> G,
	) -> Result<Dispatch, WalletError> {
		let Some(_request) = self.begin(true) else {
			tracing::debug!("Already connected or a request is in flight");
			return Ok(Dispatch::Ignored);
		};

		match self.connector.connect(kind).await {
			Ok(address) => {
				tracing::info!(address = %format_address(&address), "Wallet connected");
				let _commit = commit();
				lock(&self.inner).current = WalletConnection::connected(address);
				Ok(Dispatch::Applied)
			},
			Err(e) => {
				tracing::warn!(error = %e, "Wallet connection failed");
				Err(e)
			},
		}
	}

	/// Requests disconnection from the wallet connector.
	///
	/// The local connection is cleared once the request completes, whether or
	/// not the connector reported an error.
	pub async fn disconnect(&self) -> Result<Dispatch, WalletError> {
		self.disconnect_with(|| ()).await
	}

	/// Like [`disconnect`](Self::disconnect); `commit` runs right before the
	/// connection is cleared and its return value is held until then.
	#[instrument(skip_all)]
	pub async fn disconnect_with<G>(
		&self,
		commit: impl FnOnce() -> G,
	) -> Result<Dispatch, WalletError> {
		let Some(_request) = self.begin(false) else {
			return Ok(Dispatch::Ignored);
		};

		let outcome = self.connector.disconnect().await;
		{
			let _commit = commit();
			lock(&self.inner).current = WalletConnection::disconnected();
		}

		match outcome {
			Ok(()) => {
				tracing::info!("Wallet disconnected");
				Ok(Dispatch::Applied)
			},
			Err(e) => {
				tracing::warn!(error = %e, "Wallet disconnect reported an error");
				Err(e)
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::FakeConnector;

	#[tokio::test]
	async fn test_connect_sets_address() {
		let connector = Arc::new(FakeConnector::accepting("0xABCDEF0123456789ABCDEF0123456789ABCD1234"));
		let state = ConnectionState::new(connector.clone());

		assert!(!state.is_connected());
		let outcome = state.connect(ConnectorKind::MetaMask).await.unwrap();

		assert_eq!(outcome, Dispatch::Applied);
		let snapshot = state.snapshot();
		assert!(snapshot.is_connected());
		assert_eq!(
			snapshot.address(),
			Some("0xABCDEF0123456789ABCDEF0123456789ABCD1234")
		);
		assert_eq!(connector.connect_calls(), 1);
	}

	#[tokio::test]
	async fn test_connect_while_connected_is_ignored() {
		let connector = Arc::new(FakeConnector::accepting("0xABCD"));
		let state = ConnectionState::new(connector.clone());

		state.connect(ConnectorKind::MetaMask).await.unwrap();
		let outcome = state.connect(ConnectorKind::MetaMask).await.unwrap();

		assert_eq!(outcome, Dispatch::Ignored);
		assert_eq!(connector.connect_calls(), 1);
	}

	#[tokio::test]
	async fn test_rejected_connect_leaves_state_unchanged() {
		let state = ConnectionState::new(Arc::new(FakeConnector::rejecting()));

		let result = state.connect(ConnectorKind::MetaMask).await;

		assert!(matches!(result, Err(WalletError::Rpc { code: 4001, .. })));
		assert_eq!(state.snapshot(), WalletConnection::disconnected());
	}

	#[tokio::test]
	async fn test_disconnect_clears_address() {
		let state = ConnectionState::new(Arc::new(FakeConnector::accepting("0xABCD")));
		state.connect(ConnectorKind::MetaMask).await.unwrap();

		let outcome = state.disconnect().await.unwrap();

		assert_eq!(outcome, Dispatch::Applied);
		assert!(!state.is_connected());
		assert_eq!(state.snapshot().address(), None);
	}

	#[tokio::test]
	async fn test_failed_disconnect_still_clears_locally() {
		let connector = Arc::new(FakeConnector::accepting("0xABCD").failing_disconnect());
		let state = ConnectionState::new(connector);
		state.connect(ConnectorKind::MetaMask).await.unwrap();

		let result = state.disconnect().await;

		assert!(result.is_err());
		assert!(!state.is_connected());
	}

	#[tokio::test]
	async fn test_disconnect_while_disconnected_is_ignored() {
		let connector = Arc::new(FakeConnector::accepting("0xABCD"));
		let state = ConnectionState::new(connector.clone());

		let outcome = state.disconnect().await.unwrap();

		assert_eq!(outcome, Dispatch::Ignored);
		assert_eq!(connector.disconnect_calls(), 0);
	}

	#[tokio::test]
	async fn test_concurrent_connects_reach_connector_once() {
		let connector = Arc::new(FakeConnector::accepting("0xABCD"));
		let release = connector.hold();
		let state = Arc::new(ConnectionState::new(connector.clone()));

		let first = {
			let state = state.clone();
			tokio::spawn(async move { state.connect(ConnectorKind::MetaMask).await })
		};
		connector.wait_for_connects(1).await;

		let second = state.connect(ConnectorKind::MetaMask).await.unwrap();
		assert_eq!(second, Dispatch::Ignored);

		release.send(()).unwrap();
		assert_eq!(first.await.unwrap().unwrap(), Dispatch::Applied);
		assert_eq!(connector.connect_calls(), 1);
		assert!(state.is_connected());
	}

	#[tokio::test]
	async fn test_commit_runs_before_connection_changes() {
		let state = ConnectionState::new(Arc::new(FakeConnector::accepting("0xABCD")));

		state
			.connect_with(ConnectorKind::MetaMask, || assert!(!state.is_connected()))
			.await
			.unwrap();
		assert!(state.is_connected());

		state
			.disconnect_with(|| assert!(state.is_connected()))
			.await
			.unwrap();
		assert!(!state.is_connected());
	}
}

//! Scripted wallet collaborators for unit tests.
//!
//! Replies are queued in dispatch order. A reply is either ready at once
//! (`respond`) or held back until the test releases it through the sender
//! returned by `gate`, which lets tests pick the order completions land in.

use async_trait::async_trait;
use batch_types::{BatchRequest, CallStatus, ConnectorKind, SubmissionResult};
use batch_wallet::{BatchTransport, StatusQuery, WalletConnector, WalletError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

type Reply<T> = Result<T, WalletError>;

/// A wallet rejection carrying `message`, as a user declining in MetaMask.
pub fn rejection(message: &str) -> WalletError {
	WalletError::Rpc {
		code: 4001,
		message: message.to_string(),
	}
}

enum Slot<T> {
	Ready(Reply<T>),
	Gated(oneshot::Receiver<Reply<T>>),
}

struct Script<T> {
	slots: Mutex<VecDeque<Slot<T>>>,
	dispatched: AtomicUsize,
}

impl<T> Script<T> {
	fn new() -> Self {
		Self {
			slots: Mutex::new(VecDeque::new()),
			dispatched: AtomicUsize::new(0),
		}
	}

	fn respond(&self, reply: Reply<T>) {
		self.slots.lock().unwrap().push_back(Slot::Ready(reply));
	}

	fn gate(&self) -> oneshot::Sender<Reply<T>> {
		let (tx, rx) = oneshot::channel();
		self.slots.lock().unwrap().push_back(Slot::Gated(rx));
		tx
	}

	async fn next(&self) -> Reply<T> {
		self.dispatched.fetch_add(1, Ordering::SeqCst);
		let slot = self.slots.lock().unwrap().pop_front();
		match slot {
			Some(Slot::Ready(reply)) => reply,
			Some(Slot::Gated(rx)) => rx
				.await
				.unwrap_or_else(|_| Err(WalletError::Network("reply dropped".to_string()))),
			None => Err(WalletError::Network("no scripted reply".to_string())),
		}
	}

	fn dispatched(&self) -> usize {
		self.dispatched.load(Ordering::SeqCst)
	}

	async fn wait_for(&self, count: usize) {
		while self.dispatched() < count {
			tokio::task::yield_now().await;
		}
	}
}

/// Connector that accepts with a fixed address or rejects every request.
pub struct FakeConnector {
	address: Option<String>,
	fail_disconnect: bool,
	held: Mutex<Option<oneshot::Receiver<()>>>,
	connects: AtomicUsize,
	disconnects: AtomicUsize,
}

impl FakeConnector {
	pub fn accepting(address: &str) -> Self {
		Self {
			address: Some(address.to_string()),
			fail_disconnect: false,
			held: Mutex::new(None),
			connects: AtomicUsize::new(0),
			disconnects: AtomicUsize::new(0),
		}
	}

	pub fn rejecting() -> Self {
		Self {
			address: None,
			..Self::accepting("")
		}
	}

	pub fn failing_disconnect(mut self) -> Self {
		self.fail_disconnect = true;
		self
	}

	/// Holds the next connect request until the returned sender fires.
	pub fn hold(&self) -> oneshot::Sender<()> {
		let (tx, rx) = oneshot::channel();
		*self.held.lock().unwrap() = Some(rx);
		tx
	}

	/// Yields until `count` connect requests reached the connector.
	pub async fn wait_for_connects(&self, count: usize) {
		while self.connect_calls() < count {
			tokio::task::yield_now().await;
		}
	}

	pub fn connect_calls(&self) -> usize {
		self.connects.load(Ordering::SeqCst)
	}

	pub fn disconnect_calls(&self) -> usize {
		self.disconnects.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl WalletConnector for FakeConnector {
	async fn connect(&self, _kind: ConnectorKind) -> Result<String, WalletError> {
		self.connects.fetch_add(1, Ordering::SeqCst);
		let held = self.held.lock().unwrap().take();
		if let Some(release) = held {
			let _ = release.await;
		}
		self.address
			.clone()
			.ok_or_else(|| rejection("User rejected the request."))
	}

	async fn disconnect(&self) -> Result<(), WalletError> {
		self.disconnects.fetch_add(1, Ordering::SeqCst);
		if self.fail_disconnect {
			return Err(WalletError::Network("wallet unreachable".to_string()));
		}
		Ok(())
	}
}

/// Batch transport answering from a script.
pub struct GatedTransport {
	script: Script<SubmissionResult>,
	sent: Mutex<Vec<(String, BatchRequest)>>,
}

impl GatedTransport {
	pub fn new() -> Self {
		Self {
			script: Script::new(),
			sent: Mutex::new(Vec::new()),
		}
	}

	pub fn respond(&self, reply: Result<SubmissionResult, WalletError>) {
		self.script.respond(reply);
	}

	pub fn gate(&self) -> oneshot::Sender<Result<SubmissionResult, WalletError>> {
		self.script.gate()
	}

	pub fn dispatch_count(&self) -> usize {
		self.script.dispatched()
	}

	/// Yields until `count` submissions reached the transport.
	pub async fn wait_for_dispatches(&self, count: usize) {
		self.script.wait_for(count).await;
	}

	pub fn sent(&self) -> Vec<(String, BatchRequest)> {
		self.sent.lock().unwrap().clone()
	}
}

#[async_trait]
impl BatchTransport for GatedTransport {
	async fn send_calls(
		&self,
		from: &str,
		batch: &BatchRequest,
	) -> Result<SubmissionResult, WalletError> {
		self.sent
			.lock()
			.unwrap()
			.push((from.to_string(), batch.clone()));
		self.script.next().await
	}
}

/// Status query answering from a script.
pub struct GatedStatus {
	script: Script<CallStatus>,
	queried: Mutex<Vec<String>>,
}

impl GatedStatus {
	pub fn new() -> Self {
		Self {
			script: Script::new(),
			queried: Mutex::new(Vec::new()),
		}
	}

	pub fn respond(&self, reply: Result<CallStatus, WalletError>) {
		self.script.respond(reply);
	}

	pub fn gate(&self) -> oneshot::Sender<Result<CallStatus, WalletError>> {
		self.script.gate()
	}

	pub fn dispatch_count(&self) -> usize {
		self.script.dispatched()
	}

	/// Yields until `count` queries reached the endpoint.
	pub async fn wait_for_dispatches(&self, count: usize) {
		self.script.wait_for(count).await;
	}

	pub fn queried(&self) -> Vec<String> {
		self.queried.lock().unwrap().clone()
	}
}

#[async_trait]
impl StatusQuery for GatedStatus {
	async fn get_calls_status(&self, id: &str) -> Result<CallStatus, WalletError> {
		self.queried.lock().unwrap().push(id.to_string());
		self.script.next().await
	}
}

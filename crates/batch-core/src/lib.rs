//! Core session logic for the batch wallet system.
//!
//! This module provides the client-side state machines behind the view:
//! the wallet connection lifecycle, the submission of one batch of calls and
//! the on-demand status check of a submitted batch. The [`ViewController`]
//! composes them, dispatches user actions and projects the renderable
//! [`UiState`].
//!
//! Each component keeps its state behind a lock that is never held across an
//! external call. Completions are tagged with request tokens so a late result
//! from a superseded or reset request is discarded instead of applied. The
//! controller additionally serializes every transition against the view
//! projection, so a rendered view is always one consistent snapshot.

use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub mod engine;
pub mod monitoring;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::view::{BatchView, ConnectionView, StatusView, SubmissionView, UiState};
pub use engine::{UserAction, ViewController, ViewSettings};
pub use monitoring::status::{StatusCheckState, StatusPoller};
pub use state::connection::ConnectionState;
pub use state::submission::{BatchSubmissionState, SubmissionPhase, SubmissionTicket};

/// What became of a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispatch {
	/// Not allowed in the current state; nothing happened.
	Ignored,
	/// The external call was started and completes in the background.
	Started,
	/// The external call completed and its outcome was applied.
	Applied,
	/// The external call completed after a newer request or a reset, and its
	/// outcome was discarded.
	Stale,
}

/// Locks a component mutex, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
	lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
	lock.write().unwrap_or_else(PoisonError::into_inner)
}

//! Uniform error information extracted from external collaborators.
//!
//! Wallets and RPC endpoints report errors in loosely shaped payloads. Before
//! such an error enters the session it is classified into [`ErrorInfo`], which
//! either carries a usable human-readable message or records that none exists.

use serde::Serialize;
use std::fmt;

/// Classified external error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ErrorInfo {
	/// The collaborator supplied a message.
	Known(String),
	/// No usable message was available.
	Unknown,
}

impl ErrorInfo {
	/// Classifies a raw message; blank messages become [`ErrorInfo::Unknown`].
	///
	/// A usable message is kept verbatim.
	pub fn from_message(message: impl Into<String>) -> Self {
		let message = message.into();
		if message.trim().is_empty() {
			ErrorInfo::Unknown
		} else {
			ErrorInfo::Known(message)
		}
	}

	pub fn message(&self) -> Option<&str> {
		match self {
			ErrorInfo::Known(message) => Some(message),
			ErrorInfo::Unknown => None,
		}
	}

	/// Returns the message, or `fallback` when none is known.
	pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
		self.message().unwrap_or(fallback)
	}
}

impl fmt::Display for ErrorInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.message_or("Unknown error"))
	}
}

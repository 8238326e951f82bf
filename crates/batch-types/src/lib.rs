//! Common types module for the batch wallet system.
//!
//! This module defines the data model shared by the wallet client, the
//! session state machines and the view layer. It provides a centralized
//! location for wire shapes and display helpers so every crate agrees on them.

/// Value-transfer calls and the batch that bundles them.
pub mod calls;
/// Error classification applied at the boundary to external collaborators.
pub mod error;
/// Submission results, receipts and call status classification.
pub mod status;
/// Utility functions and constants for formatting and defaults.
pub mod utils;
/// Wallet connection types.
pub mod wallet;

// Re-export all types for convenient access
pub use calls::*;
pub use error::*;
pub use status::*;
pub use utils::{
	explorer_tx_url, format_address, format_token_amount, truncate_id,
};
pub use wallet::*;

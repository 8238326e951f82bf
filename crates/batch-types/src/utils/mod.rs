//! Utility functions for common formatting and shared defaults.
//!
//! This module provides helper functions for rendering addresses, amounts
//! and explorer links, and the constants the rest of the workspace defaults to.

pub mod constants;
pub mod formatting;

pub use constants::{
	DEFAULT_BATCH_AMOUNTS, DEFAULT_EXPLORER_BASE_URL, DEFAULT_RECIPIENT, ETH_DECIMALS,
	SEPOLIA_CHAIN_ID, STATUS_QUERY_FALLBACK_MESSAGE, TRANSACTION_FAILED_MESSAGE,
};
pub use formatting::{
	explorer_tx_url, format_address, format_token_amount, truncate_id,
};

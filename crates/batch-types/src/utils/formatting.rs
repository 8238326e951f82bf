//! String formatting utilities.
//!
//! Provides functions for formatting strings for display, including
//! address shortening, hex prefix management, token amount formatting,
//! and explorer link construction.

/// Utility function to truncate an identifier for log output.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	match id.get(..8) {
		Some(prefix) if id.len() > 8 => format!("{}..", prefix),
		_ => id.to_string(),
	}
}

/// Shortens an address for display as the first 6 and last 4 characters.
///
/// `0xABCDEF0123456789ABCDEF0123456789ABCD1234` becomes `0xABCD...1234`.
/// Strings too short to shorten, or that are not ASCII, are returned unchanged.
pub fn format_address(address: &str) -> String {
	if address.len() <= 10 || !address.is_ascii() {
		return address.to_string();
	}
	format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Builds the explorer page link for a transaction hash.
///
/// The hash is used exactly as the wallet reported it.
pub fn explorer_tx_url(base_url: &str, transaction_hash: &str) -> String {
	format!("{}/tx/{}", base_url.trim_end_matches('/'), transaction_hash)
}

/// Formats a token amount with decimal places for display.
///
/// Converts a raw token amount (as stored on-chain) to a human-readable
/// format with proper decimal placement.
///
/// # Arguments
///
/// * `amount` - The raw token amount as a string
/// * `decimals` - The number of decimal places for the token
///
/// # Returns
///
/// A formatted string like "1.5" or "0.001"
pub fn format_token_amount(amount: &str, decimals: u8) -> String {
	if decimals == 0 {
		return amount.to_string();
	}

	let decimal_places = decimals as usize;

	// Handle amounts smaller than 1 token
	let (integer_part, decimal_part) = if amount.len() <= decimal_places {
		let decimal_str = format!("{:0>width$}", amount, width = decimal_places);
		("0".to_string(), decimal_str)
	} else {
		let split_pos = amount.len() - decimal_places;
		(
			amount[..split_pos].to_string(),
			amount[split_pos..].to_string(),
		)
	};

	let decimal_trimmed = decimal_part.trim_end_matches('0');

	if decimal_trimmed.is_empty() {
		integer_part
	} else {
		format!("{}.{}", integer_part, decimal_trimmed)
	}
}

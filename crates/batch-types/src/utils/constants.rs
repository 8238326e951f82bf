//! Common constants used across the batch wallet system.
//!
//! Defaults for the fixed transfer batch and the explorer, plus the fixed
//! messages surfaced to the user when a status check does not succeed.

/// Recipient of both calls in the default transfer batch.
pub const DEFAULT_RECIPIENT: &str = "0x364CAa7b19Ac08f066C07209741c5e17A4f98eE1";

/// Ether amounts of the default transfer batch, in dispatch order.
pub const DEFAULT_BATCH_AMOUNTS: [&str; 2] = ["0.001", "0.0001"];

/// Chain the session operates on (Sepolia).
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Block explorer used to build transaction links.
pub const DEFAULT_EXPLORER_BASE_URL: &str = "https://sepolia.etherscan.io";

/// Decimals of the native currency.
pub const ETH_DECIMALS: u8 = 18;

/// Status error shown when the wallet reports the batch as failed.
pub const TRANSACTION_FAILED_MESSAGE: &str = "Transaction failed";

/// Status error shown when a status query fault carries no message.
pub const STATUS_QUERY_FALLBACK_MESSAGE: &str = "Failed to get transaction status";

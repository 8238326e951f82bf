//! On-demand status checks for submitted batches.
//!
//! The status of a batch is queried only when the user asks for it; there is
//! no background polling loop.

pub mod status;

pub use status::{StatusCheckState, StatusPoller};

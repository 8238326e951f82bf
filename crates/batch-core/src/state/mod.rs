//! Session state owned by the core.
//!
//! Holds the wallet connection and the batch submission state machines.

pub mod connection;
pub mod submission;

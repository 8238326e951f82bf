//! Request handling behind the HTTP view API.

pub mod actions;
pub mod error;

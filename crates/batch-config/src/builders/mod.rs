//! Builders for constructing configurations programmatically.

pub mod config;

pub use config::ConfigBuilder;

//! Database configuration and connection setup.
//!
//! The account store reads through SeaORM when the `database` feature is
//! enabled.

pub mod config;
#[cfg(feature = "database")]
pub mod connection;

pub use config::{DatabaseConfig, redact_database_url};
#[cfg(feature = "database")]
pub use connection::connect;

//! Error handling for the oracle process

pub mod oracle_error;

pub use oracle_error::*;

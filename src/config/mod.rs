//! Configuration management for the oracle

pub mod settings;

pub use settings::*;

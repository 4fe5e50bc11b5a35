//! Price derivation engine

pub mod engine;

pub use engine::*;

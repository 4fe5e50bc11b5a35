//! Command restriction gate

pub mod gate;

pub use gate::*;

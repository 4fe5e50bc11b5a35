//! Core data types and structures

pub mod addresses;
pub mod pricing;
pub mod token;

pub use addresses::*;
pub use pricing::*;
pub use token::*;

//! Contract reading boundary

pub mod reader;
pub mod source;

pub use reader::*;
pub use source::*;

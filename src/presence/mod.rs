//! Presence rendering and chat-platform adapters

pub mod chat;
pub mod renderer;
pub mod sink;

pub use chat::*;
pub use renderer::*;
pub use sink::*;

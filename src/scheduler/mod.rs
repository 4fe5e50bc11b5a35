//! Polling scheduler

pub mod poller;

pub use poller::*;

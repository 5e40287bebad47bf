//! Multibox Bridge library target.
//!
//! Exposes internal modules for integration tests. The binary entry point
//! is in `main.rs`; this file exists so `tests/*.rs` can import the
//! bridge's logic.

pub mod app;
pub mod cli;
pub mod host;
pub mod keyboard;
pub mod util;

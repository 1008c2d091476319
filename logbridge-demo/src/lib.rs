//! logbridge demo library.
//!
//! This library exposes internal modules for integration testing.
//! In production, `logbridge-demo` is used as a binary (main.rs).

pub mod cli;
pub mod logging;
pub mod sink;

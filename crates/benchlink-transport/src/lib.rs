//! benchlink-transport: Physical transport implementations for benchlink.
//!
//! This crate provides concrete [`Transport`](benchlink_core::Transport)
//! implementations for connecting to real instruments:
//!
//! - [`SerialTransport`] -- USB virtual COM ports and RS-232 serial links
//!
//! Device drivers consume the `Transport` trait from `benchlink-core`
//! rather than these concrete types, so tests can substitute the mock
//! transport from `benchlink-test-harness`.

pub mod serial;

pub use serial::{DataBits, FlowControl, Parity, SerialConfig, SerialTransport, StopBits};

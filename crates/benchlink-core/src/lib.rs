//! benchlink-core: Core traits, types, and error definitions for benchlink.
//!
//! This crate defines the device-agnostic abstractions that all benchlink
//! drivers implement. Control surfaces (GUIs, polling loops, CLI tools)
//! depend on these types without pulling in any specific instrument driver.
//!
//! # Key types
//!
//! - [`Instrument`] -- the by-name get/set/invoke capability surface
//! - [`Transport`] -- byte-level communication channel
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod helpers;
pub mod instrument;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use benchlink_core::*`.
pub use error::{Error, Result};
pub use helpers::{format_frequency_khz, format_voltage};
pub use instrument::Instrument;
pub use transport::Transport;
pub use types::*;

//! Kuhne Electronic microwave generator backend for benchlink.
//!
//! This crate implements the serial command protocol of the KU SG
//! 2.45-250 A, a 2.45 GHz ISM-band microwave generator. It provides:
//!
//! - **Protocol codec** ([`protocol`]) -- encode carriage-return-terminated
//!   command tokens, validate binary reply frames, and decode little-endian
//!   payloads, with the per-command reply table.
//! - **Command builders** ([`commands`]) -- construct correctly-formatted
//!   commands for every generator operation (frequency, power, biasing, RF,
//!   pulse timing, phase, reflection limit, tuning, housekeeping), apply
//!   each parameter's truncation/rounding rules, and parse the
//!   corresponding responses.
//! - **Model definitions** ([`models`]) -- static capability data for the
//!   supported generators.
//! - **Generator driver** ([`generator`]) -- half-duplex
//!   command/acknowledgement exchange over a [`Transport`]
//!   (`benchlink_core::Transport`), typed accessors, safe
//!   power-up/power-down sequencing, and the
//!   [`Instrument`](benchlink_core::Instrument) capability surface.
//! - **Builder** ([`builder`]) -- fluent builder API for constructing
//!   [`Kusg245`] instances with smart defaults.
//!
//! # Protocol summary
//!
//! Commands are short ASCII tokens terminated by `\r` at 115200 baud.
//! Set/action commands are confirmed with the single acknowledgement byte
//! `A`; queries reply with either a small binary frame (payload bytes plus
//! the `\r` terminator) or a terminator-ended ASCII token. The protocol is
//! strictly half-duplex: one command, one reply, no pipelining.
//!
//! # Example
//!
//! ```
//! use benchlink_kuhne::commands::{cmd_set_power_setpoint, cmd_read_power_forward};
//!
//! // Power set-points are clamped to the configured limit and formatted
//! // as three zero-padded digits.
//! let cmd = cmd_set_power_setpoint(150, 100);
//! assert_eq!(cmd.encode(), b"A100\r");
//!
//! // Queries declare their reply shape so the driver knows how many
//! // bytes to expect.
//! let cmd = cmd_read_power_forward();
//! assert_eq!(cmd.encode(), b"6\r");
//! assert!(!cmd.expects_acknowledgement());
//! ```

pub mod builder;
pub mod commands;
pub mod generator;
pub mod models;
pub mod protocol;

// Re-export the primary types for ergonomic `use benchlink_kuhne::*`.
pub use builder::KusgBuilder;
pub use generator::Kusg245;
pub use models::KuhneModel;

//! # benchlink -- Instrument Control for the Lab Bench
//!
//! `benchlink` is an asynchronous Rust library for controlling laboratory
//! instruments over serial links. It grew around microwave generator
//! control for plasma and materials experiments, where a GUI or scripted
//! polling loop needs reliable typed access to instrument parameters.
//!
//! ## Quick Start
//!
//! Add `benchlink` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! benchlink = { version = "0.1", features = ["kuhne"] }
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! Connect to a generator and read its forward power:
//!
//! ```no_run
//! use benchlink::kuhne::KusgBuilder;
//! use benchlink::kuhne::models::ku_sg_2_45_250a;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let generator = KusgBuilder::new(ku_sg_2_45_250a())
//!         .serial_port("/dev/ttyUSB0")
//!         .power_limit(100)
//!         .build()
//!         .await?;
//!
//!     let watts = generator.power_forward().await?;
//!     println!("forward power: {} W", watts);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                    | Purpose                                      |
//! |--------------------------|----------------------------------------------|
//! | `benchlink-core`         | Traits ([`Instrument`], [`Transport`]), types, errors |
//! | `benchlink-transport`    | Serial transport implementation              |
//! | `benchlink-kuhne`        | Kuhne Electronic microwave generator driver  |
//! | `benchlink-test-harness` | Mock transport for hardware-free tests       |
//! | **`benchlink`**          | This facade crate -- re-exports everything   |
//!
//! Drivers implement the [`Instrument`] trait, so control surfaces can
//! work with `dyn Instrument` and remain device-agnostic: parameters and
//! actions are discovered by name through descriptor listings, values are
//! read and written as [`Value`]s, and actions are invoked by name. Typed
//! accessor methods on the concrete driver remain available when the
//! device is known at compile time.
//!
//! ## Feature Flags
//!
//! Each device backend is gated behind a feature flag:
//!
//! | Feature | Enables                                  | Default |
//! |---------|------------------------------------------|---------|
//! | `kuhne` | [`kuhne`] module (KU SG 2.45-250 A)      | yes     |
//!
//! ## Concurrency model
//!
//! Instrument links are strictly half-duplex: one command/response
//! exchange at a time, no pipelining. Drivers own their transport
//! exclusively and serialize exchanges internally; every accessor awaits
//! its full exchange before returning. Polling cadence and retry policy
//! belong to the calling layer.

pub use benchlink_core::*;

/// Kuhne Electronic microwave generator backend.
///
/// Provides [`Kusg245`](kuhne::Kusg245) and
/// [`KusgBuilder`](kuhne::KusgBuilder) for controlling the KU SG
/// 2.45-250 A over its carriage-return-terminated serial protocol.
#[cfg(feature = "kuhne")]
pub mod kuhne {
    pub use benchlink_kuhne::*;
}

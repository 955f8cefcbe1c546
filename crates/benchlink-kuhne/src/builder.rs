//! KusgBuilder -- fluent builder for constructing [`Kusg245`] instances.
//!
//! Separates configuration from construction so that callers can set up
//! serial port parameters, the power limit, and the command timeout before
//! establishing the transport connection.
//!
//! # Example
//!
//! ```no_run
//! use benchlink_kuhne::builder::KusgBuilder;
//! use benchlink_kuhne::models::ku_sg_2_45_250a;
//! use std::time::Duration;
//!
//! # async fn example() -> benchlink_core::Result<()> {
//! let generator = KusgBuilder::new(ku_sg_2_45_250a())
//!     .serial_port("/dev/ttyUSB0")
//!     .power_limit(100) // cap the set-point at 100 W for this bench
//!     .command_timeout(Duration::from_millis(300))
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use benchlink_core::error::{Error, Result};
use benchlink_core::transport::Transport;
use benchlink_transport::SerialTransport;

use crate::generator::Kusg245;
use crate::models::KuhneModel;

/// Fluent builder for [`Kusg245`].
///
/// All configuration has sensible defaults derived from the
/// [`KuhneModel`], so the simplest usage is:
///
/// ```ignore
/// let generator = KusgBuilder::new(ku_sg_2_45_250a())
///     .serial_port("/dev/ttyUSB0")
///     .build()
///     .await?;
/// ```
pub struct KusgBuilder {
    model: KuhneModel,
    serial_port: Option<String>,
    baud_rate: Option<u32>,
    power_limit: Option<u16>,
    command_timeout: Duration,
}

impl KusgBuilder {
    /// Create a new builder for the given generator model.
    pub fn new(model: KuhneModel) -> Self {
        KusgBuilder {
            model,
            serial_port: None,
            baud_rate: None,
            power_limit: None,
            command_timeout: Duration::from_millis(500),
        }
    }

    /// Set the serial port path (e.g. `/dev/ttyUSB0` or `COM3`).
    pub fn serial_port(mut self, port: &str) -> Self {
        self.serial_port = Some(port.to_string());
        self
    }

    /// Override the model's factory baud rate.
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.baud_rate = Some(baud);
        self
    }

    /// Cap the power set-point below the model's hard ceiling.
    ///
    /// Every power set-point and tune power is truncated to this limit
    /// before transmission. Must be greater than zero and no more than the
    /// model's maximum; [`build`](KusgBuilder::build) rejects anything
    /// else.
    pub fn power_limit(mut self, watts: u16) -> Self {
        self.power_limit = Some(watts);
        self
    }

    /// Set the timeout for waiting on a single reply (default: 500ms).
    ///
    /// The protocol itself specifies no timeout; this is caller-owned
    /// configuration surfaced as
    /// [`Error::Timeout`](benchlink_core::Error::Timeout) when it expires.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Build a [`Kusg245`] with a caller-provided transport.
    ///
    /// This is the primary entry point for testing (pass a
    /// `MockTransport` from `benchlink-test-harness`) and for advanced
    /// use cases where the caller manages the transport lifecycle
    /// directly.
    pub fn build_with_transport(self, transport: Box<dyn Transport>) -> Result<Kusg245> {
        let power_limit = self.power_limit.unwrap_or(self.model.max_power_watts);
        if power_limit == 0 || power_limit > self.model.max_power_watts {
            return Err(Error::InvalidParameter(format!(
                "power limit must be in 1..={} W, got {}",
                self.model.max_power_watts, power_limit
            )));
        }

        Ok(Kusg245::new(
            transport,
            self.model,
            power_limit,
            self.command_timeout,
        ))
    }

    /// Open the configured serial port and build a [`Kusg245`].
    ///
    /// Requires [`serial_port`](KusgBuilder::serial_port) to have been
    /// set. The port is opened at the model's factory baud rate (115200
    /// for the KU SG 2.45-250 A) unless overridden, with 8 data bits,
    /// 1 stop bit, and no parity.
    pub async fn build(self) -> Result<Kusg245> {
        let port = self.serial_port.clone().ok_or_else(|| {
            Error::InvalidParameter("serial port not configured".into())
        })?;
        let baud = self.baud_rate.unwrap_or(self.model.default_baud);

        let transport = SerialTransport::open(&port, baud).await?;
        self.build_with_transport(Box::new(transport))
    }
}

//! Serial port transport for instrument communication.
//!
//! [`SerialTransport`] implements the [`Transport`] trait for USB virtual
//! COM ports and physical RS-232 links. Most bench instruments present as
//! a virtual serial port; the KU SG 2.45-250 A generator runs at 115200
//! baud, 8 data bits, 1 stop bit, no parity, which is the default
//! configuration here.
//!
//! # Example
//!
//! ```no_run
//! use benchlink_transport::SerialTransport;
//! use benchlink_core::transport::Transport;
//! use std::time::Duration;
//!
//! # async fn example() -> benchlink_core::Result<()> {
//! let mut transport = SerialTransport::open("/dev/ttyUSB0", 115_200).await?;
//!
//! // Query the generator's forward power.
//! transport.send(b"6\r").await?;
//!
//! let mut buf = [0u8; 16];
//! let n = transport.receive(&mut buf, Duration::from_millis(500)).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use benchlink_core::error::{Error, Result};
use benchlink_core::transport::Transport;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, trace, warn};

/// Serial port configuration.
///
/// The default is the generator's factory setting: 115200 8N1, no flow
/// control.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Baud rate (e.g., 9600, 115200).
    pub baud_rate: u32,
    /// Data bits per character.
    pub data_bits: DataBits,
    /// Stop bits per character.
    pub stop_bits: StopBits,
    /// Parity checking.
    pub parity: Parity,
    /// Flow control.
    pub flow_control: FlowControl,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
        }
    }
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

/// Number of stop bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// Parity checking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

/// Flow control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    None,
    Software,
    Hardware,
}

impl From<DataBits> for tokio_serial::DataBits {
    fn from(bits: DataBits) -> Self {
        use tokio_serial::DataBits as T;
        match bits {
            DataBits::Five => T::Five,
            DataBits::Six => T::Six,
            DataBits::Seven => T::Seven,
            DataBits::Eight => T::Eight,
        }
    }
}

impl From<StopBits> for tokio_serial::StopBits {
    fn from(bits: StopBits) -> Self {
        use tokio_serial::StopBits as T;
        match bits {
            StopBits::One => T::One,
            StopBits::Two => T::Two,
        }
    }
}

impl From<Parity> for tokio_serial::Parity {
    fn from(parity: Parity) -> Self {
        use tokio_serial::Parity as T;
        match parity {
            Parity::None => T::None,
            Parity::Odd => T::Odd,
            Parity::Even => T::Even,
        }
    }
}

impl From<FlowControl> for tokio_serial::FlowControl {
    fn from(flow: FlowControl) -> Self {
        use tokio_serial::FlowControl as T;
        match flow {
            FlowControl::None => T::None,
            FlowControl::Software => T::Software,
            FlowControl::Hardware => T::Hardware,
        }
    }
}

/// Map an I/O error to the transport error it represents.
///
/// A broken pipe or a not-connected socket means the device vanished
/// (USB unplug, powered off) rather than a transient I/O failure.
fn map_io_error(e: std::io::Error) -> Error {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::NotConnected => Error::ConnectionLost,
        _ => Error::Io(e),
    }
}

/// Serial port transport for instrument communication.
pub struct SerialTransport {
    /// `None` once the port has been closed.
    port: Option<SerialStream>,
    port_name: String,
}

impl SerialTransport {
    /// Open a serial port at the given baud rate with 8N1 framing and no
    /// flow control.
    ///
    /// `port` is the serial port path, e.g. `/dev/ttyUSB0` on Linux or
    /// `COM3` on Windows.
    pub async fn open(port: &str, baud_rate: u32) -> Result<Self> {
        Self::open_with_config(
            port,
            SerialConfig {
                baud_rate,
                ..Default::default()
            },
        )
        .await
    }

    /// Open a serial port with full configuration control.
    pub async fn open_with_config(port: &str, config: SerialConfig) -> Result<Self> {
        debug!(port, baud = config.baud_rate, "opening serial port");

        let stream = tokio_serial::new(port, config.baud_rate)
            .data_bits(config.data_bits.into())
            .stop_bits(config.stop_bits.into())
            .parity(config.parity.into())
            .flow_control(config.flow_control.into())
            .open_native_async()
            .map_err(|e| Error::Transport(format!("failed to open serial port {port}: {e}")))?;

        Ok(Self {
            port: Some(stream),
            port_name: port.to_string(),
        })
    }

    /// The path this transport was opened on.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        trace!(port = %self.port_name, data = ?data, "tx");
        port.write_all(data).await.map_err(map_io_error)?;
        port.flush().await.map_err(map_io_error)?;
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        match tokio::time::timeout(timeout, port.read(buf)).await {
            Ok(Ok(n)) => {
                trace!(port = %self.port_name, data = ?&buf[..n], "rx");
                Ok(n)
            }
            Ok(Err(e)) => Err(map_io_error(e)),
            Err(_) => {
                trace!(port = %self.port_name, timeout_ms = timeout.as_millis(), "rx timeout");
                Err(Error::Timeout)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            debug!(port = %self.port_name, "closing serial port");
            if let Err(e) = port.flush().await {
                warn!(port = %self.port_name, error = %e, "flush before close failed");
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_generator_factory_settings() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.flow_control, FlowControl::None);
    }

    #[test]
    fn config_enums_map_to_tokio_serial() {
        assert_eq!(
            tokio_serial::DataBits::from(DataBits::Eight),
            tokio_serial::DataBits::Eight
        );
        assert_eq!(
            tokio_serial::StopBits::from(StopBits::Two),
            tokio_serial::StopBits::Two
        );
        assert_eq!(
            tokio_serial::Parity::from(Parity::Even),
            tokio_serial::Parity::Even
        );
        assert_eq!(
            tokio_serial::FlowControl::from(FlowControl::Software),
            tokio_serial::FlowControl::Software
        );
    }

    #[test]
    fn map_io_error_distinguishes_lost_connections() {
        let e = map_io_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"));
        assert!(matches!(e, Error::ConnectionLost));

        let e = map_io_error(std::io::Error::new(std::io::ErrorKind::NotConnected, "gone"));
        assert!(matches!(e, Error::ConnectionLost));

        let e = map_io_error(std::io::Error::new(std::io::ErrorKind::TimedOut, "slow"));
        assert!(matches!(e, Error::Io(_)));
    }
}

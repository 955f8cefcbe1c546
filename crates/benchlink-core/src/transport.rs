//! Transport trait for instrument communication.
//!
//! The [`Transport`] trait abstracts over the physical link to a laboratory
//! instrument. Implementations exist for serial ports (USB virtual COM
//! ports, RS-232) and for mock transports used in testing.
//!
//! Device drivers (e.g. the generator driver in `benchlink-kuhne`) operate
//! on a `Transport` rather than directly on a serial port, enabling both
//! real hardware control and deterministic unit testing with
//! `MockTransport` from the `benchlink-test-harness` crate.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport to an instrument.
///
/// Implementations handle buffering and error recovery at the physical
/// layer. Protocol-level concerns (command framing, termination bytes,
/// acknowledgement semantics) are handled by the drivers that consume
/// this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the instrument.
    ///
    /// Implementations should block until all bytes have been written to
    /// the underlying transport (serial TX buffer, etc.).
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the instrument into the provided buffer.
    ///
    /// Returns the number of bytes actually read. Will wait up to `timeout`
    /// for data to arrive; returns [`Error::Timeout`](crate::error::Error::Timeout)
    /// if no data is received within the deadline.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `send()` and `receive()` calls
    /// should return [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}

//! Mock transport for deterministic testing of instrument drivers.
//!
//! [`MockTransport`] implements the [`Transport`] trait with pre-loaded
//! request/response pairs. This lets you test command formatting,
//! acknowledgement handling, and response decoding without real hardware.
//!
//! # Example
//!
//! ```
//! use benchlink_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! // Query: forward power. The generator replies with one payload byte
//! // (30 W) followed by the carriage-return terminator.
//! mock.expect(b"6\r", b"\x1e\r");
//! // Set command: the generator acknowledges with a single 'A'.
//! mock.expect_ack(b"A100\r");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

use benchlink_core::error::{Error, Result};
use benchlink_core::transport::Transport;

/// A pre-loaded request/response pair for the mock transport.
#[derive(Debug, Clone)]
struct Exchange {
    /// The exact bytes we expect the driver to send.
    request: Vec<u8>,
    /// The bytes the mock instrument replies with.
    response: Vec<u8>,
}

/// A mock [`Transport`] for testing instrument drivers without hardware.
///
/// Exchanges are consumed in order, matching the strictly half-duplex
/// request-then-reply protocol the drivers speak: each `send()` is matched
/// against the next expected request, and the paired response is then
/// returned by subsequent `receive()` calls (possibly split across several
/// reads if the caller's buffer is small).
///
/// If the sent bytes do not match, or the queue is exhausted, an error is
/// returned so the test fails at the point of divergence.
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Ordered queue of expected exchanges.
    exchanges: VecDeque<Exchange>,
    /// Response bytes pending for the next `receive()` call.
    pending_response: Option<Vec<u8>>,
    /// Cursor into the pending response.
    response_cursor: usize,
    /// Whether the transport is "connected".
    disconnected: bool,
    /// Log of all byte strings sent through this transport, in order.
    sent_log: Vec<Vec<u8>>,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport::default()
    }

    /// Add an expected request/response exchange.
    ///
    /// When `send()` is called with data matching `request`, subsequent
    /// `receive()` calls return `response`.
    pub fn expect(&mut self, request: &[u8], response: &[u8]) {
        self.exchanges.push_back(Exchange {
            request: request.to_vec(),
            response: response.to_vec(),
        });
    }

    /// Add an expected set/action command answered by the single
    /// acknowledgement byte `A`.
    pub fn expect_ack(&mut self, request: &[u8]) {
        self.expect(request, b"A");
    }

    /// Return all data that has been sent through this transport.
    ///
    /// Each element is the byte string from one `send()` call. Tests use
    /// this to assert command ordering (e.g. bias before RF).
    pub fn sent_data(&self) -> &[Vec<u8>] {
        &self.sent_log
    }

    /// Return the number of exchanges that have not yet been consumed.
    pub fn remaining_exchanges(&self) -> usize {
        self.exchanges.len()
    }

    /// Simulate a dropped connection.
    ///
    /// Subsequent `send()` and `receive()` calls return
    /// [`Error::NotConnected`].
    pub fn set_disconnected(&mut self) {
        self.disconnected = true;
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if self.disconnected {
            return Err(Error::NotConnected);
        }

        // Record what was sent.
        self.sent_log.push(data.to_vec());

        // Match against the next expected exchange.
        if let Some(exchange) = self.exchanges.pop_front() {
            if data != exchange.request.as_slice() {
                return Err(Error::Protocol(format!(
                    "unexpected send data: expected {:02X?}, got {:02X?}",
                    exchange.request, data
                )));
            }
            self.pending_response = Some(exchange.response);
            self.response_cursor = 0;
            Ok(())
        } else {
            Err(Error::Protocol(
                "no more exchanges loaded in mock transport".into(),
            ))
        }
    }

    async fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if self.disconnected {
            return Err(Error::NotConnected);
        }

        if let Some(ref response) = self.pending_response {
            let remaining = &response[self.response_cursor..];
            if remaining.is_empty() {
                self.pending_response = None;
                self.response_cursor = 0;
                return Err(Error::Timeout);
            }
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.response_cursor += n;
            if self.response_cursor >= response.len() {
                // All response bytes consumed; clear for the next exchange.
                self.pending_response = None;
                self.response_cursor = 0;
            }
            Ok(n)
        } else {
            Err(Error::Timeout)
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.disconnected = true;
        self.pending_response = None;
        self.response_cursor = 0;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchlink_core::transport::Transport;

    #[tokio::test]
    async fn basic_send_receive() {
        let mut mock = MockTransport::new();
        // Forward power query -> 30 W + terminator.
        mock.expect(b"6\r", b"\x1e\r");

        mock.send(b"6\r").await.unwrap();

        let mut buf = [0u8; 16];
        let n = mock
            .receive(&mut buf, Duration::from_millis(100))
            .await
            .unwrap();

        assert_eq!(n, 2);
        assert_eq!(&buf[..n], b"\x1e\r");
    }

    #[tokio::test]
    async fn expect_ack_preloads_single_byte() {
        let mut mock = MockTransport::new();
        mock.expect_ack(b"A100\r");

        mock.send(b"A100\r").await.unwrap();

        let mut buf = [0u8; 4];
        let n = mock
            .receive(&mut buf, Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(&buf[..n], b"A");
    }

    #[tokio::test]
    async fn tracks_sent_data_in_order() {
        let mut mock = MockTransport::new();
        mock.expect_ack(b"X\r");
        mock.expect_ack(b"O\r");

        mock.send(b"X\r").await.unwrap();
        let mut buf = [0u8; 4];
        let _ = mock.receive(&mut buf, Duration::from_millis(10)).await;
        mock.send(b"O\r").await.unwrap();

        assert_eq!(mock.sent_data().len(), 2);
        assert_eq!(mock.sent_data()[0], b"X\r");
        assert_eq!(mock.sent_data()[1], b"O\r");
    }

    #[tokio::test]
    async fn wrong_data_errors() {
        let mut mock = MockTransport::new();
        mock.expect_ack(b"X\r");

        let result = mock.send(b"O\r").await;
        assert!(matches!(result.unwrap_err(), Error::Protocol(_)));
    }

    #[tokio::test]
    async fn exhausted_exchanges_error() {
        let mut mock = MockTransport::new();

        let result = mock.send(b"6\r").await;
        assert!(matches!(result.unwrap_err(), Error::Protocol(_)));
    }

    #[tokio::test]
    async fn receive_without_send_times_out() {
        let mut mock = MockTransport::new();
        let mut buf = [0u8; 16];

        let result = mock.receive(&mut buf, Duration::from_millis(10)).await;
        assert!(matches!(result.unwrap_err(), Error::Timeout));
    }

    #[tokio::test]
    async fn close_disconnects() {
        let mut mock = MockTransport::new();
        assert!(mock.is_connected());

        mock.close().await.unwrap();
        assert!(!mock.is_connected());

        let result = mock.send(b"6\r").await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));
    }

    #[tokio::test]
    async fn set_disconnected_fails_both_directions() {
        let mut mock = MockTransport::new();
        mock.set_disconnected();
        assert!(!mock.is_connected());

        assert!(matches!(
            mock.send(b"6\r").await.unwrap_err(),
            Error::NotConnected
        ));

        let mut buf = [0u8; 8];
        assert!(matches!(
            mock.receive(&mut buf, Duration::from_millis(10))
                .await
                .unwrap_err(),
            Error::NotConnected
        ));
    }

    #[tokio::test]
    async fn remaining_exchanges_counts_down() {
        let mut mock = MockTransport::new();
        mock.expect_ack(b"z\r");
        mock.expect_ack(b"SE\r");
        assert_eq!(mock.remaining_exchanges(), 2);

        mock.send(b"z\r").await.unwrap();
        assert_eq!(mock.remaining_exchanges(), 1);

        let mut buf = [0u8; 4];
        let _ = mock.receive(&mut buf, Duration::from_millis(10)).await;

        mock.send(b"SE\r").await.unwrap();
        assert_eq!(mock.remaining_exchanges(), 0);
    }

    #[tokio::test]
    async fn partial_receive_with_small_buffer() {
        let mut mock = MockTransport::new();
        // Frequency readback: ASCII token + terminator.
        mock.expect(b"f?\r", b"2450010kHz\r");

        mock.send(b"f?\r").await.unwrap();

        // Read with a buffer smaller than the response.
        let mut buf = [0u8; 4];
        let mut collected = Vec::new();
        loop {
            match mock.receive(&mut buf, Duration::from_millis(10)).await {
                Ok(n) => collected.extend_from_slice(&buf[..n]),
                Err(Error::Timeout) => break,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(collected, b"2450010kHz\r");
    }
}

//! benchlink-test-harness: Mock transports for testing drivers without
//! hardware.
//!
//! Provides [`MockTransport`], an implementation of
//! [`Transport`](benchlink_core::Transport) driven by an ordered queue of
//! expected request/response exchanges. Driver tests pre-load the wire
//! bytes they expect to send and the reply the instrument would produce,
//! then assert on decoded values and on the transport's sent log.

pub mod mock_serial;

pub use mock_serial::MockTransport;

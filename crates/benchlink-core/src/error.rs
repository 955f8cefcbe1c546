//! Error types for benchlink.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer, protocol-layer, and
//! validation errors are all captured here.

/// The error type for all benchlink operations.
///
/// Variants cover the full range of failure modes encountered when talking
/// to laboratory instruments: physical transport failures, framing and
/// acknowledgement violations, response decode errors, and rejected
/// parameter values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (serial port open failure, device vanished).
    #[error("transport error: {0}")]
    Transport(String),

    /// A protocol-level error (missing or wrong acknowledgement byte,
    /// unexpected reply shape).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A response frame did not end with the expected termination byte.
    ///
    /// Carries the offending final byte. Fatal to the exchange that
    /// received it; the driver never retries internally.
    #[error("invalid termination byte received: {byte:#04x}")]
    Framing {
        /// The byte received where the terminator was expected.
        byte: u8,
    },

    /// A response decoded to a value outside any expected mapping
    /// (unknown discrete code, wrong payload width, bad unit suffix).
    #[error("decode error: {0}")]
    Decode(String),

    /// A caller-supplied value failed its declared constraint and could
    /// not be coerced to a legal one.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested parameter or action does not exist on this instrument.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Timed out waiting for a response from the instrument.
    ///
    /// This typically indicates the instrument is powered off, the baud
    /// rate is wrong, or the cable is disconnected.
    #[error("timeout waiting for response")]
    Timeout,

    /// No connection to the instrument has been established.
    #[error("not connected")]
    NotConnected,

    /// The connection to the instrument was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

//! KU SG 2.45-250 A wire-protocol primitives.
//!
//! The generator speaks a small half-duplex ASCII protocol over serial.
//! Commands are short tokens (1-3 printable characters), optionally
//! followed by a zero-padded decimal payload or a `?` suffix, and always
//! terminated with a carriage return. Replies come in three shapes:
//!
//! - **Acknowledgement**: set/action commands are confirmed with the
//!   single byte `A`.
//! - **Binary frame**: 1-2 little-endian payload bytes followed by the
//!   terminator (voltage rails, power meters, boolean flags, phase,
//!   reflection limit).
//! - **ASCII line**: a terminator-ended text token, either plain decimal
//!   (`"020"`) or unit-suffixed (`"2450MHz"`, `"2450010kHz"`).
//!
//! Which reply a command produces is declared per command in the
//! [`Command`] values built by [`commands`](crate::commands); the raw
//! wire rule (`?`-suffixed commands and the fixed status set `v 5 8 6 7 T`
//! never expect an acknowledgement) is kept here as
//! [`expects_acknowledgement`] so the table and the rule can be checked
//! against each other in isolation.

use benchlink_core::error::{Error, Result};
use bytes::{BufMut, BytesMut};

/// Terminator byte for both command and reply directions.
pub const TERMINATOR: u8 = b'\r';

/// Acknowledgement byte sent by the generator for accepted set/action
/// commands.
pub const ACK: u8 = b'A';

/// Single-character status queries whose reply is data, not an
/// acknowledgement.
pub const NO_ACK_STATUS_COMMANDS: &[&str] = &["v", "5", "8", "6", "7", "T"];

/// Wire rule for acknowledgement expectations.
///
/// A command expects the `A` acknowledgement byte unless it is one of the
/// fixed status queries or ends with `?`.
pub fn expects_acknowledgement(body: &str) -> bool {
    !(NO_ACK_STATUS_COMMANDS.contains(&body) || body.ends_with('?'))
}

/// The reply shape a command produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Single acknowledgement byte [`ACK`].
    Ack,
    /// Binary frame: `payload` little-endian bytes plus the terminator.
    Binary {
        /// Number of payload bytes before the terminator.
        payload: usize,
    },
    /// ASCII token ended by the terminator.
    Line,
}

/// One fully-formed command with its declared reply shape.
///
/// Constructed by the builders in [`commands`](crate::commands); the
/// driver dispatches its read path on [`Command::reply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command token as sent on the wire, without the terminator.
    pub body: String,
    /// Reply shape the generator produces for this command.
    pub reply: ReplyKind,
}

impl Command {
    pub(crate) fn ack(body: impl Into<String>) -> Self {
        Command {
            body: body.into(),
            reply: ReplyKind::Ack,
        }
    }

    pub(crate) fn binary(body: impl Into<String>, payload: usize) -> Self {
        Command {
            body: body.into(),
            reply: ReplyKind::Binary { payload },
        }
    }

    pub(crate) fn line(body: impl Into<String>) -> Self {
        Command {
            body: body.into(),
            reply: ReplyKind::Line,
        }
    }

    /// Encode this command into raw bytes ready for transmission.
    pub fn encode(&self) -> Vec<u8> {
        encode_command(&self.body)
    }

    /// Whether this command is answered by the acknowledgement byte.
    pub fn expects_acknowledgement(&self) -> bool {
        matches!(self.reply, ReplyKind::Ack)
    }
}

/// Encode a command body into raw bytes ready for transmission.
///
/// Appends the terminator to the ASCII body.
///
/// # Example
///
/// ```
/// use benchlink_kuhne::protocol::encode_command;
///
/// assert_eq!(encode_command("f?"), b"f?\r");
/// assert_eq!(encode_command("A100"), b"A100\r");
/// ```
pub fn encode_command(body: &str) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(body.len() + 1);
    buf.put_slice(body.as_bytes());
    buf.put_u8(TERMINATOR);
    buf.to_vec()
}

/// Validate a binary reply frame and return its payload bytes.
///
/// Every binary frame must end with the terminator; anything else is a
/// framing error carrying the offending byte, and the exchange that
/// received it fails without a value update.
pub fn frame_payload(frame: &[u8]) -> Result<&[u8]> {
    match frame.split_last() {
        None => Err(Error::Decode("empty response frame".into())),
        Some((&TERMINATOR, payload)) => Ok(payload),
        Some((&byte, _)) => Err(Error::Framing { byte }),
    }
}

/// Decode a 2-byte little-endian unsigned payload.
pub fn decode_u16_le(payload: &[u8]) -> Result<u16> {
    match payload {
        [lo, hi] => Ok(u16::from_le_bytes([*lo, *hi])),
        _ => Err(Error::Decode(format!(
            "expected 2 payload bytes, got {}",
            payload.len()
        ))),
    }
}

/// Decode a 1-byte unsigned payload.
pub fn decode_u8(payload: &[u8]) -> Result<u8> {
    match payload {
        [b] => Ok(*b),
        _ => Err(Error::Decode(format!(
            "expected 1 payload byte, got {}",
            payload.len()
        ))),
    }
}

/// Decode a 1-byte payload as a boolean flag (nonzero = true).
pub fn decode_bool(payload: &[u8]) -> Result<bool> {
    Ok(decode_u8(payload)? != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------------------------------------------------------------
    // Command encoding
    // ---------------------------------------------------------------

    #[test]
    fn encode_appends_terminator() {
        assert_eq!(encode_command("v"), b"v\r");
        assert_eq!(encode_command("f?"), b"f?\r");
        assert_eq!(encode_command("f2450"), b"f2450\r");
        assert_eq!(encode_command("A100"), b"A100\r");
        assert_eq!(encode_command("SE"), b"SE\r");
    }

    #[test]
    fn command_encode_matches_free_function() {
        let cmd = Command::ack("A100");
        assert_eq!(cmd.encode(), encode_command("A100"));
    }

    // ---------------------------------------------------------------
    // Acknowledgement rule
    // ---------------------------------------------------------------

    #[test]
    fn status_commands_do_not_expect_ack() {
        for body in ["v", "5", "8", "6", "7", "T"] {
            assert!(!expects_acknowledgement(body), "{body} should not expect ack");
        }
    }

    #[test]
    fn query_suffix_does_not_expect_ack() {
        for body in ["f?", "A?", "r?", "x?", "o?", "p?", "fm?", "H?", "B?", "C?", "c?"] {
            assert!(!expects_acknowledgement(body), "{body} should not expect ack");
        }
    }

    #[test]
    fn set_and_action_commands_expect_ack() {
        for body in [
            "R", "r", "X", "x", "O", "o", "P", "p", "fm1", "fm0", "f2450", "f2450010", "A100",
            "C0100", "c0100", "H128", "B3", "b050", "z", "SE",
        ] {
            assert!(expects_acknowledgement(body), "{body} should expect ack");
        }
    }

    #[test]
    fn reply_kind_agrees_with_wire_rule() {
        assert!(Command::ack("A100").expects_acknowledgement());
        assert!(!Command::binary("6", 1).expects_acknowledgement());
        assert!(!Command::line("f?").expects_acknowledgement());
    }

    // ---------------------------------------------------------------
    // Frame validation
    // ---------------------------------------------------------------

    #[test]
    fn frame_payload_strips_terminator() {
        assert_eq!(frame_payload(b"\x1e\r").unwrap(), b"\x1e");
        assert_eq!(frame_payload(b"\x10\x27\r").unwrap(), b"\x10\x27");
    }

    #[test]
    fn frame_payload_terminator_only_is_empty_payload() {
        assert_eq!(frame_payload(b"\r").unwrap(), b"");
    }

    #[test]
    fn frame_payload_rejects_wrong_terminator() {
        let err = frame_payload(b"\x1e\x0a").unwrap_err();
        match err {
            benchlink_core::Error::Framing { byte } => assert_eq!(byte, 0x0a),
            other => panic!("expected Framing, got {other:?}"),
        }
    }

    #[test]
    fn frame_payload_reports_offending_byte_in_hex() {
        let err = frame_payload(b"\x1e\x42").unwrap_err();
        assert_eq!(err.to_string(), "invalid termination byte received: 0x42");
    }

    #[test]
    fn frame_payload_rejects_empty_frame() {
        assert!(matches!(
            frame_payload(b""),
            Err(benchlink_core::Error::Decode(_))
        ));
    }

    // ---------------------------------------------------------------
    // Payload decoding
    // ---------------------------------------------------------------

    #[test]
    fn decode_u16_le_byte_order() {
        assert_eq!(decode_u16_le(&[0x10, 0x27]).unwrap(), 10_000);
        assert_eq!(decode_u16_le(&[0x00, 0x01]).unwrap(), 256);
        assert_eq!(decode_u16_le(&[0xff, 0x00]).unwrap(), 255);
    }

    #[test]
    fn decode_u16_le_wrong_width() {
        assert!(decode_u16_le(&[0x01]).is_err());
        assert!(decode_u16_le(&[0x01, 0x02, 0x03]).is_err());
        assert!(decode_u16_le(&[]).is_err());
    }

    #[test]
    fn decode_u8_single_byte() {
        assert_eq!(decode_u8(&[0x1e]).unwrap(), 30);
    }

    #[test]
    fn decode_u8_wrong_width() {
        assert!(decode_u8(&[]).is_err());
        assert!(decode_u8(&[0x01, 0x02]).is_err());
    }

    #[test]
    fn decode_bool_nonzero_is_true() {
        assert!(!decode_bool(&[0x00]).unwrap());
        assert!(decode_bool(&[0x01]).unwrap());
        assert!(decode_bool(&[0xff]).unwrap());
    }
}

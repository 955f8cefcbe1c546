//! KU SG 2.45-250 A command builders, validators, and response parsers.
//!
//! This module provides functions to construct command tokens for every
//! operation the generator supports (frequency, power, biasing, RF output,
//! pulse timing, phase, reflection limit, tuning, housekeeping) and to
//! parse or decode the corresponding responses.
//!
//! All functions are pure -- they produce or consume [`Command`] values,
//! strings, and payload bytes without performing any I/O. The driver in
//! [`generator`](crate::generator) is responsible for sending the bytes
//! over a transport and feeding replies back into the decoders.
//!
//! # Validation
//!
//! Each set operation applies its parameter's constraint explicitly before
//! the command is formatted:
//!
//! - ranges are truncated (coarse frequency to 2400-2500 MHz, fine
//!   frequency to 2400000-2500000 kHz, power to the per-instance limit,
//!   pulse timing to 10-1000 ms, phase to 0-358.6 degrees);
//! - step sizes are rounded (fine frequency to 10 kHz, pulse timing to
//!   5 ms);
//! - the reflection limit is a discrete set and is rejected outright for
//!   any value that maps to no device code.

use benchlink_core::error::{Error, Result};

use crate::protocol::Command;

// ---------------------------------------------------------------
// Device constants
// ---------------------------------------------------------------

/// Coarse frequency range in MHz.
pub const COARSE_FREQUENCY_RANGE_MHZ: (u16, u16) = (2400, 2500);

/// Fine frequency range in kHz.
pub const FINE_FREQUENCY_RANGE_KHZ: (u32, u32) = (2_400_000, 2_500_000);

/// Pulse width / off time range in ms.
pub const PULSE_TIME_RANGE_MS: (u16, u16) = (10, 1000);

/// Maximum phase shift in degrees (the 8-bit code ceiling).
pub const PHASE_SHIFT_MAX_DEGREES: f64 = 358.6;

/// Reflection limit device codes and their values in watts.
///
/// Code 0 disables the limit. An incoming code outside this table is a
/// decode error, never coerced.
pub const REFLECTION_LIMIT_MAP: [(u8, u16); 6] =
    [(0, 0), (1, 100), (2, 150), (3, 180), (4, 200), (5, 230)];

// ---------------------------------------------------------------
// Query command builders
// ---------------------------------------------------------------

/// Build a "read firmware version" command (`v`). ASCII reply.
pub fn cmd_read_version() -> Command {
    Command::line("v")
}

/// Build a "read temperature" command (`T`).
///
/// Reads the sensor near the final transistor; ASCII reply in °C.
pub fn cmd_read_temperature() -> Command {
    Command::line("T")
}

/// Build a "read internal 5V rail" command (`5`).
///
/// Replies with a 2-byte little-endian raw value; see
/// [`decode_voltage_5v`].
pub fn cmd_read_voltage_5v() -> Command {
    Command::binary("5", 2)
}

/// Build a "read 32V rail" command (`8`).
///
/// Replies with a 2-byte little-endian raw value; see
/// [`decode_voltage_32v`].
pub fn cmd_read_voltage_32v() -> Command {
    Command::binary("8", 2)
}

/// Build a "read forward power" command (`6`). One payload byte, watts.
pub fn cmd_read_power_forward() -> Command {
    Command::binary("6", 1)
}

/// Build a "read reverse power" command (`7`). One payload byte, watts.
pub fn cmd_read_power_reverse() -> Command {
    Command::binary("7", 1)
}

/// Build a "read external-enable mode" command (`r?`). Boolean payload.
pub fn cmd_read_external_enabled() -> Command {
    Command::binary("r?", 1)
}

/// Build a "read bias state" command (`x?`). Boolean payload.
pub fn cmd_read_bias_enabled() -> Command {
    Command::binary("x?", 1)
}

/// Build a "read RF output state" command (`o?`). Boolean payload.
pub fn cmd_read_rf_enabled() -> Command {
    Command::binary("o?", 1)
}

/// Build a "read pulse mode state" command (`p?`). Boolean payload.
pub fn cmd_read_pulse_mode_enabled() -> Command {
    Command::binary("p?", 1)
}

/// Build a "read fine-step mode" command (`fm?`). Boolean payload.
pub fn cmd_read_fine_steps_enabled() -> Command {
    Command::binary("fm?", 1)
}

/// Build a "read frequency" command (`f?`).
///
/// The reply is unit-suffixed ASCII: `"2450MHz"` in coarse mode,
/// `"2450010kHz"` in fine-step mode. Parse with
/// [`parse_coarse_frequency_response`] or
/// [`parse_fine_frequency_response`] according to the active mode.
pub fn cmd_read_frequency() -> Command {
    Command::line("f?")
}

/// Build a "read power set-point" command (`A?`). ASCII decimal, watts.
pub fn cmd_read_power_setpoint() -> Command {
    Command::line("A?")
}

/// Build a "read pulse width" command (`C?`). ASCII decimal, ms.
pub fn cmd_read_pulse_width() -> Command {
    Command::line("C?")
}

/// Build a "read pulse off time" command (`c?`). ASCII decimal, ms.
pub fn cmd_read_off_time() -> Command {
    Command::line("c?")
}

/// Build a "read phase shift" command (`H?`).
///
/// One payload byte holding the 8-bit phase code; see
/// [`decode_phase_shift`].
pub fn cmd_read_phase_shift() -> Command {
    Command::binary("H?", 1)
}

/// Build a "read reflection limit" command (`B?`).
///
/// One payload byte holding the device code; see
/// [`reflection_limit_from_code`].
pub fn cmd_read_reflection_limit() -> Command {
    Command::binary("B?", 1)
}

// ---------------------------------------------------------------
// Set / action command builders
// ---------------------------------------------------------------

/// Build a "set external-enable mode" command.
///
/// - `R` hands amplifier enabling to the external inputs on the 8-pin
///   connector.
/// - `r` keeps enabling under serial control.
pub fn cmd_set_external_enabled(on: bool) -> Command {
    if on { Command::ack("R") } else { Command::ack("r") }
}

/// Build a "set transistor biasing" command (`X` / `x`).
///
/// Biasing must be enabled before RF output is switched on.
pub fn cmd_set_bias_enabled(on: bool) -> Command {
    if on { Command::ack("X") } else { Command::ack("x") }
}

/// Build a "set RF output" command (`O` / `o`).
pub fn cmd_set_rf_enabled(on: bool) -> Command {
    if on { Command::ack("O") } else { Command::ack("o") }
}

/// Build a "set pulse mode" command (`P` / `p`).
pub fn cmd_set_pulse_mode_enabled(on: bool) -> Command {
    if on { Command::ack("P") } else { Command::ack("p") }
}

/// Build a "set fine-step mode" command (`fm1` / `fm0`).
pub fn cmd_set_fine_steps_enabled(on: bool) -> Command {
    if on {
        Command::ack("fm1")
    } else {
        Command::ack("fm0")
    }
}

/// Build a "set coarse frequency" command (`f{mhz:04}`).
///
/// 1 MHz resolution; out-of-range values are truncated to 2400-2500 MHz.
/// Fine-step mode must be disabled for the generator to interpret the
/// 4-digit form.
pub fn cmd_set_frequency_coarse(mhz: u16) -> Command {
    let mhz = truncate_coarse_frequency(mhz);
    Command::ack(format!("f{mhz:04}"))
}

/// Build a "set fine frequency" command (`f{khz:07}`).
///
/// 10 kHz resolution; out-of-range values are truncated to
/// 2400000-2500000 kHz and then rounded to the nearest multiple of 10.
/// Fine-step mode must be enabled for the generator to interpret the
/// 7-digit form.
pub fn cmd_set_frequency_fine(khz: u32) -> Command {
    let khz = round_fine_frequency(truncate_fine_frequency(khz));
    Command::ack(format!("f{khz:07}"))
}

/// Build a "set power set-point" command (`A{watts:03}`).
///
/// 1 W resolution; values above `power_limit` are truncated to it.
pub fn cmd_set_power_setpoint(watts: u16, power_limit: u16) -> Command {
    let watts = truncate_power(watts, power_limit);
    Command::ack(format!("A{watts:03}"))
}

/// Build a "set pulse width" command (`C{ms:04}`).
///
/// 5 ms resolution; values are truncated to 10-1000 ms and rounded to a
/// multiple of 5.
pub fn cmd_set_pulse_width(ms: u16) -> Command {
    let ms = round_pulse_time(truncate_pulse_time(ms));
    Command::ack(format!("C{ms:04}"))
}

/// Build a "set pulse off time" command (`c{ms:04}`).
///
/// Same range and resolution as [`cmd_set_pulse_width`].
pub fn cmd_set_off_time(ms: u16) -> Command {
    let ms = round_pulse_time(truncate_pulse_time(ms));
    Command::ack(format!("c{ms:04}"))
}

/// Build a "set phase shift" command (`H{code:03}`).
///
/// The phase is truncated to 0-358.6 degrees and converted to the
/// device's 8-bit code.
pub fn cmd_set_phase_shift(degrees: f64) -> Command {
    let code = phase_to_code(degrees);
    Command::ack(format!("H{code:03}"))
}

/// Build a "set reflection limit" command (`B{code}`).
///
/// The limit must be one of the discrete values in
/// [`REFLECTION_LIMIT_MAP`] (0 disables the limit); anything else is
/// rejected before transmission.
pub fn cmd_set_reflection_limit(watts: u16) -> Result<Command> {
    let code = reflection_limit_to_code(watts)?;
    Ok(Command::ack(format!("B{code}")))
}

/// Build a "tune" command (`b{watts:03}`).
///
/// Starts the generator's sweep for the frequency with lowest reflection
/// at the given power. Fire-and-forget: the hardware sweeps and settles
/// on its own, and the driver does not poll for completion. The power is
/// truncated to the per-instance limit.
pub fn cmd_tune(watts: u16, power_limit: u16) -> Command {
    let watts = truncate_power(watts, power_limit);
    Command::ack(format!("b{watts:03}"))
}

/// Build a "clear VSWR error" command (`z`).
///
/// Unlocks power control after a reflection-limit trip.
pub fn cmd_clear_vswr_error() -> Command {
    Command::ack("z")
}

/// Build a "store settings" command (`SE`).
///
/// Persists frequency mode, frequency, power set-point, external-enable
/// mode, reflection limit, and pulse timing to the generator's EEPROM.
pub fn cmd_store_settings() -> Command {
    Command::ack("SE")
}

// ---------------------------------------------------------------
// Validators and value conversions
// ---------------------------------------------------------------

/// Truncate a coarse frequency to the generator's 2400-2500 MHz range.
pub fn truncate_coarse_frequency(mhz: u16) -> u16 {
    mhz.clamp(COARSE_FREQUENCY_RANGE_MHZ.0, COARSE_FREQUENCY_RANGE_MHZ.1)
}

/// Truncate a fine frequency to the generator's kHz range.
pub fn truncate_fine_frequency(khz: u32) -> u32 {
    khz.clamp(FINE_FREQUENCY_RANGE_KHZ.0, FINE_FREQUENCY_RANGE_KHZ.1)
}

/// Round a fine frequency to the nearest multiple of 10 kHz.
///
/// Halves round up: 2450005 becomes 2450010.
pub fn round_fine_frequency(khz: u32) -> u32 {
    khz.saturating_add(5) / 10 * 10
}

/// Truncate a power value to `[0, power_limit]` watts.
pub fn truncate_power(watts: u16, power_limit: u16) -> u16 {
    watts.min(power_limit)
}

/// Truncate a pulse width / off time to the 10-1000 ms range.
pub fn truncate_pulse_time(ms: u16) -> u16 {
    ms.clamp(PULSE_TIME_RANGE_MS.0, PULSE_TIME_RANGE_MS.1)
}

/// Round a pulse width / off time to a multiple of 5 ms.
///
/// Follows the firmware convention: round the doubled value half-to-even
/// at 10 ms resolution, then halve.
pub fn round_pulse_time(ms: u16) -> u16 {
    let doubled = f64::from(ms) * 2.0;
    let rounded = (doubled / 10.0).round_ties_even() * 10.0;
    (rounded / 2.0) as u16
}

/// Truncate a phase shift to the 0-358.6 degree range.
pub fn truncate_phase(degrees: f64) -> f64 {
    degrees.clamp(0.0, PHASE_SHIFT_MAX_DEGREES)
}

/// Convert a phase shift in degrees to the device's 8-bit code.
pub fn phase_to_code(degrees: f64) -> u8 {
    (truncate_phase(degrees) / 360.0 * 256.0).round() as u8
}

/// Convert the device's 8-bit phase code back to degrees.
pub fn decode_phase_shift(code: u8) -> f64 {
    f64::from(code) / 256.0 * 360.0
}

/// Map a reflection limit in watts to its device code.
///
/// Values outside the discrete set are a hard rejection, not truncated.
pub fn reflection_limit_to_code(watts: u16) -> Result<u8> {
    REFLECTION_LIMIT_MAP
        .iter()
        .find(|(_, w)| *w == watts)
        .map(|(code, _)| *code)
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "reflection limit {watts} W is not one of 0, 100, 150, 180, 200, 230"
            ))
        })
}

/// Map a reflection limit device code back to watts.
pub fn reflection_limit_from_code(code: u8) -> Result<u16> {
    REFLECTION_LIMIT_MAP
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, watts)| *watts)
        .ok_or_else(|| Error::Decode(format!("unknown reflection limit code: {code}")))
}

/// Convert a raw 5V-rail reading to volts.
pub fn decode_voltage_5v(raw: u16) -> f64 {
    f64::from(raw) * 103.0 / 4700.0
}

/// Convert a raw 32V-rail reading to volts.
pub fn decode_voltage_32v(raw: u16) -> f64 {
    f64::from(raw) * 1282.0 / 8200.0
}

// ---------------------------------------------------------------
// Response parsers
// ---------------------------------------------------------------

/// Parse a coarse frequency readback (`"2450MHz"`) into MHz.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the `MHz` suffix is missing or the digits
/// do not parse.
pub fn parse_coarse_frequency_response(data: &str) -> Result<u16> {
    let digits = data.strip_suffix("MHz").ok_or_else(|| {
        Error::Decode(format!("expected MHz-suffixed frequency, got {data:?}"))
    })?;
    digits
        .parse()
        .map_err(|e| Error::Decode(format!("invalid frequency digits {digits:?}: {e}")))
}

/// Parse a fine frequency readback (`"2450010kHz"`) into kHz.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the `kHz` suffix is missing or the digits
/// do not parse.
pub fn parse_fine_frequency_response(data: &str) -> Result<u32> {
    let digits = data.strip_suffix("kHz").ok_or_else(|| {
        Error::Decode(format!("expected kHz-suffixed frequency, got {data:?}"))
    })?;
    digits
        .parse()
        .map_err(|e| Error::Decode(format!("invalid frequency digits {digits:?}: {e}")))
}

/// Parse an ASCII watts readback (power set-point).
pub fn parse_power_response(data: &str) -> Result<u16> {
    data.trim()
        .parse()
        .map_err(|e| Error::Decode(format!("invalid power digits {data:?}: {e}")))
}

/// Parse an ASCII milliseconds readback (pulse width / off time).
pub fn parse_pulse_time_response(data: &str) -> Result<u16> {
    data.trim()
        .parse()
        .map_err(|e| Error::Decode(format!("invalid pulse time digits {data:?}: {e}")))
}

/// Parse an ASCII temperature readback in °C.
pub fn parse_temperature_response(data: &str) -> Result<f64> {
    data.trim()
        .parse()
        .map_err(|e| Error::Decode(format!("invalid temperature {data:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{self, ReplyKind};

    // ---------------------------------------------------------------
    // Query command bytes
    // ---------------------------------------------------------------

    #[test]
    fn query_command_bytes() {
        assert_eq!(cmd_read_version().encode(), b"v\r");
        assert_eq!(cmd_read_temperature().encode(), b"T\r");
        assert_eq!(cmd_read_voltage_5v().encode(), b"5\r");
        assert_eq!(cmd_read_voltage_32v().encode(), b"8\r");
        assert_eq!(cmd_read_power_forward().encode(), b"6\r");
        assert_eq!(cmd_read_power_reverse().encode(), b"7\r");
        assert_eq!(cmd_read_external_enabled().encode(), b"r?\r");
        assert_eq!(cmd_read_bias_enabled().encode(), b"x?\r");
        assert_eq!(cmd_read_rf_enabled().encode(), b"o?\r");
        assert_eq!(cmd_read_pulse_mode_enabled().encode(), b"p?\r");
        assert_eq!(cmd_read_fine_steps_enabled().encode(), b"fm?\r");
        assert_eq!(cmd_read_frequency().encode(), b"f?\r");
        assert_eq!(cmd_read_power_setpoint().encode(), b"A?\r");
        assert_eq!(cmd_read_pulse_width().encode(), b"C?\r");
        assert_eq!(cmd_read_off_time().encode(), b"c?\r");
        assert_eq!(cmd_read_phase_shift().encode(), b"H?\r");
        assert_eq!(cmd_read_reflection_limit().encode(), b"B?\r");
    }

    #[test]
    fn binary_query_payload_widths() {
        assert_eq!(cmd_read_voltage_5v().reply, ReplyKind::Binary { payload: 2 });
        assert_eq!(cmd_read_voltage_32v().reply, ReplyKind::Binary { payload: 2 });
        assert_eq!(cmd_read_power_forward().reply, ReplyKind::Binary { payload: 1 });
        assert_eq!(cmd_read_power_reverse().reply, ReplyKind::Binary { payload: 1 });
        assert_eq!(cmd_read_bias_enabled().reply, ReplyKind::Binary { payload: 1 });
        assert_eq!(cmd_read_phase_shift().reply, ReplyKind::Binary { payload: 1 });
        assert_eq!(
            cmd_read_reflection_limit().reply,
            ReplyKind::Binary { payload: 1 }
        );
    }

    #[test]
    fn ascii_queries_are_line_replies() {
        for cmd in [
            cmd_read_version(),
            cmd_read_temperature(),
            cmd_read_frequency(),
            cmd_read_power_setpoint(),
            cmd_read_pulse_width(),
            cmd_read_off_time(),
        ] {
            assert_eq!(cmd.reply, ReplyKind::Line, "{}", cmd.body);
        }
    }

    // ---------------------------------------------------------------
    // Boolean set commands: uppercase enables, lowercase disables
    // ---------------------------------------------------------------

    #[test]
    fn boolean_set_command_bytes() {
        assert_eq!(cmd_set_external_enabled(true).encode(), b"R\r");
        assert_eq!(cmd_set_external_enabled(false).encode(), b"r\r");
        assert_eq!(cmd_set_bias_enabled(true).encode(), b"X\r");
        assert_eq!(cmd_set_bias_enabled(false).encode(), b"x\r");
        assert_eq!(cmd_set_rf_enabled(true).encode(), b"O\r");
        assert_eq!(cmd_set_rf_enabled(false).encode(), b"o\r");
        assert_eq!(cmd_set_pulse_mode_enabled(true).encode(), b"P\r");
        assert_eq!(cmd_set_pulse_mode_enabled(false).encode(), b"p\r");
        assert_eq!(cmd_set_fine_steps_enabled(true).encode(), b"fm1\r");
        assert_eq!(cmd_set_fine_steps_enabled(false).encode(), b"fm0\r");
    }

    // ---------------------------------------------------------------
    // Coarse frequency
    // ---------------------------------------------------------------

    #[test]
    fn set_coarse_frequency_in_range() {
        assert_eq!(cmd_set_frequency_coarse(2450).encode(), b"f2450\r");
        assert_eq!(cmd_set_frequency_coarse(2400).encode(), b"f2400\r");
        assert_eq!(cmd_set_frequency_coarse(2500).encode(), b"f2500\r");
    }

    #[test]
    fn set_coarse_frequency_truncates() {
        assert_eq!(cmd_set_frequency_coarse(2300).encode(), b"f2400\r");
        assert_eq!(cmd_set_frequency_coarse(9999).encode(), b"f2500\r");
        assert_eq!(cmd_set_frequency_coarse(0).encode(), b"f2400\r");
    }

    // ---------------------------------------------------------------
    // Fine frequency
    // ---------------------------------------------------------------

    #[test]
    fn set_fine_frequency_in_range() {
        assert_eq!(cmd_set_frequency_fine(2_450_010).encode(), b"f2450010\r");
        assert_eq!(cmd_set_frequency_fine(2_400_000).encode(), b"f2400000\r");
        assert_eq!(cmd_set_frequency_fine(2_500_000).encode(), b"f2500000\r");
    }

    #[test]
    fn set_fine_frequency_rounds_to_tens() {
        // Halfway rounds up.
        assert_eq!(cmd_set_frequency_fine(2_450_005).encode(), b"f2450010\r");
        assert_eq!(cmd_set_frequency_fine(2_450_004).encode(), b"f2450000\r");
        assert_eq!(cmd_set_frequency_fine(2_450_006).encode(), b"f2450010\r");
    }

    #[test]
    fn set_fine_frequency_truncates() {
        assert_eq!(cmd_set_frequency_fine(1_000_000).encode(), b"f2400000\r");
        assert_eq!(cmd_set_frequency_fine(3_000_000).encode(), b"f2500000\r");
    }

    #[test]
    fn round_fine_frequency_cases() {
        assert_eq!(round_fine_frequency(2_450_005), 2_450_010);
        assert_eq!(round_fine_frequency(2_450_000), 2_450_000);
        assert_eq!(round_fine_frequency(2_499_999), 2_500_000);
    }

    // ---------------------------------------------------------------
    // Power set-point and tune
    // ---------------------------------------------------------------

    #[test]
    fn set_power_zero_padded_three_digits() {
        assert_eq!(cmd_set_power_setpoint(0, 250).encode(), b"A000\r");
        assert_eq!(cmd_set_power_setpoint(20, 250).encode(), b"A020\r");
        assert_eq!(cmd_set_power_setpoint(250, 250).encode(), b"A250\r");
    }

    #[test]
    fn set_power_clamped_to_limit() {
        // A generator configured with power_limit=100 never transmits more.
        assert_eq!(cmd_set_power_setpoint(150, 100).encode(), b"A100\r");
        assert_eq!(cmd_set_power_setpoint(100, 100).encode(), b"A100\r");
        assert_eq!(cmd_set_power_setpoint(99, 100).encode(), b"A099\r");
    }

    #[test]
    fn tune_command_bytes() {
        assert_eq!(cmd_tune(50, 250).encode(), b"b050\r");
        assert_eq!(cmd_tune(0, 250).encode(), b"b000\r");
    }

    #[test]
    fn tune_clamped_to_limit() {
        assert_eq!(cmd_tune(150, 100).encode(), b"b100\r");
    }

    // ---------------------------------------------------------------
    // Pulse timing
    // ---------------------------------------------------------------

    #[test]
    fn set_pulse_width_four_digits() {
        assert_eq!(cmd_set_pulse_width(10).encode(), b"C0010\r");
        assert_eq!(cmd_set_pulse_width(1000).encode(), b"C1000\r");
        assert_eq!(cmd_set_pulse_width(100).encode(), b"C0100\r");
    }

    #[test]
    fn set_off_time_four_digits() {
        assert_eq!(cmd_set_off_time(10).encode(), b"c0010\r");
        assert_eq!(cmd_set_off_time(500).encode(), b"c0500\r");
    }

    #[test]
    fn pulse_time_rounds_to_fives() {
        assert_eq!(cmd_set_pulse_width(12).encode(), b"C0010\r");
        assert_eq!(cmd_set_pulse_width(13).encode(), b"C0015\r");
        assert_eq!(cmd_set_pulse_width(17).encode(), b"C0015\r");
        assert_eq!(cmd_set_pulse_width(18).encode(), b"C0020\r");
    }

    #[test]
    fn pulse_time_truncates() {
        assert_eq!(cmd_set_pulse_width(5).encode(), b"C0010\r");
        assert_eq!(cmd_set_pulse_width(1500).encode(), b"C1000\r");
        assert_eq!(cmd_set_off_time(0).encode(), b"c0010\r");
    }

    #[test]
    fn round_pulse_time_cases() {
        assert_eq!(round_pulse_time(10), 10);
        assert_eq!(round_pulse_time(12), 10);
        assert_eq!(round_pulse_time(13), 15);
        assert_eq!(round_pulse_time(995), 995);
        assert_eq!(round_pulse_time(998), 1000);
    }

    // ---------------------------------------------------------------
    // Phase shift
    // ---------------------------------------------------------------

    #[test]
    fn set_phase_shift_codes() {
        assert_eq!(cmd_set_phase_shift(0.0).encode(), b"H000\r");
        assert_eq!(cmd_set_phase_shift(180.0).encode(), b"H128\r");
        assert_eq!(cmd_set_phase_shift(358.6).encode(), b"H255\r");
    }

    #[test]
    fn set_phase_shift_truncates() {
        assert_eq!(cmd_set_phase_shift(400.0).encode(), b"H255\r");
        assert_eq!(cmd_set_phase_shift(-10.0).encode(), b"H000\r");
    }

    #[test]
    fn phase_code_round_trip() {
        assert_eq!(phase_to_code(0.0), 0);
        assert_eq!(phase_to_code(180.0), 128);
        assert_eq!(phase_to_code(358.6), 255);
        assert!((decode_phase_shift(128) - 180.0).abs() < 1e-9);
        assert!((decode_phase_shift(0) - 0.0).abs() < 1e-9);
        assert!((decode_phase_shift(255) - 358.59375).abs() < 1e-9);
    }

    // ---------------------------------------------------------------
    // Reflection limit
    // ---------------------------------------------------------------

    #[test]
    fn set_reflection_limit_maps_to_codes() {
        assert_eq!(cmd_set_reflection_limit(0).unwrap().encode(), b"B0\r");
        assert_eq!(cmd_set_reflection_limit(100).unwrap().encode(), b"B1\r");
        assert_eq!(cmd_set_reflection_limit(150).unwrap().encode(), b"B2\r");
        assert_eq!(cmd_set_reflection_limit(180).unwrap().encode(), b"B3\r");
        assert_eq!(cmd_set_reflection_limit(200).unwrap().encode(), b"B4\r");
        assert_eq!(cmd_set_reflection_limit(230).unwrap().encode(), b"B5\r");
    }

    #[test]
    fn set_reflection_limit_rejects_unknown_values() {
        let err = cmd_set_reflection_limit(120).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        assert!(cmd_set_reflection_limit(1).is_err());
        assert!(cmd_set_reflection_limit(250).is_err());
    }

    #[test]
    fn reflection_limit_round_trips() {
        for watts in [0u16, 100, 150, 180, 200, 230] {
            let code = reflection_limit_to_code(watts).unwrap();
            assert_eq!(reflection_limit_from_code(code).unwrap(), watts);
        }
    }

    #[test]
    fn reflection_limit_unknown_code_is_decode_error() {
        let err = reflection_limit_from_code(6).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.to_string().contains("6"));
    }

    // ---------------------------------------------------------------
    // Housekeeping commands
    // ---------------------------------------------------------------

    #[test]
    fn housekeeping_command_bytes() {
        assert_eq!(cmd_clear_vswr_error().encode(), b"z\r");
        assert_eq!(cmd_store_settings().encode(), b"SE\r");
    }

    // ---------------------------------------------------------------
    // Voltage decoding
    // ---------------------------------------------------------------

    #[test]
    fn decode_voltage_5v_scale() {
        assert!((decode_voltage_5v(0) - 0.0).abs() < 1e-9);
        // 228 raw ~= 5.00 V
        assert!((decode_voltage_5v(228) - 4.9966).abs() < 1e-3);
    }

    #[test]
    fn decode_voltage_32v_scale() {
        assert!((decode_voltage_32v(0) - 0.0).abs() < 1e-9);
        // 205 raw ~= 32.05 V
        assert!((decode_voltage_32v(205) - 32.05).abs() < 1e-9);
    }

    // ---------------------------------------------------------------
    // Response parsing
    // ---------------------------------------------------------------

    #[test]
    fn parse_coarse_frequency() {
        assert_eq!(parse_coarse_frequency_response("2450MHz").unwrap(), 2450);
        assert_eq!(parse_coarse_frequency_response("2400MHz").unwrap(), 2400);
    }

    #[test]
    fn parse_coarse_frequency_bad_suffix() {
        assert!(parse_coarse_frequency_response("2450kHz").is_err());
        assert!(parse_coarse_frequency_response("2450").is_err());
        assert!(parse_coarse_frequency_response("").is_err());
    }

    #[test]
    fn parse_fine_frequency() {
        assert_eq!(
            parse_fine_frequency_response("2450010kHz").unwrap(),
            2_450_010
        );
    }

    #[test]
    fn parse_fine_frequency_bad_suffix() {
        assert!(parse_fine_frequency_response("2450MHz").is_err());
        assert!(parse_fine_frequency_response("2450010").is_err());
    }

    #[test]
    fn parse_fine_frequency_bad_digits() {
        assert!(parse_fine_frequency_response("24x0010kHz").is_err());
    }

    #[test]
    fn parse_power_readback() {
        assert_eq!(parse_power_response("020").unwrap(), 20);
        assert_eq!(parse_power_response("250").unwrap(), 250);
        assert!(parse_power_response("20W").is_err());
        assert!(parse_power_response("").is_err());
    }

    #[test]
    fn parse_pulse_time_readback() {
        assert_eq!(parse_pulse_time_response("0100").unwrap(), 100);
        assert_eq!(parse_pulse_time_response("1000").unwrap(), 1000);
        assert!(parse_pulse_time_response("10ms").is_err());
    }

    #[test]
    fn parse_temperature_readback() {
        assert!((parse_temperature_response("35").unwrap() - 35.0).abs() < 1e-9);
        assert!((parse_temperature_response("35.5").unwrap() - 35.5).abs() < 1e-9);
        assert!(parse_temperature_response("hot").is_err());
    }

    // ---------------------------------------------------------------
    // Reply table agrees with the wire rule
    // ---------------------------------------------------------------

    #[test]
    fn reply_table_matches_acknowledgement_rule() {
        let commands = vec![
            cmd_read_version(),
            cmd_read_temperature(),
            cmd_read_voltage_5v(),
            cmd_read_voltage_32v(),
            cmd_read_power_forward(),
            cmd_read_power_reverse(),
            cmd_read_external_enabled(),
            cmd_read_bias_enabled(),
            cmd_read_rf_enabled(),
            cmd_read_pulse_mode_enabled(),
            cmd_read_fine_steps_enabled(),
            cmd_read_frequency(),
            cmd_read_power_setpoint(),
            cmd_read_pulse_width(),
            cmd_read_off_time(),
            cmd_read_phase_shift(),
            cmd_read_reflection_limit(),
            cmd_set_external_enabled(true),
            cmd_set_external_enabled(false),
            cmd_set_bias_enabled(true),
            cmd_set_bias_enabled(false),
            cmd_set_rf_enabled(true),
            cmd_set_rf_enabled(false),
            cmd_set_pulse_mode_enabled(true),
            cmd_set_pulse_mode_enabled(false),
            cmd_set_fine_steps_enabled(true),
            cmd_set_fine_steps_enabled(false),
            cmd_set_frequency_coarse(2450),
            cmd_set_frequency_fine(2_450_010),
            cmd_set_power_setpoint(20, 250),
            cmd_set_pulse_width(100),
            cmd_set_off_time(100),
            cmd_set_phase_shift(90.0),
            cmd_set_reflection_limit(180).unwrap(),
            cmd_tune(50, 250),
            cmd_clear_vswr_error(),
            cmd_store_settings(),
        ];

        for cmd in commands {
            assert_eq!(
                cmd.expects_acknowledgement(),
                protocol::expects_acknowledgement(&cmd.body),
                "reply table disagrees with wire rule for {:?}",
                cmd.body
            );
        }
    }
}

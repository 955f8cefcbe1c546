//! Kusg245 -- the driver for the KU SG 2.45-250 A microwave generator.
//!
//! This module ties the command builders and protocol codec
//! ([`commands`], [`protocol`]) to a [`Transport`] to produce a working
//! generator backend. It handles the strictly half-duplex
//! command/acknowledgement exchange, binary-frame validation, and the safe
//! power-up/power-down sequencing.
//!
//! The transport is owned exclusively behind a mutex, so exactly one
//! command/response exchange is in flight at any time and concurrent
//! callers cannot interleave bytes on the wire. Each accessor awaits its
//! full exchange before returning; there are no internal retries -- an
//! acknowledgement or framing failure is surfaced immediately and retry
//! policy belongs to the caller (e.g. a polling loop that reports the
//! error and continues).

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use benchlink_core::error::{Error, Result};
use benchlink_core::instrument::Instrument;
use benchlink_core::transport::Transport;
use benchlink_core::types::{
    Access, ActionDescriptor, InstrumentInfo, ParameterDescriptor, Value, ValueKind,
};

use crate::commands;
use crate::models::KuhneModel;
use crate::protocol::{self, Command, ReplyKind};

/// Delay between enabling bias and enabling RF during turn-on.
///
/// Switching RF into an amplifier stage whose bias has not settled is a
/// documented device hazard.
const BIAS_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on an ASCII reply before the exchange is abandoned.
/// Real replies are at most ~10 bytes; this only guards against noise.
const MAX_LINE: usize = 64;

/// A connected KU SG 2.45-250 A generator.
///
/// Constructed via [`KusgBuilder`](crate::builder::KusgBuilder). All
/// communication goes through the [`Transport`] provided at build time.
pub struct Kusg245 {
    transport: Mutex<Box<dyn Transport>>,
    model: KuhneModel,
    info: InstrumentInfo,
    power_limit: u16,
    command_timeout: Duration,
}

impl std::fmt::Debug for Kusg245 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kusg245")
            .field("transport", &"Box<dyn Transport>")
            .field("model", &self.model)
            .field("info", &self.info)
            .field("power_limit", &self.power_limit)
            .field("command_timeout", &self.command_timeout)
            .finish()
    }
}

impl Kusg245 {
    /// Create a new `Kusg245` from its constituent parts.
    ///
    /// This is called by [`KusgBuilder`](crate::builder::KusgBuilder);
    /// callers should use the builder API instead.
    pub(crate) fn new(
        transport: Box<dyn Transport>,
        model: KuhneModel,
        power_limit: u16,
        command_timeout: Duration,
    ) -> Self {
        let info = InstrumentInfo {
            manufacturer: model.manufacturer.to_string(),
            model_name: model.name.to_string(),
            model_id: model.model_id.to_string(),
        };
        Kusg245 {
            transport: Mutex::new(transport),
            model,
            info,
            power_limit,
            command_timeout,
        }
    }

    /// The model this driver was built for.
    pub fn model(&self) -> &KuhneModel {
        &self.model
    }

    /// The configured power set-point ceiling in watts.
    pub fn power_limit(&self) -> u16 {
        self.power_limit
    }

    // -----------------------------------------------------------------
    // Exchange primitives
    // -----------------------------------------------------------------

    /// Send a set/action command and verify the acknowledgement byte.
    async fn execute(&self, cmd: &Command) -> Result<()> {
        debug_assert!(cmd.expects_acknowledgement());

        let mut transport = self.transport.lock().await;
        trace!(command = %cmd.body, "sending set command");
        transport.send(&cmd.encode()).await?;

        let reply = read_exact(&mut **transport, 1, self.command_timeout).await?;
        if reply[0] != protocol::ACK {
            return Err(Error::Protocol(format!(
                "expected acknowledgment, got {:#04x}",
                reply[0]
            )));
        }
        Ok(())
    }

    /// Send a query and read its fixed-width binary reply frame.
    ///
    /// Returns the payload bytes with the terminator stripped; a frame
    /// ending in anything but the terminator is a framing error.
    async fn query_frame(&self, cmd: &Command) -> Result<Vec<u8>> {
        let payload_len = match cmd.reply {
            ReplyKind::Binary { payload } => payload,
            _ => {
                return Err(Error::Protocol(format!(
                    "command {:?} does not produce a binary reply",
                    cmd.body
                )))
            }
        };

        let mut transport = self.transport.lock().await;
        trace!(command = %cmd.body, "sending binary query");
        transport.send(&cmd.encode()).await?;

        let frame = read_exact(&mut **transport, payload_len + 1, self.command_timeout).await?;
        Ok(protocol::frame_payload(&frame)?.to_vec())
    }

    /// Send a query and read its terminator-ended ASCII reply.
    async fn query_line(&self, cmd: &Command) -> Result<String> {
        let mut transport = self.transport.lock().await;
        trace!(command = %cmd.body, "sending text query");
        transport.send(&cmd.encode()).await?;

        read_line(&mut **transport, self.command_timeout).await
    }

    // -----------------------------------------------------------------
    // Housekeeping readbacks
    // -----------------------------------------------------------------

    /// Read the firmware version string.
    pub async fn version(&self) -> Result<String> {
        self.query_line(&commands::cmd_read_version()).await
    }

    /// Read the temperature near the final transistor in °C.
    pub async fn temperature(&self) -> Result<f64> {
        let reply = self.query_line(&commands::cmd_read_temperature()).await?;
        commands::parse_temperature_response(&reply)
    }

    /// Read the internal 5V supply rail in volts.
    pub async fn voltage_5v(&self) -> Result<f64> {
        let payload = self.query_frame(&commands::cmd_read_voltage_5v()).await?;
        Ok(commands::decode_voltage_5v(protocol::decode_u16_le(&payload)?))
    }

    /// Read the 32V supply rail in volts.
    pub async fn voltage_32v(&self) -> Result<f64> {
        let payload = self.query_frame(&commands::cmd_read_voltage_32v()).await?;
        Ok(commands::decode_voltage_32v(protocol::decode_u16_le(&payload)?))
    }

    /// Read the forward power in watts.
    pub async fn power_forward(&self) -> Result<u16> {
        let payload = self.query_frame(&commands::cmd_read_power_forward()).await?;
        Ok(u16::from(protocol::decode_u8(&payload)?))
    }

    /// Read the reflected power in watts.
    pub async fn power_reverse(&self) -> Result<u16> {
        let payload = self.query_frame(&commands::cmd_read_power_reverse()).await?;
        Ok(u16::from(protocol::decode_u8(&payload)?))
    }

    // -----------------------------------------------------------------
    // Enable flags
    // -----------------------------------------------------------------

    /// Read whether amplifier enabling is under external-input control.
    pub async fn external_enabled(&self) -> Result<bool> {
        let payload = self
            .query_frame(&commands::cmd_read_external_enabled())
            .await?;
        protocol::decode_bool(&payload)
    }

    /// Select whether amplifier enabling is done via the external inputs
    /// on the 8-pin connector (`true`) or via the serial interface
    /// (`false`).
    pub async fn set_external_enabled(&self, on: bool) -> Result<()> {
        self.execute(&commands::cmd_set_external_enabled(on)).await
    }

    /// Read the transistor biasing state.
    pub async fn bias_enabled(&self) -> Result<bool> {
        let payload = self.query_frame(&commands::cmd_read_bias_enabled()).await?;
        protocol::decode_bool(&payload)
    }

    /// Enable or disable transistor biasing.
    ///
    /// Biasing must be enabled, and given time to settle, before RF
    /// output is switched on. This accessor does not sequence that for
    /// you; use [`turn_on`](Kusg245::turn_on) /
    /// [`shutdown`](Kusg245::shutdown) for safe ordering.
    pub async fn set_bias_enabled(&self, on: bool) -> Result<()> {
        self.execute(&commands::cmd_set_bias_enabled(on)).await
    }

    /// Read the RF output state.
    pub async fn rf_enabled(&self) -> Result<bool> {
        let payload = self.query_frame(&commands::cmd_read_rf_enabled()).await?;
        protocol::decode_bool(&payload)
    }

    /// Enable or disable the RF output.
    ///
    /// Bias must already be enabled (see
    /// [`set_bias_enabled`](Kusg245::set_bias_enabled)); the driver does
    /// not check.
    pub async fn set_rf_enabled(&self, on: bool) -> Result<()> {
        self.execute(&commands::cmd_set_rf_enabled(on)).await
    }

    /// Read the pulse mode state.
    pub async fn pulse_mode_enabled(&self) -> Result<bool> {
        let payload = self
            .query_frame(&commands::cmd_read_pulse_mode_enabled())
            .await?;
        protocol::decode_bool(&payload)
    }

    /// Enable or disable pulse mode.
    pub async fn set_pulse_mode_enabled(&self, on: bool) -> Result<()> {
        self.execute(&commands::cmd_set_pulse_mode_enabled(on)).await
    }

    /// Read whether fine (10 kHz) frequency steps are enabled.
    pub async fn fine_steps_enabled(&self) -> Result<bool> {
        let payload = self
            .query_frame(&commands::cmd_read_fine_steps_enabled())
            .await?;
        protocol::decode_bool(&payload)
    }

    /// Enable or disable fine (10 kHz) frequency steps.
    ///
    /// Coarse and fine tuning are mutually exclusive by device design;
    /// use the frequency accessor matching the active mode.
    pub async fn set_fine_steps_enabled(&self, on: bool) -> Result<()> {
        self.execute(&commands::cmd_set_fine_steps_enabled(on)).await
    }

    // -----------------------------------------------------------------
    // Frequency
    // -----------------------------------------------------------------

    /// Read the coarse frequency in MHz.
    ///
    /// Only meaningful while fine-step mode is disabled; in fine-step
    /// mode the generator reports kHz and this accessor returns a decode
    /// error.
    pub async fn frequency_coarse(&self) -> Result<u16> {
        let reply = self.query_line(&commands::cmd_read_frequency()).await?;
        commands::parse_coarse_frequency_response(&reply)
    }

    /// Set the coarse frequency in MHz (2400-2500, truncated).
    pub async fn set_frequency_coarse(&self, mhz: u16) -> Result<()> {
        self.execute(&commands::cmd_set_frequency_coarse(mhz)).await
    }

    /// Read the fine frequency in kHz.
    ///
    /// Only meaningful while fine-step mode is enabled.
    pub async fn frequency_fine(&self) -> Result<u32> {
        let reply = self.query_line(&commands::cmd_read_frequency()).await?;
        commands::parse_fine_frequency_response(&reply)
    }

    /// Set the fine frequency in kHz (2400000-2500000, truncated, rounded
    /// to 10 kHz).
    pub async fn set_frequency_fine(&self, khz: u32) -> Result<()> {
        self.execute(&commands::cmd_set_frequency_fine(khz)).await
    }

    // -----------------------------------------------------------------
    // Power
    // -----------------------------------------------------------------

    /// Read the power set-point in watts.
    pub async fn power_setpoint(&self) -> Result<u16> {
        let reply = self.query_line(&commands::cmd_read_power_setpoint()).await?;
        commands::parse_power_response(&reply)
    }

    /// Set the output power set-point in watts.
    ///
    /// 1 W resolution; values above the configured
    /// [`power_limit`](Kusg245::power_limit) are truncated to it.
    pub async fn set_power_setpoint(&self, watts: u16) -> Result<()> {
        self.execute(&commands::cmd_set_power_setpoint(watts, self.power_limit))
            .await
    }

    // -----------------------------------------------------------------
    // Pulse timing
    // -----------------------------------------------------------------

    /// Read the pulse width in ms.
    pub async fn pulse_width(&self) -> Result<u16> {
        let reply = self.query_line(&commands::cmd_read_pulse_width()).await?;
        commands::parse_pulse_time_response(&reply)
    }

    /// Set the pulse width in ms (10-1000, truncated, rounded to 5 ms).
    pub async fn set_pulse_width(&self, ms: u16) -> Result<()> {
        self.execute(&commands::cmd_set_pulse_width(ms)).await
    }

    /// Read the pulse-mode off time in ms.
    pub async fn off_time(&self) -> Result<u16> {
        let reply = self.query_line(&commands::cmd_read_off_time()).await?;
        commands::parse_pulse_time_response(&reply)
    }

    /// Set the pulse-mode off time in ms (10-1000, truncated, rounded to
    /// 5 ms).
    pub async fn set_off_time(&self, ms: u16) -> Result<()> {
        self.execute(&commands::cmd_set_off_time(ms)).await
    }

    // -----------------------------------------------------------------
    // Phase and reflection limit
    // -----------------------------------------------------------------

    /// Read the phase shift in degrees (8-bit device resolution).
    pub async fn phase_shift(&self) -> Result<f64> {
        let payload = self.query_frame(&commands::cmd_read_phase_shift()).await?;
        Ok(commands::decode_phase_shift(protocol::decode_u8(&payload)?))
    }

    /// Set the phase shift in degrees (0-358.6, truncated).
    pub async fn set_phase_shift(&self, degrees: f64) -> Result<()> {
        self.execute(&commands::cmd_set_phase_shift(degrees)).await
    }

    /// Read the reflection limit in watts (0 = no limit).
    pub async fn reflection_limit(&self) -> Result<u16> {
        let payload = self
            .query_frame(&commands::cmd_read_reflection_limit())
            .await?;
        commands::reflection_limit_from_code(protocol::decode_u8(&payload)?)
    }

    /// Set the reflection limit in watts.
    ///
    /// Must be one of 0, 100, 150, 180, 200, 230; anything else is
    /// rejected before transmission. When the limit trips, forward power
    /// is reduced and the power control mechanism locks until
    /// [`clear_vswr_error`](Kusg245::clear_vswr_error) is called.
    pub async fn set_reflection_limit(&self, watts: u16) -> Result<()> {
        self.execute(&commands::cmd_set_reflection_limit(watts)?).await
    }

    // -----------------------------------------------------------------
    // Compound operations
    // -----------------------------------------------------------------

    /// Find and set the frequency with lowest reflection at the given
    /// power.
    ///
    /// The power is truncated to the configured limit. Fire-and-forget:
    /// the hardware sweeps and settles on its own and this call does not
    /// wait for the sweep to finish.
    pub async fn tune(&self, watts: u16) -> Result<()> {
        self.execute(&commands::cmd_tune(watts, self.power_limit)).await
    }

    /// Clear the VSWR error, unlocking power control after a
    /// reflection-limit trip.
    pub async fn clear_vswr_error(&self) -> Result<()> {
        self.execute(&commands::cmd_clear_vswr_error()).await
    }

    /// Save the current settings to the generator's EEPROM.
    ///
    /// Persists frequency mode, frequency, power set-point,
    /// external-enable mode, reflection limit, and pulse timing. No local
    /// shadow state is kept or verified.
    pub async fn store_settings(&self) -> Result<()> {
        self.execute(&commands::cmd_store_settings()).await
    }

    /// Safely turn the generator on.
    ///
    /// Activates biasing, waits for it to settle, then enables the RF
    /// output. This ordering is mandatory.
    pub async fn turn_on(&self) -> Result<()> {
        debug!("turn-on sequence: bias, settle, RF");
        self.set_bias_enabled(true).await?;
        tokio::time::sleep(BIAS_SETTLE_DELAY).await;
        self.set_rf_enabled(true).await
    }

    /// Safely shut the generator down.
    ///
    /// Disables the RF output first, then deactivates biasing -- the
    /// exact reverse of [`turn_on`](Kusg245::turn_on).
    pub async fn shutdown(&self) -> Result<()> {
        debug!("shutdown sequence: RF off, bias off");
        self.set_rf_enabled(false).await?;
        self.set_bias_enabled(false).await
    }
}

// ---------------------------------------------------------------------
// Transport read helpers
// ---------------------------------------------------------------------

/// Read exactly `n` bytes from the transport.
async fn read_exact(transport: &mut dyn Transport, n: usize, timeout: Duration) -> Result<Vec<u8>> {
    let mut collected = Vec::with_capacity(n);
    let mut buf = [0u8; 16];
    while collected.len() < n {
        let want = (n - collected.len()).min(buf.len());
        let got = transport.receive(&mut buf[..want], timeout).await?;
        if got == 0 {
            return Err(Error::ConnectionLost);
        }
        collected.extend_from_slice(&buf[..got]);
    }
    Ok(collected)
}

/// Read an ASCII token ended by the terminator, which is stripped.
async fn read_line(transport: &mut dyn Transport, timeout: Duration) -> Result<String> {
    let mut collected = Vec::new();
    let mut buf = [0u8; 16];
    loop {
        let got = transport.receive(&mut buf, timeout).await?;
        if got == 0 {
            return Err(Error::ConnectionLost);
        }
        collected.extend_from_slice(&buf[..got]);

        if let Some(pos) = collected.iter().position(|&b| b == protocol::TERMINATOR) {
            let token = std::str::from_utf8(&collected[..pos]).map_err(|_| {
                Error::Decode(format!(
                    "reply is not valid ASCII: {:02X?}",
                    &collected[..pos]
                ))
            })?;
            return Ok(token.to_string());
        }

        if collected.len() > MAX_LINE {
            return Err(Error::Protocol(format!(
                "unterminated reply exceeds {MAX_LINE} bytes"
            )));
        }
    }
}

// ---------------------------------------------------------------------
// Capability surface
// ---------------------------------------------------------------------

/// Parameters the generator exposes on the by-name surface.
const PARAMETERS: &[ParameterDescriptor] = &[
    ParameterDescriptor {
        name: "version",
        kind: ValueKind::Text,
        access: Access::ReadOnly,
        unit: None,
        summary: "Firmware version",
    },
    ParameterDescriptor {
        name: "temperature",
        kind: ValueKind::Float,
        access: Access::ReadOnly,
        unit: Some("°C"),
        summary: "Temperature near the final transistor",
    },
    ParameterDescriptor {
        name: "voltage_5v",
        kind: ValueKind::Float,
        access: Access::ReadOnly,
        unit: Some("V"),
        summary: "Internal 5V supply rail",
    },
    ParameterDescriptor {
        name: "voltage_32v",
        kind: ValueKind::Float,
        access: Access::ReadOnly,
        unit: Some("V"),
        summary: "32V supply rail",
    },
    ParameterDescriptor {
        name: "power_forward",
        kind: ValueKind::UInt,
        access: Access::ReadOnly,
        unit: Some("W"),
        summary: "Forward power",
    },
    ParameterDescriptor {
        name: "power_reverse",
        kind: ValueKind::UInt,
        access: Access::ReadOnly,
        unit: Some("W"),
        summary: "Reflected power",
    },
    ParameterDescriptor {
        name: "external_enabled",
        kind: ValueKind::Bool,
        access: Access::ReadWrite,
        unit: None,
        summary: "Amplifier enabling via external inputs",
    },
    ParameterDescriptor {
        name: "bias_enabled",
        kind: ValueKind::Bool,
        access: Access::ReadWrite,
        unit: None,
        summary: "Transistor biasing",
    },
    ParameterDescriptor {
        name: "rf_enabled",
        kind: ValueKind::Bool,
        access: Access::ReadWrite,
        unit: None,
        summary: "RF output",
    },
    ParameterDescriptor {
        name: "pulse_mode_enabled",
        kind: ValueKind::Bool,
        access: Access::ReadWrite,
        unit: None,
        summary: "Pulse mode",
    },
    ParameterDescriptor {
        name: "fine_steps_enabled",
        kind: ValueKind::Bool,
        access: Access::ReadWrite,
        unit: None,
        summary: "Fine (10 kHz) frequency steps",
    },
    ParameterDescriptor {
        name: "frequency_coarse",
        kind: ValueKind::UInt,
        access: Access::ReadWrite,
        unit: Some("MHz"),
        summary: "Coarse frequency (fine steps disabled)",
    },
    ParameterDescriptor {
        name: "frequency_fine",
        kind: ValueKind::UInt,
        access: Access::ReadWrite,
        unit: Some("kHz"),
        summary: "Fine frequency (fine steps enabled)",
    },
    ParameterDescriptor {
        name: "power_setpoint",
        kind: ValueKind::UInt,
        access: Access::ReadWrite,
        unit: Some("W"),
        summary: "Output power set-point",
    },
    ParameterDescriptor {
        name: "pulse_width",
        kind: ValueKind::UInt,
        access: Access::ReadWrite,
        unit: Some("ms"),
        summary: "Pulse width",
    },
    ParameterDescriptor {
        name: "off_time",
        kind: ValueKind::UInt,
        access: Access::ReadWrite,
        unit: Some("ms"),
        summary: "Pulse-mode off time",
    },
    ParameterDescriptor {
        name: "phase_shift",
        kind: ValueKind::Float,
        access: Access::ReadWrite,
        unit: Some("°"),
        summary: "Phase shift",
    },
    ParameterDescriptor {
        name: "reflection_limit",
        kind: ValueKind::UInt,
        access: Access::ReadWrite,
        unit: Some("W"),
        summary: "Reflection limit (discrete; 0 disables)",
    },
];

/// Actions the generator exposes on the by-name surface.
const ACTIONS: &[ActionDescriptor] = &[
    ActionDescriptor {
        name: "tune",
        arg: Some(ValueKind::UInt),
        summary: "Sweep for the frequency with lowest reflection at the given power",
    },
    ActionDescriptor {
        name: "clear_error",
        arg: None,
        summary: "Clear the VSWR error and unlock power control",
    },
    ActionDescriptor {
        name: "store_settings",
        arg: None,
        summary: "Persist the current settings to EEPROM",
    },
    ActionDescriptor {
        name: "turn_on",
        arg: None,
        summary: "Enable bias, wait for it to settle, enable RF",
    },
    ActionDescriptor {
        name: "shutdown",
        arg: None,
        summary: "Disable RF, then disable bias",
    },
];

fn expect_bool(name: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        Error::InvalidParameter(format!(
            "parameter {name} expects a bool value, got {}",
            value.kind()
        ))
    })
}

fn expect_u32(name: &str, value: &Value) -> Result<u32> {
    value.as_u32().ok_or_else(|| {
        Error::InvalidParameter(format!(
            "parameter {name} expects a uint value, got {}",
            value.kind()
        ))
    })
}

fn expect_f64(name: &str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        Error::InvalidParameter(format!(
            "parameter {name} expects a numeric value, got {}",
            value.kind()
        ))
    })
}

/// Narrow a surface value to the u16 wire width.
///
/// Oversized values saturate so that per-parameter truncation still
/// applies instead of silent wrap-around.
fn saturate_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[async_trait]
impl Instrument for Kusg245 {
    fn info(&self) -> &InstrumentInfo {
        &self.info
    }

    fn parameters(&self) -> &'static [ParameterDescriptor] {
        PARAMETERS
    }

    fn actions(&self) -> &'static [ActionDescriptor] {
        ACTIONS
    }

    async fn get(&self, name: &str) -> Result<Value> {
        match name {
            "version" => Ok(Value::Text(self.version().await?)),
            "temperature" => Ok(Value::Float(self.temperature().await?)),
            "voltage_5v" => Ok(Value::Float(self.voltage_5v().await?)),
            "voltage_32v" => Ok(Value::Float(self.voltage_32v().await?)),
            "power_forward" => Ok(Value::UInt(u32::from(self.power_forward().await?))),
            "power_reverse" => Ok(Value::UInt(u32::from(self.power_reverse().await?))),
            "external_enabled" => Ok(Value::Bool(self.external_enabled().await?)),
            "bias_enabled" => Ok(Value::Bool(self.bias_enabled().await?)),
            "rf_enabled" => Ok(Value::Bool(self.rf_enabled().await?)),
            "pulse_mode_enabled" => Ok(Value::Bool(self.pulse_mode_enabled().await?)),
            "fine_steps_enabled" => Ok(Value::Bool(self.fine_steps_enabled().await?)),
            "frequency_coarse" => Ok(Value::UInt(u32::from(self.frequency_coarse().await?))),
            "frequency_fine" => Ok(Value::UInt(self.frequency_fine().await?)),
            "power_setpoint" => Ok(Value::UInt(u32::from(self.power_setpoint().await?))),
            "pulse_width" => Ok(Value::UInt(u32::from(self.pulse_width().await?))),
            "off_time" => Ok(Value::UInt(u32::from(self.off_time().await?))),
            "phase_shift" => Ok(Value::Float(self.phase_shift().await?)),
            "reflection_limit" => Ok(Value::UInt(u32::from(self.reflection_limit().await?))),
            _ => Err(Error::Unsupported(format!("no such parameter: {name}"))),
        }
    }

    async fn set(&self, name: &str, value: Value) -> Result<()> {
        match name {
            "external_enabled" => {
                self.set_external_enabled(expect_bool(name, &value)?).await
            }
            "bias_enabled" => self.set_bias_enabled(expect_bool(name, &value)?).await,
            "rf_enabled" => self.set_rf_enabled(expect_bool(name, &value)?).await,
            "pulse_mode_enabled" => {
                self.set_pulse_mode_enabled(expect_bool(name, &value)?).await
            }
            "fine_steps_enabled" => {
                self.set_fine_steps_enabled(expect_bool(name, &value)?).await
            }
            "frequency_coarse" => {
                self.set_frequency_coarse(saturate_u16(expect_u32(name, &value)?))
                    .await
            }
            "frequency_fine" => self.set_frequency_fine(expect_u32(name, &value)?).await,
            "power_setpoint" => {
                self.set_power_setpoint(saturate_u16(expect_u32(name, &value)?))
                    .await
            }
            "pulse_width" => {
                self.set_pulse_width(saturate_u16(expect_u32(name, &value)?))
                    .await
            }
            "off_time" => {
                self.set_off_time(saturate_u16(expect_u32(name, &value)?))
                    .await
            }
            "phase_shift" => self.set_phase_shift(expect_f64(name, &value)?).await,
            "reflection_limit" => {
                let watts = expect_u32(name, &value)?;
                let watts = u16::try_from(watts).map_err(|_| {
                    Error::InvalidParameter(format!(
                        "reflection limit {watts} W is not one of 0, 100, 150, 180, 200, 230"
                    ))
                })?;
                self.set_reflection_limit(watts).await
            }
            "version" | "temperature" | "voltage_5v" | "voltage_32v" | "power_forward"
            | "power_reverse" => {
                Err(Error::Unsupported(format!("parameter {name} is read-only")))
            }
            _ => Err(Error::Unsupported(format!("no such parameter: {name}"))),
        }
    }

    async fn invoke(&self, action: &str, arg: Option<Value>) -> Result<()> {
        fn no_arg(action: &str, arg: &Option<Value>) -> Result<()> {
            if arg.is_some() {
                return Err(Error::InvalidParameter(format!(
                    "action {action} takes no argument"
                )));
            }
            Ok(())
        }

        match action {
            "tune" => {
                let watts = arg.as_ref().and_then(Value::as_u32).ok_or_else(|| {
                    Error::InvalidParameter(
                        "tune requires a power argument in watts".into(),
                    )
                })?;
                self.tune(saturate_u16(watts)).await
            }
            "clear_error" => {
                no_arg(action, &arg)?;
                self.clear_vswr_error().await
            }
            "store_settings" => {
                no_arg(action, &arg)?;
                self.store_settings().await
            }
            "turn_on" => {
                no_arg(action, &arg)?;
                self.turn_on().await
            }
            "shutdown" => {
                no_arg(action, &arg)?;
                self.shutdown().await
            }
            _ => Err(Error::Unsupported(format!("no such action: {action}"))),
        }
    }
}

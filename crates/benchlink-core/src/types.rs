//! Core types used throughout benchlink.
//!
//! These types form the capability surface that control-surface code (GUIs,
//! polling loops, scripting layers) consumes: identifying information about
//! a connected instrument, dynamically-typed parameter values, and the
//! descriptors a caller uses to discover which parameters and actions a
//! given instrument exposes.

use std::fmt;

/// Static identifying information about a connected instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentInfo {
    /// Manufacturer display name (e.g. "Kuhne Electronic").
    pub manufacturer: String,
    /// Model display name (e.g. "KU SG 2.45-250 A").
    pub model_name: String,
    /// Short machine-friendly model identifier.
    pub model_id: String,
}

/// A dynamically-typed parameter value.
///
/// Instruments expose heterogeneous parameters (booleans, integers with
/// units, floats, text). `Value` is the common currency the by-name
/// [`Instrument`](crate::instrument::Instrument) surface trades in; typed
/// driver accessors should be preferred when the parameter is known at
/// compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean flag (enable/disable).
    Bool(bool),
    /// An unsigned integer quantity (watts, megahertz, milliseconds).
    UInt(u32),
    /// A floating-point quantity (volts, degrees).
    Float(f64),
    /// Free-form text (firmware version strings).
    Text(String),
}

impl Value {
    /// Return the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::UInt(_) => ValueKind::UInt,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Return the boolean payload, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Return the unsigned integer payload, if this is a [`Value::UInt`].
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the value as a float.
    ///
    /// Unsigned integers are widened, so a caller displaying a numeric
    /// parameter does not need to care which numeric kind the driver chose.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::UInt(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    /// Return the text payload, if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse a string into a value of the requested kind.
    ///
    /// This is what command-line front-ends use to turn user input into a
    /// value for [`Instrument::set`](crate::instrument::Instrument::set):
    /// look up the parameter's declared kind, then parse accordingly.
    /// Booleans accept `true`/`false`, `on`/`off`, and `1`/`0`.
    pub fn parse(kind: ValueKind, input: &str) -> std::result::Result<Value, ParseValueError> {
        let err = || ParseValueError {
            kind,
            input: input.to_string(),
        };
        match kind {
            ValueKind::Bool => match input.to_ascii_lowercase().as_str() {
                "true" | "on" | "1" => Ok(Value::Bool(true)),
                "false" | "off" | "0" => Ok(Value::Bool(false)),
                _ => Err(err()),
            },
            ValueKind::UInt => input.parse::<u32>().map(Value::UInt).map_err(|_| err()),
            ValueKind::Float => input.parse::<f64>().map(Value::Float).map_err(|_| err()),
            ValueKind::Text => Ok(Value::Text(input.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

/// The kind of a [`Value`], used in parameter and action descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Boolean flag.
    Bool,
    /// Unsigned integer quantity.
    UInt,
    /// Floating-point quantity.
    Float,
    /// Free-form text.
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Bool => "bool",
            ValueKind::UInt => "uint",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
        };
        write!(f, "{s}")
    }
}

/// Error returned when a string cannot be parsed into a [`Value`] of the
/// requested kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseValueError {
    kind: ValueKind,
    input: String,
}

impl fmt::Display for ParseValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse {:?} as {}", self.input, self.kind)
    }
}

impl std::error::Error for ParseValueError {}

/// Whether a parameter can be written, or only read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Measurement-style parameter: readable only.
    ReadOnly,
    /// Control-style parameter: readable and writable.
    ReadWrite,
}

/// Describes one named parameter an instrument exposes.
///
/// Control surfaces discover parameters by iterating
/// [`Instrument::parameters`](crate::instrument::Instrument::parameters)
/// and build their polling lists and input widgets from these descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDescriptor {
    /// Name used with the by-name get/set surface.
    pub name: &'static str,
    /// Kind of value the parameter reads and writes.
    pub kind: ValueKind,
    /// Read-only measurement or read-write control.
    pub access: Access,
    /// Display unit, if the parameter has one (e.g. "W", "MHz", "ms").
    pub unit: Option<&'static str>,
    /// One-line human-readable summary.
    pub summary: &'static str,
}

/// Describes one named action an instrument exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// Name used with [`Instrument::invoke`](crate::instrument::Instrument::invoke).
    pub name: &'static str,
    /// Kind of the single argument, if the action takes one.
    pub arg: Option<ValueKind>,
    /// One-line human-readable summary.
    pub summary: &'static str,
}

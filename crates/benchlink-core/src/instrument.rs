//! The `Instrument` trait -- the capability surface consumed by control
//! surfaces.
//!
//! GUIs, polling loops, and scripting layers program against `dyn
//! Instrument` without knowing which device driver is behind it. The trait
//! deliberately exposes only three verbs -- get a value, set a value,
//! invoke an action -- plus the descriptor listings a caller needs to
//! discover, by name, which of those exist on a given device.
//!
//! The instrument never initiates communication on its own: polling
//! cadence, retry policy, and error presentation all belong to the caller.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ActionDescriptor, InstrumentInfo, ParameterDescriptor, Value};

/// Unified asynchronous interface for one connected instrument.
///
/// All methods that communicate with the device are `async` because the
/// underlying transport involves serial round-trips; each call blocks
/// until its full command/response exchange has completed. Methods that
/// return static metadata ([`info()`](Instrument::info),
/// [`parameters()`](Instrument::parameters),
/// [`actions()`](Instrument::actions)) are synchronous.
///
/// # Errors
///
/// Unknown parameter or action names are
/// [`Error::Unsupported`](crate::error::Error::Unsupported); a value whose
/// kind does not match the parameter's declared kind is
/// [`Error::InvalidParameter`](crate::error::Error::InvalidParameter).
#[async_trait]
pub trait Instrument: Send + Sync {
    /// Return static information about the connected instrument.
    fn info(&self) -> &InstrumentInfo;

    /// List the parameters this instrument exposes.
    fn parameters(&self) -> &'static [ParameterDescriptor];

    /// List the invocable actions this instrument exposes.
    fn actions(&self) -> &'static [ActionDescriptor];

    /// Look up a single parameter descriptor by name.
    fn parameter(&self, name: &str) -> Option<&'static ParameterDescriptor> {
        self.parameters().iter().find(|p| p.name == name)
    }

    /// Look up a single action descriptor by name.
    fn action(&self, name: &str) -> Option<&'static ActionDescriptor> {
        self.actions().iter().find(|a| a.name == name)
    }

    /// Read the current value of a named parameter from the device.
    async fn get(&self, name: &str) -> Result<Value>;

    /// Write a new value to a named parameter on the device.
    async fn set(&self, name: &str, value: Value) -> Result<()>;

    /// Invoke a named action, with its argument if the action takes one.
    async fn invoke(&self, action: &str, arg: Option<Value>) -> Result<()>;
}

//! Polling interface between the monitor and whatever owns the gamepads.
//!
//! The monitor never talks to a device library directly. Every query goes
//! through [`InputPlatform`], a pull-based API that mirrors what a game engine
//! exposes per frame: list the connected ids, ask for counts, test buttons,
//! read axes, and fire a vibration.
//!
//! Queries against a device that is not connected answer with neutral values
//! (empty name, zero counts, released buttons, centered axes). Only operations
//! with side effects return errors.

use std::fmt;

use crate::controller::rumble::VibrationSettings;

/// Platform-independent gamepad identifier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub usize);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Platform errors
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Failed to initialize gamepad backend: {0}")]
    InitializationError(String),

    #[error("Gamepad {0} is not connected")]
    UnknownDevice(DeviceId),

    #[error("Force feedback error: {0}")]
    ForceFeedbackError(String),
}

/// Pull-based access to connected gamepads.
pub trait InputPlatform {
    /// Drains pending backend events so the following queries see fresh state.
    fn poll(&mut self) -> Result<(), PlatformError>;

    /// Appends the ids of all connected gamepads, in detection order.
    fn append_gamepad_ids(&self, ids: &mut Vec<DeviceId>);

    fn gamepad_name(&self, id: DeviceId) -> String;

    fn button_count(&self, id: DeviceId) -> usize;

    fn is_button_pressed(&self, id: DeviceId, button: usize) -> bool;

    fn axis_count(&self, id: DeviceId) -> usize;

    /// Current value of an axis, nominally in `[-1, 1]`.
    fn axis_value(&self, id: DeviceId, axis: usize) -> f64;

    /// Starts a vibration on the given device using the given settings.
    ///
    /// Devices without force feedback are not an error; implementations log
    /// and return `Ok`.
    fn vibrate(&mut self, id: DeviceId, settings: &VibrationSettings) -> Result<(), PlatformError>;
}

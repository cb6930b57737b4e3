use tracing::{debug, info};

use crate::controller::platform::{DeviceId, InputPlatform};

/// State of the monitored gamepad as of the last sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSnapshot {
    pub id: DeviceId,
    pub name: String,
    pub button_count: usize,
    /// Indices of pressed buttons, ascending
    pub pressed_buttons: Vec<usize>,
    pub axis_values: Vec<f64>,
}

/// Samples the first connected gamepad once per tick.
///
/// Buffers are kept between samples so a steady device layout causes no
/// allocations after the first tick.
#[derive(Debug, Default)]
pub struct InputSampler {
    gamepad_ids: Vec<DeviceId>,
    snapshot: DeviceSnapshot,
    monitored: Option<DeviceId>,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, platform: &dyn InputPlatform) {
        self.gamepad_ids.clear();
        platform.append_gamepad_ids(&mut self.gamepad_ids);

        let first = self.gamepad_ids.first().copied();
        if first != self.monitored {
            match first {
                Some(id) => info!(
                    "Monitoring gamepad {} ({} connected)",
                    id,
                    self.gamepad_ids.len()
                ),
                None => info!("No gamepads connected"),
            }
            self.monitored = first;
        }

        let Some(id) = first else {
            return;
        };

        let snapshot = &mut self.snapshot;
        snapshot.id = id;
        snapshot.name = platform.gamepad_name(id);
        snapshot.button_count = platform.button_count(id);

        snapshot.pressed_buttons.clear();
        snapshot.pressed_buttons.extend(
            (0..snapshot.button_count).filter(|&button| platform.is_button_pressed(id, button)),
        );

        let axis_count = platform.axis_count(id);
        if axis_count != snapshot.axis_values.len() {
            debug!("Gamepad {} reports {} axes", id, axis_count);
        }
        snapshot.axis_values.resize(axis_count, 0.0);
        for (axis, value) in snapshot.axis_values.iter_mut().enumerate() {
            *value = platform.axis_value(id, axis);
        }
    }

    /// Ids of every connected gamepad, in detection order.
    pub fn gamepad_ids(&self) -> &[DeviceId] {
        &self.gamepad_ids
    }

    /// Snapshot of the first connected gamepad, if any is connected.
    pub fn device(&self) -> Option<&DeviceSnapshot> {
        self.gamepad_ids.first().map(|_| &self.snapshot)
    }
}

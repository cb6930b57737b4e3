use gilrs::ff::{BaseEffect, BaseEffectType, Effect, EffectBuilder, Repeat, Replay, Ticks};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, error, info, warn};

use crate::controller::platform::{DeviceId, InputPlatform, PlatformError};
use crate::controller::rumble::VibrationSettings;

// Buttons in the order they are exposed as indices, filtered per device to the
// ones its mapping provides
const BUTTON_ORDER: [Button; 19] = [
    Button::South,
    Button::East,
    Button::North,
    Button::West,
    Button::C,
    Button::Z,
    Button::LeftTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

// Sticks first, then triggers, so the usual layout lines up with the axis hints
const AXIS_ORDER: [Axis; 8] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::LeftZ,
    Axis::RightZ,
    Axis::DPadX,
    Axis::DPadY,
];

// Backend lifecycle states
#[state]
#[derive(Debug, Clone)]
pub enum BackendState {
    Initializing,
    Polling,
}

#[machine]
pub struct GilrsPlatform<S: BackendState> {
    // Gilrs context
    gilrs: Gilrs,

    // Last started effect; dropping it stops the vibration
    active_effect: Option<Effect>,
}

// Implementation for Initializing state
impl GilrsPlatform<Initializing> {
    pub fn create() -> Result<Self, PlatformError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(gilrs::Error::NotImplemented(dummy)) => {
                warn!("Gamepads are not supported on this platform, no devices will be detected");
                dummy
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(PlatformError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, None))
    }

    // Log what is connected at startup and start polling
    pub fn initialize(self) -> GilrsPlatform<Polling> {
        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = self.gilrs.gamepads().collect();

        if gamepads.is_empty() {
            warn!("No gamepad connected, waiting for one");
        } else {
            info!("Found {} gamepads:", gamepads.len());
            for (idx, (id, gamepad)) in gamepads.iter().enumerate() {
                info!(
                    "  [{}] ID: {}, Name: {}, force feedback: {}",
                    idx,
                    id,
                    gamepad.name(),
                    gamepad.is_ff_supported()
                );
            }
        }

        info!("Gamepad backend initialized, transitioning to Polling state");
        self.transition()
    }
}

// Implementation for Polling state
impl GilrsPlatform<Polling> {
    fn gamepad(&self, device: DeviceId) -> Option<(GamepadId, Gamepad<'_>)> {
        self.gilrs
            .gamepads()
            .find(|(id, _)| usize::from(*id) == device.0)
    }
}

impl InputPlatform for GilrsPlatform<Polling> {
    fn poll(&mut self) -> Result<(), PlatformError> {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    let gamepad = self.gilrs.gamepad(id);
                    info!("Controller connected: {} ({})", gamepad.name(), id);
                }
                EventType::Disconnected => {
                    warn!("Controller disconnected: {}", id);
                }
                EventType::ForceFeedbackEffectCompleted => {
                    debug!("Force feedback effect completed on {}", id);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn append_gamepad_ids(&self, ids: &mut Vec<DeviceId>) {
        ids.extend(self.gilrs.gamepads().map(|(id, _)| DeviceId(usize::from(id))));
    }

    fn gamepad_name(&self, id: DeviceId) -> String {
        self.gamepad(id)
            .map(|(_, gamepad)| gamepad.name().to_string())
            .unwrap_or_default()
    }

    fn button_count(&self, id: DeviceId) -> usize {
        self.gamepad(id).map_or(0, |(_, gamepad)| {
            BUTTON_ORDER
                .iter()
                .filter(|button| gamepad.button_code(**button).is_some())
                .count()
        })
    }

    fn is_button_pressed(&self, id: DeviceId, button: usize) -> bool {
        self.gamepad(id).is_some_and(|(_, gamepad)| {
            BUTTON_ORDER
                .iter()
                .filter(|b| gamepad.button_code(**b).is_some())
                .nth(button)
                .is_some_and(|b| gamepad.is_pressed(*b))
        })
    }

    fn axis_count(&self, id: DeviceId) -> usize {
        self.gamepad(id).map_or(0, |(_, gamepad)| {
            AXIS_ORDER
                .iter()
                .filter(|axis| gamepad.axis_code(**axis).is_some())
                .count()
        })
    }

    fn axis_value(&self, id: DeviceId, axis: usize) -> f64 {
        self.gamepad(id).map_or(0.0, |(_, gamepad)| {
            AXIS_ORDER
                .iter()
                .filter(|a| gamepad.axis_code(**a).is_some())
                .nth(axis)
                .map_or(0.0, |a| f64::from(gamepad.value(*a)))
        })
    }

    fn vibrate(&mut self, device: DeviceId, settings: &VibrationSettings) -> Result<(), PlatformError> {
        let (id, ff_supported) = self
            .gamepad(device)
            .map(|(id, gamepad)| (id, gamepad.is_ff_supported()))
            .ok_or(PlatformError::UnknownDevice(device))?;

        if !ff_supported {
            warn!("Gamepad {} does not support force feedback", id);
            return Ok(());
        }

        let play_for = Ticks::from_ms(settings.duration_ms());
        let scheduling = Replay {
            play_for,
            ..Default::default()
        };
        let effect = EffectBuilder::new()
            .add_effect(BaseEffect {
                kind: BaseEffectType::Strong {
                    magnitude: settings.strong_magnitude(),
                },
                scheduling,
                envelope: Default::default(),
            })
            .add_effect(BaseEffect {
                kind: BaseEffectType::Weak {
                    magnitude: settings.weak_magnitude(),
                },
                scheduling,
                envelope: Default::default(),
            })
            .repeat(Repeat::For(play_for))
            .gamepads(&[id])
            .finish(&mut self.gilrs)
            .map_err(|e| PlatformError::ForceFeedbackError(e.to_string()))?;

        effect
            .play()
            .map_err(|e| PlatformError::ForceFeedbackError(e.to_string()))?;
        debug!("Started effect on {} for {:?}", id, settings.duration());

        self.active_effect = Some(effect);
        Ok(())
    }
}

use eframe::egui::{InputState, Key};

use crate::controller::rumble::RumbleKeys;

/// Held state of every key the program reacts to, captured once per frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardSnapshot {
    pub escape: bool,
    pub fullscreen: bool,
    pub rumble: RumbleKeys,
}

impl KeyboardSnapshot {
    pub fn capture(input: &InputState) -> Self {
        Self {
            escape: input.key_down(Key::Escape),
            fullscreen: input.key_down(Key::F),
            rumble: RumbleKeys {
                duration: input.key_down(Key::D),
                low_frequency: input.key_down(Key::L),
                high_frequency: input.key_down(Key::H),
                left: input.key_down(Key::ArrowLeft),
                right: input.key_down(Key::ArrowRight),
                trigger: input.key_down(Key::V),
            },
        }
    }
}

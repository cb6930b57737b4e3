use eframe::egui::Vec2;
use tracing::{debug, info, warn};

use super::common::TextCanvas;
use super::keys::KeyboardSnapshot;
use super::monitor::{draw_monitor, MonitorView, RumbleStatus};
use crate::config::QuicktestConfig;
use crate::controller::platform::{InputPlatform, PlatformError};
use crate::controller::rumble::{VibrationController, VibrationSettings};
use crate::controller::sampler::InputSampler;
use crate::error::QuicktestError;

/// Requests an update tick hands back to the window layer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub toggle_fullscreen: bool,
}

/// All state of the running monitor. Lives as long as the window.
#[derive(Debug)]
pub struct ViewState {
    sampler: InputSampler,
    // None when the rumble test is disabled
    rumble: Option<VibrationController>,
    tick: u64,

    last_display_scale: f32,
    last_canvas_size: Vec2,
    fullscreen_key_pressed: bool,
}

impl ViewState {
    pub fn new(config: &QuicktestConfig) -> Self {
        let rumble = config.rumble.enabled.then(|| {
            let settings = config.rumble.initial_settings().unwrap_or_else(|e| {
                warn!("{}, using defaults", e);
                VibrationSettings::default()
            });
            VibrationController::new(
                settings,
                config.timing.ticks_per_second,
                config.rumble.repeat_interval_ticks,
            )
        });

        Self {
            sampler: InputSampler::new(),
            rumble,
            tick: 0,
            last_display_scale: 0.0,
            last_canvas_size: Vec2::ZERO,
            fullscreen_key_pressed: false,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// One update tick: exit check, fullscreen edge, sample, rumble.
    pub fn update(
        &mut self,
        platform: &mut dyn InputPlatform,
        keys: &KeyboardSnapshot,
    ) -> Result<StepOutcome, QuicktestError> {
        if keys.escape {
            return Err(QuicktestError::ExitRequested);
        }

        let mut outcome = StepOutcome::default();
        if keys.fullscreen != self.fullscreen_key_pressed {
            outcome.toggle_fullscreen = keys.fullscreen;
            self.fullscreen_key_pressed = keys.fullscreen;
        }

        platform.poll()?;
        self.sampler.sample(platform);

        if let Some(rumble) = self.rumble.as_mut() {
            rumble.adjust(&keys.rumble);

            if let Some(device) = self.sampler.device() {
                if let Some(settings) = rumble.try_trigger(self.tick, keys.rumble.trigger) {
                    match platform.vibrate(device.id, &settings) {
                        Ok(()) => {}
                        Err(PlatformError::ForceFeedbackError(e)) => {
                            warn!("Vibration on gamepad {} failed: {}", device.id, e)
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }

        self.tick += 1;
        Ok(outcome)
    }

    /// Records the current display scale and canvas size. Returns whether
    /// either changed since the last frame.
    pub fn observe_layout(&mut self, display_scale: f32, canvas_size: Vec2) -> bool {
        let mut changed = false;
        if display_scale != self.last_display_scale {
            info!("Display scale is now {}", display_scale);
            self.last_display_scale = display_scale;
            changed = true;
        }
        let canvas_size = (canvas_size * display_scale).ceil();
        if canvas_size != self.last_canvas_size {
            debug!("Canvas resized to {}x{}", canvas_size.x, canvas_size.y);
            self.last_canvas_size = canvas_size;
            changed = true;
        }
        changed
    }

    pub fn monitor_view(&self) -> MonitorView<'_> {
        MonitorView {
            gamepad_count: self.sampler.gamepad_ids().len(),
            device: self.sampler.device(),
            rumble: self.rumble.as_ref().map(|rumble| RumbleStatus {
                settings: *rumble.settings(),
                rumbling: rumble.is_rumbling(self.tick),
            }),
        }
    }

    pub fn render(&self, canvas: &mut dyn TextCanvas) {
        draw_monitor(canvas, &self.monitor_view());
    }
}

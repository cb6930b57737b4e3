//! # Gamepad Quicktest User Interface Module
//!
//! Hosts the monitor window: an [`eframe::App`] that polls the first gamepad
//! and draws its state as text every frame.
//!
//! ## Frame Processing
//!
//! Each egui frame:
//!
//! 1. Captures the held keys and the display scale from egui's input state
//! 2. Asks the [`clock::FrameClock`] how many fixed-rate ticks are due
//! 3. Runs [`view::ViewState::update`] once per due tick (sample, rumble)
//! 4. Applies window requests from the ticks (fullscreen, close)
//! 5. Draws the monitor through a [`common::PainterCanvas`]
//!
//! Ticks, not frames, drive the key-repeat and vibration lockout timings, so
//! mouse movement or resizing does not change how fast values step.
//!
//! ## Exit Handling
//!
//! Escape surfaces as [`crate::error::QuicktestError::ExitRequested`] and closes the
//! viewport; `eframe::run_native` then returns normally. Any other error from
//! the platform is logged and terminates the process with a non-zero status.
//!
//! ## Key Bindings
//!
//! | Key | Action |
//! |-----|--------|
//! | `Esc` | Close the program |
//! | `F` | Toggle fullscreen |
//! | `D`/`L`/`H` + `←`/`→` | Adjust rumble duration / low / high frequency |
//! | `V` | Vibrate the first gamepad |

pub mod clock;
pub mod common;
pub mod keys;
pub mod monitor;
pub mod view;

use eframe::egui::{self, Frame, ViewportCommand};
use tracing::{debug, error, info};

use crate::config::QuicktestConfig;
use crate::controller::platform::InputPlatform;

use self::clock::FrameClock;
use self::common::{PainterCanvas, UiColors};
use self::keys::KeyboardSnapshot;
use self::view::ViewState;

/// Monitor window state and the platform it polls.
pub struct QuicktestUI {
    /// Gamepad backend, polled once per tick
    platform: Box<dyn InputPlatform>,

    view: ViewState,

    clock: FrameClock,

    font_size: f32,
}

impl QuicktestUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        platform: Box<dyn InputPlatform>,
        config: &QuicktestConfig,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        QuicktestUI {
            platform,
            view: ViewState::new(config),
            clock: FrameClock::new(
                config.timing.ticks_per_second,
                config.timing.max_catch_up_ticks,
            ),
            font_size: config.window.font_size,
        }
    }

    /// Runs the ticks that are due for this frame.
    fn run_ticks(&mut self, ctx: &egui::Context, time: f64, keys: &KeyboardSnapshot) {
        let due = self.clock.due_ticks(time);
        for _ in 0..due {
            match self.view.update(self.platform.as_mut(), keys) {
                Ok(outcome) => {
                    if outcome.toggle_fullscreen {
                        let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
                        debug!("Toggling fullscreen: {}", !fullscreen);
                        ctx.send_viewport_cmd(ViewportCommand::Fullscreen(!fullscreen));
                    }
                }
                Err(e) if e.is_exit_request() => {
                    info!("Exit requested after {} ticks, closing window", self.view.tick());
                    ctx.send_viewport_cmd(ViewportCommand::Close);
                    return;
                }
                Err(e) => {
                    error!("Fatal error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

impl eframe::App for QuicktestUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (time, keys, scale, screen) = ctx.input(|i| {
            (
                i.time,
                KeyboardSnapshot::capture(i),
                i.pixels_per_point,
                i.screen_rect.size(),
            )
        });

        self.view.observe_layout(scale, screen);
        self.run_ticks(ctx, time, &keys);

        egui::CentralPanel::default()
            .frame(Frame::new().fill(UiColors::BACKGROUND))
            .show(ctx, |ui| {
                let mut canvas = PainterCanvas::new(ui, self.font_size);
                self.view.render(&mut canvas);
            });

        ctx.request_repaint_after(self.clock.tick_interval());
    }
}

//! # Shared drawing pieces
//!
//! Colors and the text-drawing surface used by the monitor.
//!
//! The monitor lays out text against the [`TextCanvas`] trait instead of an
//! `egui::Painter` directly. [`PainterCanvas`] is the real implementation; the
//! tests use a recording canvas with fixed glyph metrics.

use eframe::egui::{self, vec2, Align2, Color32, FontId, Painter, Pos2};

/// Color palette of the monitor.
pub struct UiColors;

impl UiColors {
    /// Window background (RGB: 0, 24, 28)
    pub const BACKGROUND: Color32 = Color32::from_rgb(0, 24, 28);

    /// Primary text (RGB: 239, 241, 197)
    pub const MAIN: Color32 = Color32::from_rgb(239, 241, 197);

    /// Focus text: device name, values, status (RGB: 234, 82, 111)
    pub const FOCUS: Color32 = Color32::from_rgb(234, 82, 111);

    /// Alpha of the dimmed axis hints
    pub const HINT_ALPHA: u8 = 144;

    pub fn hint() -> Color32 {
        re_alpha(Self::MAIN, Self::HINT_ALPHA)
    }
}

/// Rescales a color to the given alpha, keeping it premultiplied.
pub fn re_alpha(color: Color32, alpha: u8) -> Color32 {
    let factor = f32::from(alpha) / f32::from(color.a());
    let scale = |channel: u8| (factor * f32::from(channel)) as u8;
    Color32::from_rgba_premultiplied(scale(color.r()), scale(color.g()), scale(color.b()), alpha)
}

/// Surface the monitor writes text onto.
///
/// Coordinates are relative to the top-left of the drawing area and `y` is the
/// text baseline.
pub trait TextCanvas {
    /// Distance between two consecutive baselines.
    fn line_height(&self) -> f32;

    /// Advance width of `text` on a single line.
    fn measure(&self, text: &str) -> f32;

    fn draw(&mut self, text: &str, x: f32, y: f32, color: Color32);
}

/// [`TextCanvas`] backed by an egui painter with a monospace font.
pub struct PainterCanvas<'a> {
    painter: &'a Painter,
    origin: Pos2,
    font: FontId,
    line_height: f32,
}

impl<'a> PainterCanvas<'a> {
    pub fn new(ui: &'a egui::Ui, font_size: f32) -> Self {
        let font = FontId::monospace(font_size);
        let line_height = ui.fonts(|fonts| fonts.row_height(&font));
        Self {
            painter: ui.painter(),
            origin: ui.max_rect().min,
            font,
            line_height,
        }
    }
}

impl TextCanvas for PainterCanvas<'_> {
    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn measure(&self, text: &str) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), self.font.clone(), Color32::WHITE)
            .size()
            .x
    }

    fn draw(&mut self, text: &str, x: f32, y: f32, color: Color32) {
        // egui has no baseline anchor; the bottom of the row is close enough
        let pos = self.origin + vec2(x, y);
        self.painter
            .text(pos, Align2::LEFT_BOTTOM, text, self.font.clone(), color);
    }
}

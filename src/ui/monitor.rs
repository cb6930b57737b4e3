//! Text layout of the monitor screen.
//!
//! Draws the current sample top to bottom in fixed blocks. All distances are
//! multiples of the canvas line height, so the layout follows the display
//! scale without any extra bookkeeping.

use eframe::egui::Color32;

use super::common::{TextCanvas, UiColors};
use crate::controller::rumble::VibrationSettings;
use crate::controller::sampler::DeviceSnapshot;

/// Best-effort names for the first six axes. Real devices may differ.
pub const AXIS_HINTS: [&str; 6] = [
    "left joystick horz",
    "left joystick vert",
    "right joystick horz",
    "right joystick vert",
    "left trigger",
    "right trigger",
];

pub const NO_GAMEPADS_LINES: [&str; 2] = ["No gamepads detected", "Did you plug it in already?"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RumbleStatus {
    pub settings: VibrationSettings,
    pub rumbling: bool,
}

/// Everything the monitor shows in one frame.
#[derive(Debug, Clone, Copy)]
pub struct MonitorView<'a> {
    pub gamepad_count: usize,
    pub device: Option<&'a DeviceSnapshot>,
    /// `None` hides the rumble test section
    pub rumble: Option<RumbleStatus>,
}

/// Formats an axis value with two decimals and a sign column.
///
/// Negative zero is shown as zero, and non-negative values get a leading
/// space so that the digits line up with negative ones.
pub fn format_axis_value(value: f64) -> String {
    let mut text = format!("{:.2}", value);
    if text == "-0.00" {
        text = "0.00".to_string();
    }
    if !text.starts_with('-') {
        text.insert(0, ' ');
    }
    text
}

/// Formats pressed button indices as `"#2, #5, #7"`.
pub fn format_pressed_buttons(buttons: &[usize]) -> String {
    buttons
        .iter()
        .map(|button| format!("#{}", button))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Small cursor over the canvas so each block only says what it draws.
struct Cursor<'c> {
    canvas: &'c mut dyn TextCanvas,
    advance: f32,
    y: f32,
}

impl Cursor<'_> {
    fn text(&mut self, text: &str, x: f32, color: Color32) -> f32 {
        self.canvas.draw(text, x, self.y, color);
        x + self.canvas.measure(text)
    }

    fn newline(&mut self, lines: f32) {
        self.y += self.advance * lines;
    }
}

pub fn draw_monitor(canvas: &mut dyn TextCanvas, view: &MonitorView<'_>) {
    let advance = canvas.line_height();
    let base_x = advance;
    let tab_x = advance * 2.0;
    let mut cursor = Cursor {
        canvas,
        advance,
        y: advance * 1.6,
    };

    let Some(device) = view.device else {
        for line in NO_GAMEPADS_LINES {
            cursor.text(line, base_x, UiColors::MAIN);
            cursor.newline(1.0);
        }
        return;
    };

    cursor.text(
        &format!("Detected {} gamepad(s)", view.gamepad_count),
        base_x,
        UiColors::MAIN,
    );
    cursor.newline(1.0);

    let name_x = cursor.text("Monitoring ", base_x, UiColors::MAIN);
    cursor.text(&device.name, name_x, UiColors::FOCUS);
    cursor.newline(1.5);

    // Axes
    cursor.text("Axis values:", base_x, UiColors::MAIN);
    cursor.newline(1.0);
    if device.axis_values.is_empty() {
        cursor.text("(No axes detected)", tab_x, UiColors::FOCUS);
        cursor.newline(1.0);
    }
    for (axis, value) in device.axis_values.iter().enumerate() {
        let end = cursor.text(&format_axis_value(*value), tab_x, UiColors::FOCUS);
        if let Some(hint) = AXIS_HINTS.get(axis) {
            cursor.text(&format!("({})", hint), end + advance, UiColors::hint());
        }
        cursor.newline(1.0);
    }
    cursor.newline(0.5);

    // Buttons
    let last_button = device.button_count as i64 - 1;
    cursor.text(
        &format!("Pressed buttons [0..{}]:", last_button),
        base_x,
        UiColors::MAIN,
    );
    cursor.newline(1.0);
    if device.pressed_buttons.is_empty() {
        cursor.text("(no buttons pressed)", tab_x, UiColors::FOCUS);
    } else {
        cursor.text(
            &format_pressed_buttons(&device.pressed_buttons),
            tab_x,
            UiColors::FOCUS,
        );
    }
    cursor.newline(1.0);

    if let Some(rumble) = view.rumble {
        cursor.newline(0.5);
        draw_rumble_section(&mut cursor, &rumble, base_x, tab_x);
    }
}

fn draw_rumble_section(cursor: &mut Cursor<'_>, rumble: &RumbleStatus, base_x: f32, tab_x: f32) {
    let settings = &rumble.settings;
    let gap = cursor.advance;
    cursor.text("Rumble test:", base_x, UiColors::MAIN);
    cursor.newline(1.0);

    let rows = [
        ("duration:  ", settings.duration_label(), "[D + ←/→]"),
        ("low freq:  ", format!("{}%", settings.low_frequency()), "[L + ←/→]"),
        ("high freq: ", format!("{}%", settings.high_frequency()), "[H + ←/→]"),
    ];
    for (label, value, binding) in rows {
        let value_x = cursor.text(label, tab_x, UiColors::MAIN);
        let end = cursor.text(&value, value_x, UiColors::FOCUS);
        cursor.text(binding, end + gap, UiColors::hint());
        cursor.newline(1.0);
    }

    let status = if rumble.rumbling { "rumbling..." } else { "idle" };
    let status_x = cursor.text("[V] vibrate: ", tab_x, UiColors::MAIN);
    cursor.text(status, status_x, UiColors::FOCUS);
    cursor.newline(1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::platform::DeviceId;
    use crate::ui::common::testing::{RecordingCanvas, GLYPH_WIDTH, LINE_HEIGHT};
    use proptest::prelude::*;

    fn snapshot(buttons: usize, pressed: &[usize], axes: &[f64]) -> DeviceSnapshot {
        DeviceSnapshot {
            id: DeviceId(0),
            name: "Test Pad".to_string(),
            button_count: buttons,
            pressed_buttons: pressed.to_vec(),
            axis_values: axes.to_vec(),
        }
    }

    fn render(view: &MonitorView<'_>) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::default();
        draw_monitor(&mut canvas, view);
        canvas
    }

    #[test]
    fn test_axis_format_examples() {
        assert_eq!(format_axis_value(0.0), " 0.00");
        assert_eq!(format_axis_value(-0.003), " 0.00");
        assert_eq!(format_axis_value(-0.0), " 0.00");
        assert_eq!(format_axis_value(1.0), " 1.00");
        assert_eq!(format_axis_value(-1.0), "-1.00");
        assert_eq!(format_axis_value(0.456), " 0.46");
        assert_eq!(format_axis_value(-0.25), "-0.25");
    }

    #[test]
    fn test_pressed_buttons_format() {
        assert_eq!(format_pressed_buttons(&[2, 5, 7]), "#2, #5, #7");
        assert_eq!(format_pressed_buttons(&[0]), "#0");
        assert_eq!(format_pressed_buttons(&[]), "");
    }

    #[test]
    fn test_no_device_shows_placeholder_only() {
        let canvas = render(&MonitorView {
            gamepad_count: 0,
            device: None,
            rumble: Some(RumbleStatus {
                settings: VibrationSettings::default(),
                rumbling: false,
            }),
        });

        assert_eq!(canvas.texts(), NO_GAMEPADS_LINES.to_vec());
        assert_eq!(canvas.drawn[0].y, LINE_HEIGHT * 1.6);
        assert_eq!(canvas.drawn[1].y, LINE_HEIGHT * 1.6 + LINE_HEIGHT);
        assert!(canvas.drawn.iter().all(|d| d.x == LINE_HEIGHT));
    }

    #[test]
    fn test_device_layout() {
        let device = snapshot(10, &[2, 5, 7], &[0.0, -0.003]);
        let canvas = render(&MonitorView {
            gamepad_count: 2,
            device: Some(&device),
            rumble: None,
        });

        assert_eq!(
            canvas.texts(),
            vec![
                "Detected 2 gamepad(s)",
                "Monitoring ",
                "Test Pad",
                "Axis values:",
                " 0.00",
                "(left joystick horz)",
                " 0.00",
                "(left joystick vert)",
                "Pressed buttons [0..9]:",
                "#2, #5, #7",
            ]
        );

        let name = canvas.find("Test Pad").unwrap();
        assert_eq!(name.color, UiColors::FOCUS);
        assert_eq!(name.x, LINE_HEIGHT + 11.0 * GLYPH_WIDTH);

        let hint = canvas.find("(left joystick horz)").unwrap();
        assert_eq!(hint.x, LINE_HEIGHT * 2.0 + 5.0 * GLYPH_WIDTH + LINE_HEIGHT);
        assert_eq!(hint.color, UiColors::hint());

        // 1.6 + 1 + 1.5 + 1 + 2 axes + 0.5 lines of 20
        let header = canvas.find("Pressed buttons [0..9]:").unwrap();
        assert_eq!(header.y, 152.0);
    }

    #[test]
    fn test_hints_stop_after_six_axes() {
        let device = snapshot(4, &[], &[0.1; 8]);
        let canvas = render(&MonitorView {
            gamepad_count: 1,
            device: Some(&device),
            rumble: None,
        });

        let hints = canvas
            .drawn
            .iter()
            .filter(|d| d.text.starts_with('('))
            .filter(|d| d.text != "(no buttons pressed)")
            .count();
        assert_eq!(hints, 6);
        assert_eq!(canvas.drawn.iter().filter(|d| d.text == " 0.10").count(), 8);
        assert!(canvas.find("(no buttons pressed)").is_some());
    }

    #[test]
    fn test_no_axes_placeholder() {
        let device = snapshot(0, &[], &[]);
        let canvas = render(&MonitorView {
            gamepad_count: 1,
            device: Some(&device),
            rumble: None,
        });
        assert!(canvas.find("(No axes detected)").is_some());
        assert!(canvas.find("Pressed buttons [0..-1]:").is_some());
    }

    #[test]
    fn test_rumble_section() {
        let device = snapshot(4, &[], &[]);
        let settings = VibrationSettings::new(1_500, 25, 100).unwrap();
        let idle = render(&MonitorView {
            gamepad_count: 1,
            device: Some(&device),
            rumble: Some(RumbleStatus {
                settings,
                rumbling: false,
            }),
        });

        for text in [
            "Rumble test:",
            "1.5s",
            "25%",
            "100%",
            "[D + ←/→]",
            "[L + ←/→]",
            "[H + ←/→]",
            "idle",
        ] {
            assert!(idle.find(text).is_some(), "missing {:?}", text);
        }
        assert!(idle.drawn.iter().all(|d| !d.text.contains("left/right")));
        assert_eq!(idle.find("25%").unwrap().color, UiColors::FOCUS);

        let busy = render(&MonitorView {
            gamepad_count: 1,
            device: Some(&device),
            rumble: Some(RumbleStatus {
                settings,
                rumbling: true,
            }),
        });
        assert!(busy.find("rumbling...").is_some());
        assert!(busy.find("idle").is_none());
    }

    proptest! {
        #[test]
        fn prop_axis_format_shape(value in -1.0e6f64..1.0e6) {
            let text = format_axis_value(value);
            let (_, decimals) = text.rsplit_once('.').unwrap();
            prop_assert_eq!(decimals.len(), 2);
            prop_assert!(text != "-0.00");
            if value >= 0.0 {
                prop_assert!(text.starts_with(' '));
            }
            if value <= -0.01 {
                prop_assert!(text.starts_with('-'));
            }
        }
    }
}

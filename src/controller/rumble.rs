//! Rumble test controller.
//!
//! Turns held keys into three tunable vibration parameters and decides when a
//! vibration may be fired. Everything here is counted in update ticks, so the
//! behavior is independent of how often the window actually repaints.
//!
//! Key model:
//!
//! ```text
//! D + Left/Right   duration        100ms steps, 0..=8s
//! L + Left/Right   low frequency   5% steps, 0..=100%
//! H + Left/Right   high frequency  5% steps, 0..=100%
//! V                vibrate with the current settings
//! ```

use std::time::Duration;
use tracing::{debug, info};

pub const DURATION_STEP_MS: u32 = 100;
pub const MAX_DURATION_MS: u32 = 8_000;
pub const MAGNITUDE_STEP: u8 = 5;
pub const MAX_MAGNITUDE: u8 = 100;

/// Ticks between repeated adjustments while a direction key stays held.
pub const DEFAULT_REPEAT_INTERVAL_TICKS: u64 = 8;

/// Parameters of a single vibration command.
///
/// Magnitudes are percentages; the low-frequency one drives the strong
/// (large) motor and the high-frequency one the weak (small) motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VibrationSettings {
    duration_ms: u32,
    low_frequency: u8,
    high_frequency: u8,
}

impl Default for VibrationSettings {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            low_frequency: 50,
            high_frequency: 50,
        }
    }
}

impl VibrationSettings {
    /// Returns `None` unless every value is in range and on its step grid.
    pub fn new(duration_ms: u32, low_frequency: u8, high_frequency: u8) -> Option<Self> {
        let duration_ok = duration_ms <= MAX_DURATION_MS && duration_ms % DURATION_STEP_MS == 0;
        let magnitude_ok =
            |m: u8| m <= MAX_MAGNITUDE && m % MAGNITUDE_STEP == 0;

        (duration_ok && magnitude_ok(low_frequency) && magnitude_ok(high_frequency)).then_some(
            Self {
                duration_ms,
                low_frequency,
                high_frequency,
            },
        )
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.duration_ms))
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn low_frequency(&self) -> u8 {
        self.low_frequency
    }

    pub fn high_frequency(&self) -> u8 {
        self.high_frequency
    }

    /// Low-frequency percentage scaled to a full-range motor magnitude.
    pub fn strong_magnitude(&self) -> u16 {
        percent_to_magnitude(self.low_frequency)
    }

    /// High-frequency percentage scaled to a full-range motor magnitude.
    pub fn weak_magnitude(&self) -> u16 {
        percent_to_magnitude(self.high_frequency)
    }

    /// Ticks during which no new vibration may start: `ceil(seconds * tps) + 1`.
    pub fn lockout_ticks(&self, ticks_per_second: u32) -> u64 {
        let scaled = u64::from(self.duration_ms) * u64::from(ticks_per_second);
        scaled.div_ceil(1000) + 1
    }

    /// Formats the duration as seconds with one decimal, e.g. `"0.5s"`.
    pub fn duration_label(&self) -> String {
        format!(
            "{}.{}s",
            self.duration_ms / 1000,
            (self.duration_ms % 1000) / DURATION_STEP_MS
        )
    }

    fn adjust(&mut self, parameter: RumbleParameter, direction: Direction) {
        match parameter {
            RumbleParameter::Duration => {
                self.duration_ms = match direction {
                    Direction::Decrease => self.duration_ms.saturating_sub(DURATION_STEP_MS),
                    Direction::Increase => (self.duration_ms + DURATION_STEP_MS).min(MAX_DURATION_MS),
                };
            }
            RumbleParameter::LowFrequency => {
                self.low_frequency = step_magnitude(self.low_frequency, direction);
            }
            RumbleParameter::HighFrequency => {
                self.high_frequency = step_magnitude(self.high_frequency, direction);
            }
        }
    }
}

fn percent_to_magnitude(percent: u8) -> u16 {
    (u32::from(percent) * u32::from(u16::MAX) / u32::from(MAX_MAGNITUDE)) as u16
}

fn step_magnitude(value: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Decrease => value.saturating_sub(MAGNITUDE_STEP),
        Direction::Increase => (value + MAGNITUDE_STEP).min(MAX_MAGNITUDE),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RumbleParameter {
    Duration,
    LowFrequency,
    HighFrequency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decrease,
    Increase,
}

/// Held state of the keys the rumble test listens to, sampled once per tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RumbleKeys {
    pub duration: bool,
    pub low_frequency: bool,
    pub high_frequency: bool,
    pub left: bool,
    pub right: bool,
    pub trigger: bool,
}

impl RumbleKeys {
    /// Exactly one arrow held; both at once cancel out.
    fn direction(&self) -> Option<Direction> {
        match (self.left, self.right) {
            (true, false) => Some(Direction::Decrease),
            (false, true) => Some(Direction::Increase),
            _ => None,
        }
    }

    fn chords(&self) -> impl Iterator<Item = RumbleParameter> {
        [
            (self.duration, RumbleParameter::Duration),
            (self.low_frequency, RumbleParameter::LowFrequency),
            (self.high_frequency, RumbleParameter::HighFrequency),
        ]
        .into_iter()
        .filter_map(|(held, parameter)| held.then_some(parameter))
    }

    fn any_chord(&self) -> bool {
        self.duration || self.low_frequency || self.high_frequency
    }
}

#[derive(Debug, Clone)]
pub struct VibrationController {
    settings: VibrationSettings,
    ticks_per_second: u32,
    repeat_interval: u64,

    // Direction currently held together with a chord, and for how many ticks
    held_direction: Option<Direction>,
    held_ticks: u64,

    next_allowed_trigger_tick: u64,
}

impl VibrationController {
    pub fn new(settings: VibrationSettings, ticks_per_second: u32, repeat_interval: u64) -> Self {
        Self {
            settings,
            ticks_per_second,
            repeat_interval: repeat_interval.max(1),
            held_direction: None,
            held_ticks: 0,
            next_allowed_trigger_tick: 0,
        }
    }

    pub fn settings(&self) -> &VibrationSettings {
        &self.settings
    }

    /// Applies one tick of chord + arrow input.
    ///
    /// Adjusts on the first tick of a hold and then every `repeat_interval`
    /// ticks. Returns whether anything changed.
    pub fn adjust(&mut self, keys: &RumbleKeys) -> bool {
        let direction = keys.direction().filter(|_| keys.any_chord());

        if direction != self.held_direction {
            self.held_direction = direction;
            self.held_ticks = 0;
        }
        let Some(direction) = direction else {
            return false;
        };

        self.held_ticks += 1;
        if (self.held_ticks - 1) % self.repeat_interval != 0 {
            return false;
        }

        let before = self.settings;
        for parameter in keys.chords() {
            self.settings.adjust(parameter, direction);
        }
        if before != self.settings {
            debug!(
                "Rumble settings: duration {}, low {}%, high {}%",
                self.settings.duration_label(),
                self.settings.low_frequency,
                self.settings.high_frequency
            );
        }
        before != self.settings
    }

    /// Returns the settings to vibrate with when the trigger is held and no
    /// earlier vibration is still considered in flight.
    pub fn try_trigger(&mut self, tick: u64, trigger_held: bool) -> Option<VibrationSettings> {
        if !trigger_held || self.is_rumbling(tick) {
            return None;
        }

        let lockout = self.settings.lockout_ticks(self.ticks_per_second);
        self.next_allowed_trigger_tick = tick + lockout;
        info!(
            "Rumble triggered: duration {}, low {}%, high {}% (locked for {} ticks)",
            self.settings.duration_label(),
            self.settings.low_frequency,
            self.settings.high_frequency,
            lockout
        );
        Some(self.settings)
    }

    pub fn is_rumbling(&self, tick: u64) -> bool {
        tick < self.next_allowed_trigger_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn controller() -> VibrationController {
        VibrationController::new(VibrationSettings::default(), 60, DEFAULT_REPEAT_INTERVAL_TICKS)
    }

    fn hold(duration: bool, low: bool, high: bool, left: bool, right: bool) -> RumbleKeys {
        RumbleKeys {
            duration,
            low_frequency: low,
            high_frequency: high,
            left,
            right,
            trigger: false,
        }
    }

    #[test]
    fn test_first_tick_of_hold_adjusts_once() {
        let mut rumble = controller();
        assert!(rumble.adjust(&hold(true, false, false, false, true)));
        assert_eq!(rumble.settings().duration_ms(), 600);

        // Still held: nothing until the repeat interval elapses
        for _ in 0..7 {
            assert!(!rumble.adjust(&hold(true, false, false, false, true)));
        }
        assert_eq!(rumble.settings().duration_ms(), 600);

        assert!(rumble.adjust(&hold(true, false, false, false, true)));
        assert_eq!(rumble.settings().duration_ms(), 700);
    }

    #[test]
    fn test_repeat_fires_on_ticks_one_nine_seventeen() {
        let mut rumble = controller();
        let keys = hold(false, true, false, true, false);
        let fired: Vec<u64> = (1..=20)
            .filter(|_| rumble.adjust(&keys))
            .collect();
        assert_eq!(fired, vec![1, 9, 17]);
        assert_eq!(rumble.settings().low_frequency(), 35);
    }

    #[test]
    fn test_both_directions_cancel() {
        let mut rumble = controller();
        for _ in 0..20 {
            assert!(!rumble.adjust(&hold(true, true, true, true, true)));
        }
        assert_eq!(*rumble.settings(), VibrationSettings::default());
    }

    #[test]
    fn test_direction_without_chord_is_ignored() {
        let mut rumble = controller();
        assert!(!rumble.adjust(&hold(false, false, false, false, true)));
        // Pressing the chord while the arrow is already down counts as a fresh hold
        assert!(rumble.adjust(&hold(false, false, true, false, true)));
        assert_eq!(rumble.settings().high_frequency(), 55);
    }

    #[test]
    fn test_releasing_restarts_the_hold() {
        let mut rumble = controller();
        let keys = hold(true, false, false, true, false);
        assert!(rumble.adjust(&keys));
        assert!(!rumble.adjust(&RumbleKeys::default()));
        assert!(rumble.adjust(&keys));
        assert_eq!(rumble.settings().duration_ms(), 300);
    }

    #[test]
    fn test_multiple_chords_adjust_together() {
        let mut rumble = controller();
        rumble.adjust(&hold(true, true, true, false, true));
        let settings = rumble.settings();
        assert_eq!(settings.duration_ms(), 600);
        assert_eq!(settings.low_frequency(), 55);
        assert_eq!(settings.high_frequency(), 55);
    }

    #[test]
    fn test_values_clamp_at_bounds() {
        let mut rumble = VibrationController::new(
            VibrationSettings::new(8_000, 100, 0).unwrap(),
            60,
            1,
        );
        rumble.adjust(&hold(true, true, false, false, true));
        assert_eq!(rumble.settings().duration_ms(), 8_000);
        assert_eq!(rumble.settings().low_frequency(), 100);

        rumble.adjust(&RumbleKeys::default());
        rumble.adjust(&hold(false, false, true, true, false));
        assert_eq!(rumble.settings().high_frequency(), 0);
    }

    #[test]
    fn test_trigger_lockout() {
        let mut rumble = controller();
        // 0.5s at 60 ticks per second: ceil(30) + 1
        assert_eq!(rumble.settings().lockout_ticks(60), 31);

        assert!(rumble.try_trigger(10, true).is_some());
        assert!(rumble.is_rumbling(10));
        assert!(rumble.try_trigger(40, true).is_none());
        assert!(!rumble.is_rumbling(41));
        assert!(rumble.try_trigger(41, true).is_some());
    }

    #[test]
    fn test_trigger_requires_key() {
        let mut rumble = controller();
        assert!(rumble.try_trigger(0, false).is_none());
        assert!(!rumble.is_rumbling(0));
    }

    #[test]
    fn test_lockout_rounds_up() {
        assert_eq!(VibrationSettings::new(0, 0, 0).unwrap().lockout_ticks(60), 1);
        assert_eq!(VibrationSettings::new(100, 0, 0).unwrap().lockout_ticks(60), 7);
        assert_eq!(VibrationSettings::new(8_000, 0, 0).unwrap().lockout_ticks(60), 481);
        // 0.1s at 25 tps is 2.5 ticks
        assert_eq!(VibrationSettings::new(100, 0, 0).unwrap().lockout_ticks(25), 4);
    }

    #[test]
    fn test_settings_validation() {
        assert!(VibrationSettings::new(8_100, 50, 50).is_none());
        assert!(VibrationSettings::new(550, 50, 50).is_none());
        assert!(VibrationSettings::new(500, 105, 50).is_none());
        assert!(VibrationSettings::new(500, 50, 52).is_none());
        assert!(VibrationSettings::new(0, 0, 100).is_some());
    }

    #[test]
    fn test_magnitude_scaling_and_labels() {
        let settings = VibrationSettings::new(1_200, 100, 0).unwrap();
        assert_eq!(settings.strong_magnitude(), u16::MAX);
        assert_eq!(settings.weak_magnitude(), 0);
        assert_eq!(settings.duration_label(), "1.2s");
        assert_eq!(VibrationSettings::default().duration_label(), "0.5s");
        assert_eq!(settings.duration(), Duration::from_millis(1_200));
    }

    fn arb_keys() -> impl Strategy<Value = RumbleKeys> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(duration, low_frequency, high_frequency, left, right)| RumbleKeys {
                duration,
                low_frequency,
                high_frequency,
                left,
                right,
                trigger: false,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_settings_stay_in_range(sequence in prop::collection::vec(arb_keys(), 0..400)) {
            let mut rumble = VibrationController::new(VibrationSettings::default(), 60, 1);
            for keys in &sequence {
                rumble.adjust(keys);
                let s = rumble.settings();
                prop_assert!(s.duration_ms() <= MAX_DURATION_MS);
                prop_assert_eq!(s.duration_ms() % DURATION_STEP_MS, 0);
                prop_assert!(s.low_frequency() <= MAX_MAGNITUDE);
                prop_assert_eq!(s.low_frequency() % MAGNITUDE_STEP, 0);
                prop_assert!(s.high_frequency() <= MAX_MAGNITUDE);
                prop_assert_eq!(s.high_frequency() % MAGNITUDE_STEP, 0);
            }
        }

        #[test]
        fn prop_steady_hold_fires_at_most_once_per_interval(ticks in 1usize..200) {
            let mut rumble = controller();
            let keys = hold(false, true, false, false, true);
            let fired: Vec<usize> = (0..ticks).filter(|_| rumble.adjust(&keys)).collect();
            for pair in fired.windows(2) {
                prop_assert!(pair[1] - pair[0] >= DEFAULT_REPEAT_INTERVAL_TICKS as usize);
            }
        }

        #[test]
        fn prop_trigger_locked_until_lockout_elapses(steps in 0u32..=80, start in 0u64..10_000) {
            let settings = VibrationSettings::new(steps * DURATION_STEP_MS, 50, 50).unwrap();
            let lockout = settings.lockout_ticks(60);
            let mut rumble = VibrationController::new(settings, 60, DEFAULT_REPEAT_INTERVAL_TICKS);

            prop_assert!(rumble.try_trigger(start, true).is_some());
            for tick in start + 1..start + lockout {
                prop_assert!(rumble.try_trigger(tick, true).is_none());
            }
            prop_assert!(rumble.try_trigger(start + lockout, true).is_some());
        }
    }
}

//! Controller subsystem for gamepad input handling
//!
//! 1. [`platform`] - Polling interface the rest of the program talks to
//! 2. [`gilrs_backend`] - gilrs implementation of that interface
//! 3. [`sampler`] - Per-tick snapshot of the first connected gamepad
//! 4. [`rumble`] - Key-driven vibration settings and trigger lockout
//!
//! # Architecture
//!
//! ```text
//! Gamepad ──► GilrsPlatform ──► InputSampler ──► DeviceSnapshot
//!                  ▲
//!                  └── VibrationController (V key)
//! ```
//!
//! Everything runs on the UI thread, once per update tick.

pub mod gilrs_backend;
pub mod platform;
pub mod rumble;
pub mod sampler;

//! Servo motion control
//!
//! [`MotionController`] runs the multi-mode motion state machine; `duty`
//! holds the position-to-PWM math.

pub mod controller;
pub mod duty;

pub use controller::{ConfigError, Motion, MotionController, FALLBACK_DELAY_US};
pub use duty::{duty_ticks, pulse_width_us, DUTY_MAX_TICKS, PWM_PERIOD_US};

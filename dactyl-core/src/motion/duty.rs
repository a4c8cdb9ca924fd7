//! Position-to-PWM duty math
//!
//! Hobby servos are commanded with a pulse of `pwm_min..pwm_max`
//! microseconds repeated every 20 ms. The angular position maps linearly
//! onto the pulse width, which then becomes a duty value at the PWM
//! counter resolution of 1024 steps.

/// Servo PWM frame length in microseconds (50 Hz)
pub const PWM_PERIOD_US: u32 = 20_000;

/// Highest duty value at 10-bit counter resolution
pub const DUTY_MAX_TICKS: u32 = (1 << 10) - 1;

/// Map an angle in `[0, max_angle]` to a pulse width in `[pwm_min, pwm_max]`
///
/// `max_angle` must be positive and `pos` already clamped; the controller
/// maintains both invariants.
pub fn pulse_width_us(pos: i32, max_angle: i32, pwm_min: u32, pwm_max: u32) -> u32 {
    let span = (pwm_max - pwm_min) as i64;
    let pulse = pwm_min as i64 + (pos as i64 * span) / max_angle as i64;
    pulse as u32
}

/// Convert a pulse width to a duty value over the 20 ms frame
pub fn duty_ticks(pulse_us: u32) -> u32 {
    pulse_us * DUTY_MAX_TICKS / PWM_PERIOD_US
}

//! Servo motion state machine
//!
//! The controller owns two timers: a periodic tick timer that paces
//! controlled motion, and a one-shot fallback timer armed when a Loop
//! overshoots its stop angle. Both interrupt sides only raise flags; the
//! whole state machine runs in [`MotionController::poll`] from the
//! cooperative loop.
//!
//! Motion modes:
//! - `Loop`: travel start -> stop at the configured step; on reaching the
//!   stop angle the servo parks there, ticking stops and the fallback
//!   timer later returns it to the start angle and resumes - a settle
//!   period between iterations.
//! - `Sweep`: bounce between start and stop indefinitely.
//! - `OneShot`: one start -> stop pass, then motion ends.
//!
//! Every timing- or geometry-affecting setter pauses motion around the
//! mutation and resumes it afterwards, so a running servo never ticks with
//! a half-applied configuration.

use crate::motion::duty::{duty_ticks, pulse_width_us};
use crate::traits::{PwmWriter, TickFlag, TimerError, TimerId, TimerService};

/// Settle period before a Loop iteration restarts, in microseconds
pub const FALLBACK_DELAY_US: u64 = 3_000_000;

/// Motion mode of the servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    /// start -> stop repeatedly, with a settle period between passes
    Loop,
    /// start <-> stop, reversing at either bound
    Sweep,
    /// start -> stop once
    OneShot,
    /// Parse sentinel; treated as "disable" on write
    Invalid,
}

impl Motion {
    /// Wire token for this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Motion::Loop => "LOOP",
            Motion::Sweep => "SWEEP",
            Motion::OneShot => "ONE_SHOT",
            Motion::Invalid => "INVALID",
        }
    }

    /// Parse a wire token; unknown tokens yield `Invalid`
    pub fn from_token(token: &str) -> Self {
        match token {
            "LOOP" => Motion::Loop,
            "SWEEP" => Motion::Sweep,
            "ONE_SHOT" => Motion::OneShot,
            _ => Motion::Invalid,
        }
    }
}

/// Rejected attribute values
///
/// A rejection leaves the controller untouched; it is reported to the
/// caller for logging but produces no protocol response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `pwm_min < pwm_max` would be violated
    PwmBoundsOrder,
    /// `|angle_step|` exceeds the maximum angle
    StepExceedsRange,
    /// Start/stop angle outside `[0, max_angle]`
    AngleOutOfRange,
    /// Tick interval below the minimum pulse width
    DelayBelowPwmMin,
    /// New maximum angle would break the step/start/stop invariants
    MaxAngleTooSmall,
}

/// The servo's position/mode state machine and PWM computation
pub struct MotionController {
    pin: u8,
    max_angle: i32,
    motion: Motion,
    pos: i32,
    tick_interval_us: u64,
    pwm_min_us: u32,
    pwm_max_us: u32,
    start_angle: i32,
    stop_angle: i32,
    angle_step: i32,
    tick: &'static TickFlag,
    settle: &'static TickFlag,
    tick_timer: Option<TimerId>,
    fallback_timer: Option<TimerId>,
}

impl MotionController {
    /// Create a controller for a servo on `pin` with the given range
    ///
    /// Defaults target a 270-degree servo at 500-2500 us pulse width,
    /// ticking every 100 ms with a one-degree step.
    pub fn new(pin: u8, max_angle: i32, tick: &'static TickFlag, settle: &'static TickFlag) -> Self {
        Self {
            pin,
            max_angle,
            motion: Motion::Loop,
            pos: 0,
            tick_interval_us: 100_000,
            pwm_min_us: 500,
            pwm_max_us: 2500,
            start_angle: 0,
            stop_angle: max_angle,
            angle_step: 1,
            tick,
            settle,
            tick_timer: None,
            fallback_timer: None,
        }
    }

    /// Create the tick and fallback timers
    ///
    /// Timer-pool exhaustion here is fatal for the device: the caller
    /// decides whether to retry or abandon startup.
    pub fn setup(&mut self, svc: &mut impl TimerService) -> Result<(), TimerError> {
        self.tick.clear();
        self.settle.clear();
        self.tick_timer = Some(svc.create(self.tick)?);
        self.fallback_timer = Some(svc.create(self.settle)?);
        Ok(())
    }

    /// Start periodic ticking; no-op when already running
    ///
    /// An `Invalid` mode is coerced to `Loop` so enabling always produces
    /// defined motion.
    pub fn enable_motion(&mut self, svc: &mut impl TimerService) {
        let Some(timer) = self.tick_timer else {
            return;
        };
        if svc.is_active(timer) {
            return;
        }
        if svc.start_periodic(timer, self.tick_interval_us).is_err() {
            return;
        }
        if self.motion == Motion::Invalid {
            self.motion = Motion::Loop;
        }
    }

    /// Stop periodic ticking; no-op when already stopped
    pub fn disable_motion(&mut self, svc: &mut impl TimerService) {
        let Some(timer) = self.tick_timer else {
            return;
        };
        if svc.is_active(timer) {
            svc.stop(timer);
        }
    }

    /// Whether controlled motion is currently running
    pub fn is_active(&self, svc: &impl TimerService) -> bool {
        self.tick_timer.map(|t| svc.is_active(t)).unwrap_or(false)
    }

    /// Consume pending tick/settle flags and advance the state machine
    ///
    /// Returns the position when it was (re)commanded this cycle, for the
    /// caller to broadcast.
    pub fn poll(
        &mut self,
        svc: &mut impl TimerService,
        pwm: &mut impl PwmWriter,
    ) -> Option<i32> {
        if self.settle.take() {
            if let Some(resumed) = self.resume_after_settle(svc) {
                self.update_duty(pwm);
                return Some(resumed);
            }
        }

        if !self.tick.take() {
            return None;
        }

        if self.angle_step == 0 {
            // A zero step would tick forever without moving
            self.angle_step = 1;
            self.disable_motion(svc);
            return None;
        }

        match self.motion {
            Motion::Loop => self.step_bounded(svc, true),
            Motion::Sweep => self.step_sweep(),
            Motion::OneShot => self.step_bounded(svc, false),
            Motion::Invalid => self.disable_motion(svc),
        }

        self.update_duty(pwm);
        Some(self.pos)
    }

    /// Fallback expiry: return to the start angle and resume ticking
    ///
    /// Skipped when ticking resumed by other means meanwhile, or when the
    /// mode no longer loops.
    fn resume_after_settle(&mut self, svc: &mut impl TimerService) -> Option<i32> {
        let timer = self.tick_timer?;
        if svc.is_active(timer) {
            return None;
        }
        if self.motion == Motion::Invalid || self.motion == Motion::OneShot {
            return None;
        }
        svc.start_periodic(timer, self.tick_interval_us).ok()?;
        self.pos = self.start_angle;
        Some(self.pos)
    }

    /// One Loop/OneShot tick: bounded travel from start toward stop
    fn step_bounded(&mut self, svc: &mut impl TimerService, arm_fallback: bool) {
        let dir = (self.stop_angle - self.start_angle).signum();
        if self.angle_step.signum() != dir {
            // The step fights the start/stop geometry; moving would walk
            // away from the stop angle forever.
            self.disable_motion(svc);
            return;
        }

        let new_pos = self.pos + self.angle_step;
        let crossed = if dir > 0 {
            new_pos > self.stop_angle
        } else {
            new_pos < self.stop_angle
        };

        if crossed {
            self.pos = self.stop_angle;
            self.disable_motion(svc);
            if arm_fallback {
                if let Some(fallback) = self.fallback_timer {
                    let _ = svc.start_once(fallback, FALLBACK_DELAY_US);
                }
            }
        } else {
            self.pos = new_pos;
        }
    }

    /// One Sweep tick: reflect at either bound
    fn step_sweep(&mut self) {
        let new_pos = self.pos + self.angle_step;
        if self.angle_step < 0 {
            if new_pos < self.start_angle {
                self.angle_step = -self.angle_step;
                self.pos = self.start_angle;
            } else {
                self.pos = new_pos;
            }
        } else if new_pos > self.stop_angle {
            self.angle_step = -self.angle_step;
            self.pos = self.stop_angle;
        } else {
            self.pos = new_pos;
        }
    }

    fn update_duty(&self, pwm: &mut impl PwmWriter) {
        let pulse = pulse_width_us(self.pos, self.max_angle, self.pwm_min_us, self.pwm_max_us);
        pwm.write(self.pin, duty_ticks(pulse));
    }

    /// Run `mutate` with motion paused, restoring the running state after
    fn with_motion_paused<R>(
        &mut self,
        svc: &mut impl TimerService,
        mutate: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let was_running = self.is_active(svc);
        if was_running {
            self.disable_motion(svc);
        }
        let result = mutate(self);
        if was_running {
            self.enable_motion(svc);
        }
        result
    }

    pub fn set_max_pwm(&mut self, svc: &mut impl TimerService, value: u32) -> Result<(), ConfigError> {
        if value <= self.pwm_min_us {
            return Err(ConfigError::PwmBoundsOrder);
        }
        self.with_motion_paused(svc, |c| c.pwm_max_us = value);
        Ok(())
    }

    pub fn set_min_pwm(&mut self, svc: &mut impl TimerService, value: u32) -> Result<(), ConfigError> {
        if value >= self.pwm_max_us {
            return Err(ConfigError::PwmBoundsOrder);
        }
        self.with_motion_paused(svc, |c| c.pwm_min_us = value);
        Ok(())
    }

    pub fn set_angle_step(&mut self, svc: &mut impl TimerService, step: i32) -> Result<(), ConfigError> {
        if step.unsigned_abs() > self.max_angle as u32 {
            return Err(ConfigError::StepExceedsRange);
        }
        self.with_motion_paused(svc, |c| c.angle_step = step);
        Ok(())
    }

    /// Set the position, clamping into `[0, max_angle]`
    ///
    /// The duty is recomputed immediately so the servo moves without
    /// waiting for a tick. Returns the applied (clamped) position.
    pub fn set_position(
        &mut self,
        svc: &mut impl TimerService,
        pwm: &mut impl PwmWriter,
        pos: i32,
    ) -> i32 {
        self.with_motion_paused(svc, |c| {
            c.pos = pos.clamp(0, c.max_angle);
        });
        self.update_duty(pwm);
        self.pos
    }

    /// Set the motion mode; `Invalid` disables motion instead
    pub fn set_motion(&mut self, svc: &mut impl TimerService, motion: Motion) {
        if motion == Motion::Invalid {
            self.disable_motion(svc);
            return;
        }
        self.with_motion_paused(svc, |c| c.motion = motion);
    }

    pub fn set_time_delay(&mut self, svc: &mut impl TimerService, delay_us: u64) -> Result<(), ConfigError> {
        if delay_us < self.pwm_min_us as u64 {
            return Err(ConfigError::DelayBelowPwmMin);
        }
        self.with_motion_paused(svc, |c| c.tick_interval_us = delay_us);
        Ok(())
    }

    pub fn set_start_angle(&mut self, svc: &mut impl TimerService, angle: i32) -> Result<(), ConfigError> {
        if angle < 0 || angle > self.max_angle {
            return Err(ConfigError::AngleOutOfRange);
        }
        self.with_motion_paused(svc, |c| c.start_angle = angle);
        Ok(())
    }

    pub fn set_stop_angle(&mut self, svc: &mut impl TimerService, angle: i32) -> Result<(), ConfigError> {
        if angle < 0 || angle > self.max_angle {
            return Err(ConfigError::AngleOutOfRange);
        }
        self.with_motion_paused(svc, |c| c.stop_angle = angle);
        Ok(())
    }

    pub fn set_max_angle(&mut self, svc: &mut impl TimerService, max_angle: i32) -> Result<(), ConfigError> {
        if max_angle <= 0
            || self.angle_step.unsigned_abs() > max_angle as u32
            || self.start_angle > max_angle
            || self.stop_angle > max_angle
        {
            return Err(ConfigError::MaxAngleTooSmall);
        }
        self.with_motion_paused(svc, |c| {
            c.max_angle = max_angle;
            c.pos = c.pos.min(max_angle);
        });
        Ok(())
    }

    pub fn set_pin(&mut self, svc: &mut impl TimerService, pin: u8) {
        self.with_motion_paused(svc, |c| c.pin = pin);
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn max_angle(&self) -> i32 {
        self.max_angle
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn position(&self) -> i32 {
        self.pos
    }

    pub fn time_delay(&self) -> u64 {
        self.tick_interval_us
    }

    pub fn pwm_min(&self) -> u32 {
        self.pwm_min_us
    }

    pub fn pwm_max(&self) -> u32 {
        self.pwm_max_us
    }

    pub fn start_angle(&self) -> i32 {
        self.start_angle
    }

    pub fn stop_angle(&self) -> i32 {
        self.stop_angle
    }

    pub fn angle_step(&self) -> i32 {
        self.angle_step
    }
}

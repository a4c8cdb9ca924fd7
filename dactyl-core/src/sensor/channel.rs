//! One flex sensor's sampling state and timer
//!
//! A channel samples only when it has both a created timer and a bound ADC
//! pin. The timer interrupt raises the ready flag and nothing else; the
//! cooperative loop drains the flag in [`SensorChannel::poll`] and performs
//! the ADC read there. Readings are 12-bit, left in raw counts - the
//! sensors sit behind a low-pass filter, so the default 10 Hz interval
//! comfortably oversamples finger flexion.

use crate::traits::{AnalogReader, TickFlag, TimerError, TimerId, TimerService};

/// First legal ADC-capable GPIO (RP2040 ADC0)
pub const ADC_PIN_MIN: u8 = 26;

/// Last legal ADC-capable GPIO (RP2040 ADC3)
pub const ADC_PIN_MAX: u8 = 29;

/// Finger a sensor is strapped to
///
/// Discriminants match the wire naming (`FLEX_2`..`FLEX_5`); the thumb is
/// not instrumented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Finger {
    Index = 2,
    Middle = 3,
    Ring = 4,
    Pinky = 5,
}

/// Errors from channel reconfiguration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Pin is outside the ADC-capable range
    PinOutOfRange,
    /// `setup()` has not created the sampling timer yet
    TimerNotCreated,
}

/// Sampling state for one flex sensor
pub struct SensorChannel {
    name: &'static str,
    finger: Finger,
    pin: Option<u8>,
    ready: &'static TickFlag,
    timer: Option<TimerId>,
    setup_failed: bool,
    last_reading: u16,
}

impl SensorChannel {
    /// Create a channel with no bound pin
    pub fn new(name: &'static str, finger: Finger, ready: &'static TickFlag) -> Self {
        Self {
            name,
            finger,
            pin: None,
            ready,
            timer: None,
            setup_failed: false,
            last_reading: 0,
        }
    }

    /// (Re)create the sampling timer
    ///
    /// Idempotent: an existing timer is stopped and released first. On
    /// creation failure the channel is marked failed and stays inert until
    /// `setup` is retried.
    pub fn setup(&mut self, svc: &mut impl TimerService) -> Result<(), TimerError> {
        self.setup_failed = false;
        if let Some(timer) = self.timer.take() {
            if svc.is_active(timer) {
                svc.stop(timer);
            }
            svc.delete(timer);
        }
        match svc.create(self.ready) {
            Ok(id) => {
                self.timer = Some(id);
                self.ready.clear();
                Ok(())
            }
            Err(e) => {
                self.setup_failed = true;
                Err(e)
            }
        }
    }

    /// Bind or unbind the ADC pin
    ///
    /// `None` stops sampling and disconnects the channel. Binding requires
    /// a created timer and a pin in the ADC range; if the channel was
    /// actively sampling it is stopped, rebound, re-armed and restarted at
    /// the shared interval.
    pub fn set_pin(
        &mut self,
        svc: &mut impl TimerService,
        pin: Option<u8>,
        interval_us: u64,
    ) -> Result<(), ChannelError> {
        let was_active = self.is_active(svc);

        let Some(pin) = pin else {
            self.set_active(svc, false, interval_us);
            self.pin = None;
            return Ok(());
        };

        if !(ADC_PIN_MIN..=ADC_PIN_MAX).contains(&pin) {
            return Err(ChannelError::PinOutOfRange);
        }
        let Some(timer) = self.timer else {
            return Err(ChannelError::TimerNotCreated);
        };

        if was_active {
            svc.stop(timer);
        }
        self.pin = Some(pin);
        if was_active {
            // Re-arm so the first sample on the new pin happens on the
            // next poll rather than a full interval later.
            self.ready.raise();
            let _ = svc.start_periodic(timer, interval_us);
        }
        Ok(())
    }

    /// Start or stop periodic sampling
    ///
    /// No-op when already in the requested state, and refused while the
    /// channel is marked failed (retry `setup` first).
    pub fn set_active(&mut self, svc: &mut impl TimerService, enable: bool, interval_us: u64) {
        if self.setup_failed {
            return;
        }
        let Some(timer) = self.timer else {
            return;
        };
        if svc.is_active(timer) {
            if !enable {
                svc.stop(timer);
                self.ready.clear();
            }
        } else if enable {
            self.ready.raise();
            let _ = svc.start_periodic(timer, interval_us);
        }
    }

    /// Consume a pending tick, sampling the sensor
    ///
    /// Returns the fresh reading when one was taken. Inert channels and
    /// channels without a pending tick return `None`; a pending tick on an
    /// unbound channel is consumed without a read.
    pub fn poll(&mut self, adc: &mut impl AnalogReader) -> Option<u16> {
        if self.setup_failed {
            return None;
        }
        if !self.ready.take() {
            return None;
        }
        let pin = self.pin?;
        let reading = adc.read(pin);
        self.last_reading = reading;
        Some(reading)
    }

    /// Stop and release the sampling timer
    pub fn teardown(&mut self, svc: &mut impl TimerService) {
        if let Some(timer) = self.timer.take() {
            if svc.is_active(timer) {
                svc.stop(timer);
            }
            svc.delete(timer);
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn finger(&self) -> Finger {
        self.finger
    }

    pub fn pin(&self) -> Option<u8> {
        self.pin
    }

    pub fn last_reading(&self) -> u16 {
        self.last_reading
    }

    pub fn setup_failed(&self) -> bool {
        self.setup_failed
    }

    /// Whether the channel is currently sampling
    pub fn is_active(&self, svc: &impl TimerService) -> bool {
        self.timer.map(|t| svc.is_active(t)).unwrap_or(false)
    }
}

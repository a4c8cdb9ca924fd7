//! Host test doubles for the hardware abstraction traits
//!
//! `MockTimers` simulates the timer pool: tests call
//! [`fire`](MockTimers::fire) to stand in for a hardware expiry, which
//! raises the timer's flag exactly like the interrupt path would. One-shot
//! timers disarm when fired, periodic timers stay armed.

use crate::traits::{AnalogReader, PwmWriter, TickFlag, TimerError, TimerId, TimerService};

/// Timer slots available in the mock pool
pub const MOCK_TIMER_SLOTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    Periodic(u64),
    Once(u64),
}

#[derive(Clone, Copy)]
struct Slot {
    flag: &'static TickFlag,
    mode: Mode,
    active: bool,
}

/// Mock timer service
pub struct MockTimers {
    slots: [Option<Slot>; MOCK_TIMER_SLOTS],
    capacity: usize,
}

impl MockTimers {
    /// Create a mock pool with all slots available
    pub fn new() -> Self {
        Self::with_capacity(MOCK_TIMER_SLOTS)
    }

    /// Create a mock pool with a reduced slot count (for exhaustion tests)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: [None; MOCK_TIMER_SLOTS],
            capacity: capacity.min(MOCK_TIMER_SLOTS),
        }
    }

    /// Simulate a hardware expiry of `id`
    ///
    /// Raises the timer's flag if it is armed; a one-shot disarms first.
    pub fn fire(&mut self, id: TimerId) {
        if let Some(Some(slot)) = self.slots.get_mut(id.raw() as usize) {
            if !slot.active {
                return;
            }
            if let Mode::Once(_) = slot.mode {
                slot.active = false;
            }
            slot.flag.raise();
        }
    }

    /// The period/delay the timer was last armed with
    pub fn interval_of(&self, id: TimerId) -> Option<u64> {
        match self.slots.get(id.raw() as usize)? {
            Some(slot) => match slot.mode {
                Mode::Periodic(us) | Mode::Once(us) => Some(us),
                Mode::Idle => None,
            },
            None => None,
        }
    }

    fn slot_mut(&mut self, id: TimerId) -> Result<&mut Slot, TimerError> {
        self.slots
            .get_mut(id.raw() as usize)
            .and_then(Option::as_mut)
            .ok_or(TimerError::InvalidHandle)
    }
}

impl Default for MockTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerService for MockTimers {
    fn create(&mut self, flag: &'static TickFlag) -> Result<TimerId, TimerError> {
        let created = self.slots.iter().filter(|s| s.is_some()).count();
        if created >= self.capacity {
            return Err(TimerError::Exhausted);
        }
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(Slot {
                    flag,
                    mode: Mode::Idle,
                    active: false,
                });
                return Ok(TimerId::from_raw(i as u8));
            }
        }
        Err(TimerError::Exhausted)
    }

    fn start_periodic(&mut self, id: TimerId, period_us: u64) -> Result<(), TimerError> {
        let slot = self.slot_mut(id)?;
        slot.mode = Mode::Periodic(period_us);
        slot.active = true;
        Ok(())
    }

    fn start_once(&mut self, id: TimerId, delay_us: u64) -> Result<(), TimerError> {
        let slot = self.slot_mut(id)?;
        slot.mode = Mode::Once(delay_us);
        slot.active = true;
        Ok(())
    }

    fn stop(&mut self, id: TimerId) {
        if let Ok(slot) = self.slot_mut(id) {
            slot.active = false;
        }
    }

    fn delete(&mut self, id: TimerId) {
        if let Some(slot) = self.slots.get_mut(id.raw() as usize) {
            *slot = None;
        }
    }

    fn is_active(&self, id: TimerId) -> bool {
        matches!(
            self.slots.get(id.raw() as usize),
            Some(Some(slot)) if slot.active
        )
    }
}

/// Mock ADC with per-pin readings settable by tests
pub struct MockAnalog {
    values: [u16; 32],
    /// Number of reads performed
    pub reads: usize,
}

impl MockAnalog {
    pub fn new() -> Self {
        Self {
            values: [0; 32],
            reads: 0,
        }
    }

    /// Set the value the next reads of `pin` return
    pub fn set(&mut self, pin: u8, value: u16) {
        self.values[pin as usize] = value;
    }
}

impl Default for MockAnalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogReader for MockAnalog {
    fn read(&mut self, pin: u8) -> u16 {
        self.reads += 1;
        self.values[pin as usize]
    }
}

/// Mock PWM output recording the last written duty
pub struct MockPwm {
    /// Last `(pin, duty)` written
    pub last: Option<(u8, u32)>,
    /// Number of writes performed
    pub writes: usize,
}

impl MockPwm {
    pub fn new() -> Self {
        Self {
            last: None,
            writes: 0,
        }
    }
}

impl Default for MockPwm {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmWriter for MockPwm {
    fn write(&mut self, pin: u8, duty: u32) {
        self.last = Some((pin, duty));
        self.writes += 1;
    }
}

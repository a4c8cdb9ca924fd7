//! Hardware timer service abstraction
//!
//! Models a small pool of one-shot/periodic timers in the style of a
//! microcontroller timer peripheral: a timer is created once, then started,
//! stopped and restarted by handle. The interrupt side of a timer is a
//! single [`TickFlag`] store; the owning device drains the flag from the
//! cooperative loop and does the actual work there.

use portable_atomic::{AtomicBool, Ordering};

/// Opaque handle to a created timer
///
/// Handles index into the service's registry; the registry owns timer
/// lifetime, not the devices holding handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId(pub(crate) u8);

impl TimerId {
    /// Create a handle from a raw slot index (for service implementations)
    pub fn from_raw(raw: u8) -> Self {
        TimerId(raw)
    }

    /// Raw slot index of this handle
    pub fn raw(&self) -> u8 {
        self.0
    }
}

/// Errors reported by a timer service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// No free timer slot left in the service
    Exhausted,
    /// The handle does not refer to a created timer
    InvalidHandle,
}

/// Per-timer fire flag, shared between interrupt and consumer context
///
/// The interrupt path only ever calls [`raise`](TickFlag::raise); the single
/// consumer clears it with [`take`](TickFlag::take). The flag is monotone
/// within one cycle, so a raise racing a concurrent stop costs at most one
/// spurious or delayed sample - never a torn state.
pub struct TickFlag(AtomicBool);

impl TickFlag {
    /// Create a lowered flag
    pub const fn new() -> Self {
        TickFlag(AtomicBool::new(false))
    }

    /// Raise the flag (interrupt side)
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Lower the flag without consuming it
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Consume the flag, returning whether it was raised (consumer side)
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Peek without consuming
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for TickFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// A pool of hardware timers
///
/// `stop` and `delete` are infallible requests: stopping an idle timer or
/// deleting an unknown handle is a no-op, mirroring how timer peripherals
/// treat redundant commands.
pub trait TimerService {
    /// Claim a timer slot whose firings raise `flag`
    fn create(&mut self, flag: &'static TickFlag) -> Result<TimerId, TimerError>;

    /// Start the timer firing every `period_us` microseconds
    fn start_periodic(&mut self, id: TimerId, period_us: u64) -> Result<(), TimerError>;

    /// Start the timer firing once after `delay_us` microseconds
    fn start_once(&mut self, id: TimerId, delay_us: u64) -> Result<(), TimerError>;

    /// Stop the timer without releasing its slot
    fn stop(&mut self, id: TimerId);

    /// Release the timer slot
    fn delete(&mut self, id: TimerId);

    /// Whether the timer is currently armed
    fn is_active(&self, id: TimerId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_take_consumes() {
        let flag = TickFlag::new();
        assert!(!flag.take());

        flag.raise();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn test_flag_clear() {
        let flag = TickFlag::new();
        flag.raise();
        flag.clear();
        assert!(!flag.is_raised());
        assert!(!flag.take());
    }
}

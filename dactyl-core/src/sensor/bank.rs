//! The four-sensor bank and its shared sampling configuration
//!
//! The sampling interval is a property of the bank, not of any one
//! channel: every sensor samples at the same rate. Changing it goes
//! through [`SensorBank::set_sampling_interval`], which stops every
//! channel before mutating the value so no channel ever runs at a
//! half-changed interval.

use crate::sensor::channel::{ChannelError, SensorChannel};
use crate::traits::TimerService;

/// Number of instrumented fingers
pub const SENSOR_COUNT: usize = 4;

/// Default shared sampling interval: 100 ms (10 Hz)
pub const DEFAULT_SAMPLING_INTERVAL_US: u64 = 100_000;

/// The four flex sensor channels plus their shared sampling interval
pub struct SensorBank {
    channels: [SensorChannel; SENSOR_COUNT],
    interval_us: u64,
}

impl SensorBank {
    pub fn new(channels: [SensorChannel; SENSOR_COUNT]) -> Self {
        Self {
            channels,
            interval_us: DEFAULT_SAMPLING_INTERVAL_US,
        }
    }

    /// The shared sampling interval in microseconds
    pub fn sampling_interval(&self) -> u64 {
        self.interval_us
    }

    /// Change the shared sampling interval (atomic reconfigure)
    ///
    /// Every channel is stopped before the interval is mutated; exactly the
    /// channels that were previously active are restarted at the new
    /// interval.
    pub fn set_sampling_interval(&mut self, svc: &mut impl TimerService, interval_us: u64) {
        let mut was_active = [false; SENSOR_COUNT];
        for (i, ch) in self.channels.iter().enumerate() {
            was_active[i] = ch.is_active(svc);
        }

        let old = self.interval_us;
        for ch in self.channels.iter_mut() {
            ch.set_active(svc, false, old);
        }

        self.interval_us = interval_us;
        for (i, ch) in self.channels.iter_mut().enumerate() {
            if was_active[i] {
                ch.set_active(svc, true, interval_us);
            }
        }
    }

    /// Run `setup` on every channel, reporting whether all succeeded
    pub fn setup_all(&mut self, svc: &mut impl TimerService) -> bool {
        let mut ok = true;
        for ch in self.channels.iter_mut() {
            ok &= ch.setup(svc).is_ok();
        }
        ok
    }

    /// Start or stop sampling on every channel
    pub fn set_all_active(&mut self, svc: &mut impl TimerService, enable: bool) {
        let interval = self.interval_us;
        for ch in self.channels.iter_mut() {
            ch.set_active(svc, enable, interval);
        }
    }

    /// Bind or unbind one channel's pin, at the shared interval
    pub fn set_pin(
        &mut self,
        svc: &mut impl TimerService,
        ordinal: u8,
        pin: Option<u8>,
    ) -> Result<(), ChannelError> {
        let interval = self.interval_us;
        match self.by_ordinal_mut(ordinal) {
            Some(ch) => ch.set_pin(svc, pin, interval),
            None => Err(ChannelError::PinOutOfRange),
        }
    }

    /// Channel for a finger ordinal (2-5)
    pub fn by_ordinal(&self, ordinal: u8) -> Option<&SensorChannel> {
        self.channels.iter().find(|ch| ch.finger() as u8 == ordinal)
    }

    /// Mutable channel for a finger ordinal (2-5)
    pub fn by_ordinal_mut(&mut self, ordinal: u8) -> Option<&mut SensorChannel> {
        self.channels
            .iter_mut()
            .find(|ch| ch.finger() as u8 == ordinal)
    }

    pub fn channels(&self) -> &[SensorChannel] {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut [SensorChannel] {
        &mut self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTimers;
    use crate::sensor::channel::Finger;
    use crate::traits::TickFlag;

    fn bank(flags: &'static [TickFlag; SENSOR_COUNT]) -> SensorBank {
        SensorBank::new([
            SensorChannel::new("FLEX_2", Finger::Index, &flags[0]),
            SensorChannel::new("FLEX_3", Finger::Middle, &flags[1]),
            SensorChannel::new("FLEX_4", Finger::Ring, &flags[2]),
            SensorChannel::new("FLEX_5", Finger::Pinky, &flags[3]),
        ])
    }

    #[test]
    fn test_lookup_by_ordinal() {
        static FLAGS: [TickFlag; SENSOR_COUNT] = [
            TickFlag::new(),
            TickFlag::new(),
            TickFlag::new(),
            TickFlag::new(),
        ];
        let bank = bank(&FLAGS);
        assert_eq!(bank.by_ordinal(2).unwrap().name(), "FLEX_2");
        assert_eq!(bank.by_ordinal(5).unwrap().name(), "FLEX_5");
        assert!(bank.by_ordinal(6).is_none());
    }

    #[test]
    fn test_sample_rate_reconfigure_restarts_active_only() {
        static FLAGS: [TickFlag; SENSOR_COUNT] = [
            TickFlag::new(),
            TickFlag::new(),
            TickFlag::new(),
            TickFlag::new(),
        ];
        let mut timers = MockTimers::new();
        let mut bank = bank(&FLAGS);
        bank.setup_all(&mut timers);
        for (i, pin) in [26, 27, 28, 29].into_iter().enumerate() {
            bank.set_pin(&mut timers, (i + 2) as u8, Some(pin)).unwrap();
        }

        // Activate only index and ring
        bank.by_ordinal_mut(2).unwrap().set_active(&mut timers, true, 100_000);
        bank.by_ordinal_mut(4).unwrap().set_active(&mut timers, true, 100_000);

        bank.set_sampling_interval(&mut timers, 20_000);
        assert_eq!(bank.sampling_interval(), 20_000);

        // The active pair runs at the new interval; the rest stay stopped
        for (ordinal, active) in [(2u8, true), (3, false), (4, true), (5, false)] {
            let ch = bank.by_ordinal(ordinal).unwrap();
            assert_eq!(ch.is_active(&timers), active, "ordinal {ordinal}");
        }
        let id2 = crate::traits::TimerId::from_raw(0);
        let id4 = crate::traits::TimerId::from_raw(2);
        assert_eq!(timers.interval_of(id2), Some(20_000));
        assert_eq!(timers.interval_of(id4), Some(20_000));
    }

    #[test]
    fn test_set_all_active() {
        static FLAGS: [TickFlag; SENSOR_COUNT] = [
            TickFlag::new(),
            TickFlag::new(),
            TickFlag::new(),
            TickFlag::new(),
        ];
        let mut timers = MockTimers::new();
        let mut bank = bank(&FLAGS);
        bank.setup_all(&mut timers);

        bank.set_all_active(&mut timers, true);
        assert!(bank.channels().iter().all(|ch| ch.is_active(&timers)));

        bank.set_all_active(&mut timers, false);
        assert!(bank.channels().iter().all(|ch| !ch.is_active(&timers)));
    }

    #[test]
    fn test_subsequent_starts_use_new_interval() {
        static FLAGS: [TickFlag; SENSOR_COUNT] = [
            TickFlag::new(),
            TickFlag::new(),
            TickFlag::new(),
            TickFlag::new(),
        ];
        let mut timers = MockTimers::new();
        let mut bank = bank(&FLAGS);
        bank.setup_all(&mut timers);

        // Nothing active: the setter only records the new interval...
        bank.set_sampling_interval(&mut timers, 42_000);
        assert!(bank.channels().iter().all(|ch| !ch.is_active(&timers)));

        // ...which the next start picks up
        bank.set_all_active(&mut timers, true);
        let id = crate::traits::TimerId::from_raw(0);
        assert_eq!(timers.interval_of(id), Some(42_000));
    }
}

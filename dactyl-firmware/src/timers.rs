//! Embassy-backed implementation of the core's timer service
//!
//! A fixed table of timer slots lives behind a critical-section mutex. The
//! [`timer_engine`] task sleeps until the nearest deadline and raises the
//! due slots' fire flags - the firmware's stand-in for a hardware timer
//! interrupt. Reconfiguration from the control task signals the engine so
//! it recomputes its sleep.

use core::cell::RefCell;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};

use dactyl_core::traits::{TickFlag, TimerError, TimerId, TimerService};

use defmt::trace;

/// Timer slots available on the board
///
/// Six are in use: four sensor channels, the servo tick and its fallback.
pub const TIMER_SLOTS: usize = 8;

#[derive(Clone, Copy)]
enum Mode {
    Periodic(u64),
    Once,
}

#[derive(Clone, Copy)]
struct Slot {
    flag: &'static TickFlag,
    mode: Mode,
    deadline: Instant,
    active: bool,
}

type Slots = [Option<Slot>; TIMER_SLOTS];

/// Shared timer registry
pub struct TimerTable {
    slots: Mutex<CriticalSectionRawMutex, RefCell<Slots>>,
    changed: Signal<CriticalSectionRawMutex, ()>,
}

impl TimerTable {
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(RefCell::new([None; TIMER_SLOTS])),
            changed: Signal::new(),
        }
    }
}

/// The board's timer registry
pub static TIMER_TABLE: TimerTable = TimerTable::new();

/// Handle giving the control task [`TimerService`] access to the table
pub struct HardwareTimers {
    table: &'static TimerTable,
}

impl HardwareTimers {
    pub fn new(table: &'static TimerTable) -> Self {
        Self { table }
    }
}

impl TimerService for HardwareTimers {
    fn create(&mut self, flag: &'static TickFlag) -> Result<TimerId, TimerError> {
        self.table.slots.lock(|slots| {
            let mut slots = slots.borrow_mut();
            for (i, slot) in slots.iter_mut().enumerate() {
                if slot.is_none() {
                    *slot = Some(Slot {
                        flag,
                        mode: Mode::Once,
                        deadline: Instant::now(),
                        active: false,
                    });
                    return Ok(TimerId::from_raw(i as u8));
                }
            }
            Err(TimerError::Exhausted)
        })
    }

    fn start_periodic(&mut self, id: TimerId, period_us: u64) -> Result<(), TimerError> {
        let result = self.table.slots.lock(|slots| {
            let mut slots = slots.borrow_mut();
            match slots.get_mut(id.raw() as usize).and_then(Option::as_mut) {
                Some(slot) => {
                    slot.mode = Mode::Periodic(period_us);
                    slot.deadline = Instant::now() + Duration::from_micros(period_us);
                    slot.active = true;
                    Ok(())
                }
                None => Err(TimerError::InvalidHandle),
            }
        });
        self.table.changed.signal(());
        result
    }

    fn start_once(&mut self, id: TimerId, delay_us: u64) -> Result<(), TimerError> {
        let result = self.table.slots.lock(|slots| {
            let mut slots = slots.borrow_mut();
            match slots.get_mut(id.raw() as usize).and_then(Option::as_mut) {
                Some(slot) => {
                    slot.mode = Mode::Once;
                    slot.deadline = Instant::now() + Duration::from_micros(delay_us);
                    slot.active = true;
                    Ok(())
                }
                None => Err(TimerError::InvalidHandle),
            }
        });
        self.table.changed.signal(());
        result
    }

    fn stop(&mut self, id: TimerId) {
        self.table.slots.lock(|slots| {
            let mut slots = slots.borrow_mut();
            if let Some(slot) = slots.get_mut(id.raw() as usize).and_then(Option::as_mut) {
                slot.active = false;
            }
        });
        self.table.changed.signal(());
    }

    fn delete(&mut self, id: TimerId) {
        self.table.slots.lock(|slots| {
            let mut slots = slots.borrow_mut();
            if let Some(slot) = slots.get_mut(id.raw() as usize) {
                *slot = None;
            }
        });
        self.table.changed.signal(());
    }

    fn is_active(&self, id: TimerId) -> bool {
        self.table.slots.lock(|slots| {
            matches!(
                slots.borrow().get(id.raw() as usize),
                Some(Some(slot)) if slot.active
            )
        })
    }
}

/// Nearest armed deadline, if any slot is armed
fn next_deadline(table: &TimerTable) -> Option<Instant> {
    table.slots.lock(|slots| {
        slots
            .borrow()
            .iter()
            .flatten()
            .filter(|slot| slot.active)
            .map(|slot| slot.deadline)
            .min()
    })
}

/// Raise the flags of every due slot and advance their deadlines
fn fire_due(table: &TimerTable, now: Instant) {
    table.slots.lock(|slots| {
        let mut slots = slots.borrow_mut();
        for slot in slots.iter_mut().flatten() {
            if slot.active && slot.deadline <= now {
                slot.flag.raise();
                match slot.mode {
                    Mode::Periodic(period_us) => {
                        slot.deadline += Duration::from_micros(period_us);
                    }
                    Mode::Once => slot.active = false,
                }
            }
        }
    });
}

/// Timer engine task - the board's "timer interrupt"
#[embassy_executor::task]
pub async fn timer_engine(table: &'static TimerTable) {
    trace!("Timer engine started");

    loop {
        match next_deadline(table) {
            Some(deadline) => match select(Timer::at(deadline), table.changed.wait()).await {
                Either::First(()) => fire_due(table, Instant::now()),
                Either::Second(()) => {
                    // Table changed - recompute the sleep
                }
            },
            None => {
                table.changed.wait().await;
            }
        }
    }
}

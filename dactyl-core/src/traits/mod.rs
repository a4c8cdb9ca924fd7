//! Hardware abstraction traits
//!
//! The core never talks to peripherals directly. Timers, the ADC and the
//! PWM output are reached through these traits; the firmware provides the
//! board implementations and `crate::mock` provides host test doubles.

pub mod analog;
pub mod timer;

pub use analog::{AnalogReader, PwmWriter};
pub use timer::{TickFlag, TimerError, TimerId, TimerService};

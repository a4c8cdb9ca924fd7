//! Board-agnostic core logic for the hand exoskeleton firmware
//!
//! This crate contains all device-control logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (timer service, ADC input, PWM output)
//! - Flex sensor sampling scheduler
//! - Servo motion state machine with fallback recovery
//! - Attribute protocol dispatcher
//!
//! Interrupt-side code is reduced to raising per-timer fire flags; all
//! hardware access happens in the cooperative consumer that polls the
//! devices. Everything here runs on the host for testing - `mock` provides
//! the test doubles.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod bridge;
pub mod motion;
pub mod sensor;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

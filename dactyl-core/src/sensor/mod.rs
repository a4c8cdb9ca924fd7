//! Flex sensor sampling
//!
//! One [`SensorChannel`] per finger, grouped under a [`SensorBank`] that
//! owns the sampling interval shared by all channels.

pub mod bank;
pub mod channel;

pub use bank::{SensorBank, DEFAULT_SAMPLING_INTERVAL_US, SENSOR_COUNT};
pub use channel::{ChannelError, Finger, SensorChannel, ADC_PIN_MAX, ADC_PIN_MIN};

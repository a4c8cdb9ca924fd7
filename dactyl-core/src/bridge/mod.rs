//! Attribute protocol bridge
//!
//! Translates parsed protocol requests into typed calls on the motion
//! controller and sensor bank, and device events into outbound responses.
//! The transport stays outside: it hands requests in and delivers the
//! returned [`Outbound`] batch, using each entry's [`Target`] to decide
//! between answering the caller and broadcasting.
//!
//! [`Target`]: dactyl_protocol::Target

pub mod dispatch;

pub use dispatch::{
    connect_snapshot, dispatch, sensor_reading, servo_position, Outbound, Responses,
    MAX_RESPONSES,
};

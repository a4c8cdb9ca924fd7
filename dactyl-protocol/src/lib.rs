//! Attribute get/set protocol for the Dactyl hand exoskeleton
//!
//! This crate defines the command/response data model spoken between the
//! controller board and a remote client. The transport (a WebSocket or
//! serial link) delivers one JSON document per message:
//!
//! ```text
//! client -> board   {"dev":"SERVO","req":"SET","attr":"POSITION","val":90}
//! board  -> client  {"dev":"SERVO","attr":"POSITION","val":90}
//! ```
//!
//! Every token domain (device, method, attribute) is a closed set; unknown
//! tokens parse to that domain's `Invalid` sentinel and never fail. The
//! crate does not route commands - see `dactyl-core::bridge` for the
//! dispatcher that maps requests onto devices.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod response;
pub mod tokens;

pub use command::{Request, Value};
pub use response::{EncodeError, Response, Target};
pub use tokens::{Device, FlexAttr, FlexUnitAttr, Method, ServoAttr};

//! Outbound response model
//!
//! Four response shapes exist on the wire:
//!
//! - Get:             `{"dev":..,"attr":..,"val":..}`
//! - Set ack:         `{"dev":..,"req":"SET","attr":..,"val":..,"stat":"OK"|"ERROR"}`
//! - Invalid request: `{"error":"Invalid request","details":..}`
//! - Invalid attr:    `{"dev":..,"req":..,"attr":..,"stat":"ERROR","details":..}`
//!
//! Error responses echo the offending request fields so the client can
//! correlate; absent fields echo as JSON `null` with the literal string
//! `"null"` in `details`.

use serde::Serialize;

use crate::command::Value;

/// Delivery target for a response
///
/// Set acknowledgments and error responses go back to the requesting
/// client; get responses and state notifications are broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    /// The client whose request produced this response
    Caller,
    /// Every connected client
    All,
}

/// Errors that can occur while encoding a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Output buffer too small for the serialized document
    BufferTooSmall,
}

/// One outbound response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response<'a> {
    /// Answer to a get request, or an unsolicited state notification
    Get {
        dev: &'a str,
        attr: &'a str,
        val: Value<'a>,
    },
    /// Acknowledgment of a set request
    Set {
        dev: Option<&'a str>,
        attr: Option<&'a str>,
        val: Option<Value<'a>>,
        ok: bool,
    },
    /// The device/method combination could not be resolved
    InvalidRequest { req: Option<&'a str> },
    /// The attribute could not be resolved for the device, or the value
    /// had the wrong shape
    InvalidAttr {
        dev: Option<&'a str>,
        req: Option<&'a str>,
        attr: Option<&'a str>,
    },
}

#[derive(Serialize)]
struct GetWire<'a> {
    dev: &'a str,
    attr: &'a str,
    val: Value<'a>,
}

#[derive(Serialize)]
struct SetWire<'a> {
    dev: Option<&'a str>,
    req: &'static str,
    attr: Option<&'a str>,
    val: Option<Value<'a>>,
    stat: &'static str,
}

#[derive(Serialize)]
struct InvalidRequestWire<'a> {
    error: &'static str,
    details: &'a str,
}

#[derive(Serialize)]
struct InvalidAttrWire<'a> {
    dev: Option<&'a str>,
    req: Option<&'a str>,
    attr: Option<&'a str>,
    stat: &'static str,
    details: &'a str,
}

impl<'a> Response<'a> {
    /// Build a get response/notification
    pub fn get(dev: &'a str, attr: &'a str, val: Value<'a>) -> Self {
        Response::Get { dev, attr, val }
    }

    /// Serialize into `buf`, returning the number of bytes written
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        let result = match *self {
            Response::Get { dev, attr, val } => {
                serde_json_core::to_slice(&GetWire { dev, attr, val }, buf)
            }
            Response::Set { dev, attr, val, ok } => serde_json_core::to_slice(
                &SetWire {
                    dev,
                    req: "SET",
                    attr,
                    val,
                    stat: if ok { "OK" } else { "ERROR" },
                },
                buf,
            ),
            Response::InvalidRequest { req } => serde_json_core::to_slice(
                &InvalidRequestWire {
                    error: "Invalid request",
                    details: req.unwrap_or("null"),
                },
                buf,
            ),
            Response::InvalidAttr { dev, req, attr } => serde_json_core::to_slice(
                &InvalidAttrWire {
                    dev,
                    req,
                    attr,
                    stat: "ERROR",
                    details: attr.unwrap_or("null"),
                },
                buf,
            ),
        };
        result.map_err(|_| EncodeError::BufferTooSmall)
    }
}

//! Inbound command model
//!
//! A request is one JSON document with string fields `dev`, `req`, `attr`
//! and a polymorphic `val`. All fields are optional at the wire level; the
//! dispatcher decides what an absent field means for a given route.

use core::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

/// A polymorphic attribute value
///
/// JSON `null` is represented as an absent `Option<Value>`, not a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value<'a> {
    Bool(bool),
    Int(i64),
    Str(&'a str),
}

impl<'a> Value<'a> {
    /// Integer content, if this value is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean content, if this value is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String content, if this value is a string
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for Value<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Str(s) => serializer.serialize_str(s),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value<'de>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, integer or string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Value::Int(v as i64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        // Clients send whole numbers; a fractional value truncates.
        Ok(Value::Int(v as i64))
    }

    fn visit_borrowed_str<E: de::Error>(self, v: &'de str) -> Result<Self::Value, E> {
        Ok(Value::Str(v))
    }
}

impl<'de> Deserialize<'de> for Value<'de> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// One inbound request, as received on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(bound(deserialize = "'a: 'de"))]
pub struct Request<'a> {
    /// Device token (`SERVO`, `FLEX`, `FLEX_2`..`FLEX_5`)
    #[serde(default, borrow)]
    pub dev: Option<&'a str>,
    /// Method token (`GET`/`SET`)
    #[serde(default, borrow)]
    pub req: Option<&'a str>,
    /// Attribute token, device-scoped
    #[serde(default, borrow)]
    pub attr: Option<&'a str>,
    /// Attribute value for SET requests
    #[serde(default, borrow)]
    pub val: Option<Value<'a>>,
}

impl<'a> Request<'a> {
    /// Parse a request from a JSON document
    pub fn from_json(raw: &'a [u8]) -> Option<Self> {
        serde_json_core::from_slice(raw).ok().map(|(req, _)| req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_request() {
        let req = Request::from_json(br#"{"dev":"SERVO","req":"SET","attr":"POSITION","val":90}"#)
            .unwrap();
        assert_eq!(req.dev, Some("SERVO"));
        assert_eq!(req.req, Some("SET"));
        assert_eq!(req.attr, Some("POSITION"));
        assert_eq!(req.val, Some(Value::Int(90)));
    }

    #[test]
    fn test_bool_and_string_values() {
        let req = Request::from_json(br#"{"dev":"FLEX_3","req":"SET","attr":"PIN","val":false}"#)
            .unwrap();
        assert_eq!(req.val, Some(Value::Bool(false)));

        let req =
            Request::from_json(br#"{"dev":"SERVO","req":"SET","attr":"MOTION","val":"SWEEP"}"#)
                .unwrap();
        assert_eq!(req.val, Some(Value::Str("SWEEP")));
    }

    #[test]
    fn test_missing_fields() {
        let req = Request::from_json(br#"{"dev":"BOGUS","req":"GET"}"#).unwrap();
        assert_eq!(req.dev, Some("BOGUS"));
        assert_eq!(req.attr, None);
        assert_eq!(req.val, None);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(Request::from_json(b"not json").is_none());
        assert!(Request::from_json(b"").is_none());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Int(7).as_bool(), None);
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Str("LOOP").as_str(), Some("LOOP"));
        assert_eq!(Value::Str("LOOP").as_int(), None);
    }
}

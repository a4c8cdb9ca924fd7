//! Closed token sets for the attribute protocol
//!
//! Each domain (device, method, attribute) parses with an exhaustive match
//! over its known tokens. Anything else resolves to the domain's `Invalid`
//! sentinel - parsing never fails and never panics, so a malformed request
//! can always be answered with a structured error response.

/// Addressable devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Device {
    /// The tendon servo
    Servo,
    /// Class-wide flex sensor attributes (sample rate, start/stop all)
    FlexGroup,
    /// A single flex sensor, identified by its finger ordinal (2-5)
    FlexUnit(u8),
    /// Unrecognized device token
    Invalid,
}

impl Device {
    /// Parse a device token. `None` (field absent) is invalid.
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some("SERVO") => Device::Servo,
            Some("FLEX") => Device::FlexGroup,
            Some("FLEX_2") => Device::FlexUnit(2),
            Some("FLEX_3") => Device::FlexUnit(3),
            Some("FLEX_4") => Device::FlexUnit(4),
            Some("FLEX_5") => Device::FlexUnit(5),
            _ => Device::Invalid,
        }
    }
}

/// Request methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Set,
    Invalid,
}

impl Method {
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some("GET") => Method::Get,
            Some("SET") => Method::Set,
            _ => Method::Invalid,
        }
    }
}

/// Servo attributes reachable via GET/SET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoAttr {
    /// Angle increment (degrees) per tick
    AngleStep,
    /// Tick interval (us) between angle increments
    TimeDelay,
    /// Minimum pulse width (us) of the PWM signal
    MinPwm,
    /// Maximum pulse width (us) of the PWM signal
    MaxPwm,
    /// Angular position (degrees)
    Position,
    /// Output pin the servo is connected to
    Pin,
    /// Enable/disable actuation in a controlled-speed mode
    Actuate,
    /// Angle where controlled motion starts
    StartAngle,
    /// Angle where controlled motion stops
    StopAngle,
    /// Motion mode (LOOP/SWEEP/ONE_SHOT)
    Motion,
    /// Maximum angle, used in duty-cycle calculation
    MaxAngle,
    /// Unrecognized attribute token
    Invalid,
}

impl ServoAttr {
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some("ANGLE_STEP") => ServoAttr::AngleStep,
            Some("TIME_DELAY") => ServoAttr::TimeDelay,
            Some("MIN_PWM") => ServoAttr::MinPwm,
            Some("MAX_PWM") => ServoAttr::MaxPwm,
            Some("POSITION") => ServoAttr::Position,
            Some("PIN") => ServoAttr::Pin,
            Some("ACTUATE") => ServoAttr::Actuate,
            Some("START_ANGLE") => ServoAttr::StartAngle,
            Some("STOP_ANGLE") => ServoAttr::StopAngle,
            Some("MOTION") => ServoAttr::Motion,
            Some("MAX_ANGLE") => ServoAttr::MaxAngle,
            _ => ServoAttr::Invalid,
        }
    }

    /// Wire token for this attribute (used when emitting responses)
    pub fn as_str(&self) -> &'static str {
        match self {
            ServoAttr::AngleStep => "ANGLE_STEP",
            ServoAttr::TimeDelay => "TIME_DELAY",
            ServoAttr::MinPwm => "MIN_PWM",
            ServoAttr::MaxPwm => "MAX_PWM",
            ServoAttr::Position => "POSITION",
            ServoAttr::Pin => "PIN",
            ServoAttr::Actuate => "ACTUATE",
            ServoAttr::StartAngle => "START_ANGLE",
            ServoAttr::StopAngle => "STOP_ANGLE",
            ServoAttr::Motion => "MOTION",
            ServoAttr::MaxAngle => "MAX_ANGLE",
            ServoAttr::Invalid => "INVALID",
        }
    }
}

/// Class-wide flex sensor attributes
///
/// These apply to the sensor bank as a whole, not to one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlexAttr {
    /// Shared sampling interval (us)
    SampleRate,
    /// Start sampling on every sensor
    Start,
    /// Stop sampling on every sensor
    Stop,
    Invalid,
}

impl FlexAttr {
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some("SAMPLE_RATE") => FlexAttr::SampleRate,
            Some("START") => FlexAttr::Start,
            Some("STOP") => FlexAttr::Stop,
            _ => FlexAttr::Invalid,
        }
    }
}

/// Per-sensor attributes
///
/// Only the bound pin is settable per sensor for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlexUnitAttr {
    Pin,
    Invalid,
}

impl FlexUnitAttr {
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some("PIN") => FlexUnitAttr::Pin,
            _ => FlexUnitAttr::Invalid,
        }
    }
}

//! Request routing
//!
//! Routing is a two-level decision: resolve the device, then the method,
//! then a device-scoped attribute. Unknown tokens resolve to `Invalid`
//! sentinels and come back as structured error responses - nothing in this
//! module panics on client input.
//!
//! Response targeting follows the original protocol: get responses and
//! state notifications are broadcast to every client, set acknowledgments
//! and error responses go back to the requesting client only.
//!
//! Rejected configuration values (a pin out of range, a PWM bound in the
//! wrong order) are deliberately silent on the wire for the servo: the
//! setter leaves state untouched and the caller's diagnostics log the
//! rejection. Only sensor pin sets report their outcome in the `stat`
//! field.

use heapless::Vec;

use dactyl_protocol::{
    Device, FlexAttr, FlexUnitAttr, Method, Request, Response, ServoAttr, Target, Value,
};

use crate::motion::{Motion, MotionController};
use crate::sensor::SensorBank;
use crate::traits::{PwmWriter, TimerService};

/// Capacity of one dispatch/snapshot batch
pub const MAX_RESPONSES: usize = 16;

/// A response plus where to deliver it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outbound<'a> {
    pub target: Target,
    pub response: Response<'a>,
}

/// Batch of responses produced by one dispatch
pub type Responses<'a> = Vec<Outbound<'a>, MAX_RESPONSES>;

fn push<'a>(out: &mut Responses<'a>, target: Target, response: Response<'a>) {
    let _ = out.push(Outbound { target, response });
}

fn invalid_attr<'a>(req: &Request<'a>, out: &mut Responses<'a>) {
    push(
        out,
        Target::Caller,
        Response::InvalidAttr {
            dev: req.dev,
            req: req.req,
            attr: req.attr,
        },
    );
}

fn invalid_request<'a>(req: &Request<'a>, out: &mut Responses<'a>) {
    push(out, Target::Caller, Response::InvalidRequest { req: req.req });
}

fn set_ack<'a>(req: &Request<'a>, ok: bool, out: &mut Responses<'a>) {
    push(
        out,
        Target::Caller,
        Response::Set {
            dev: req.dev,
            attr: req.attr,
            val: req.val,
            ok,
        },
    );
}

/// Coerce a value to an integer type, rejecting wrong shapes and ranges
fn int_value<T: TryFrom<i64>>(val: Value<'_>) -> Option<T> {
    val.as_int().and_then(|n| T::try_from(n).ok())
}

/// Route one request onto the devices, producing the responses to deliver
pub fn dispatch<'a>(
    req: &Request<'a>,
    servo: &mut MotionController,
    sensors: &mut SensorBank,
    svc: &mut impl TimerService,
    pwm: &mut impl PwmWriter,
) -> Responses<'a> {
    let mut out = Responses::new();
    let device = Device::parse(req.dev);
    let method = Method::parse(req.req);

    if device == Device::Invalid || method == Method::Invalid {
        invalid_request(req, &mut out);
        return out;
    }

    match device {
        Device::Servo => dispatch_servo(req, method, servo, svc, pwm, &mut out),
        Device::FlexGroup => dispatch_flex_group(req, method, sensors, svc, &mut out),
        Device::FlexUnit(ordinal) => {
            dispatch_flex_unit(req, method, ordinal, sensors, svc, &mut out)
        }
        Device::Invalid => {}
    }
    out
}

fn dispatch_servo<'a>(
    req: &Request<'a>,
    method: Method,
    servo: &mut MotionController,
    svc: &mut impl TimerService,
    pwm: &mut impl PwmWriter,
    out: &mut Responses<'a>,
) {
    let attr = ServoAttr::parse(req.attr);
    match method {
        Method::Set => {
            let Some(val) = req.val else {
                // A set without a value cannot be routed
                invalid_request(req, out);
                return;
            };
            dispatch_servo_set(req, attr, val, servo, svc, pwm, out);
        }
        Method::Get => dispatch_servo_get(req, attr, servo, svc, out),
        Method::Invalid => {}
    }
}

fn dispatch_servo_set<'a>(
    req: &Request<'a>,
    attr: ServoAttr,
    val: Value<'a>,
    servo: &mut MotionController,
    svc: &mut impl TimerService,
    pwm: &mut impl PwmWriter,
    out: &mut Responses<'a>,
) {
    match attr {
        ServoAttr::AngleStep => match int_value::<i32>(val) {
            Some(step) => {
                let _ = servo.set_angle_step(svc, step);
            }
            None => invalid_attr(req, out),
        },
        ServoAttr::TimeDelay => match int_value::<u64>(val) {
            Some(delay_us) => {
                let _ = servo.set_time_delay(svc, delay_us);
            }
            None => invalid_attr(req, out),
        },
        ServoAttr::MinPwm => match int_value::<u32>(val) {
            Some(pwm_min) => {
                let _ = servo.set_min_pwm(svc, pwm_min);
            }
            None => invalid_attr(req, out),
        },
        ServoAttr::MaxPwm => match int_value::<u32>(val) {
            Some(pwm_max) => {
                let _ = servo.set_max_pwm(svc, pwm_max);
            }
            None => invalid_attr(req, out),
        },
        ServoAttr::Position => match int_value::<i32>(val) {
            Some(pos) => {
                let applied = servo.set_position(svc, pwm, pos);
                push(out, Target::All, servo_position(applied).response);
            }
            None => invalid_attr(req, out),
        },
        ServoAttr::Pin => match int_value::<u8>(val) {
            Some(pin) => servo.set_pin(svc, pin),
            None => invalid_attr(req, out),
        },
        ServoAttr::Actuate => match val.as_bool() {
            Some(true) => servo.enable_motion(svc),
            Some(false) => servo.disable_motion(svc),
            None => invalid_attr(req, out),
        },
        ServoAttr::StartAngle => match int_value::<i32>(val) {
            Some(angle) => {
                let _ = servo.set_start_angle(svc, angle);
            }
            None => invalid_attr(req, out),
        },
        ServoAttr::StopAngle => match int_value::<i32>(val) {
            Some(angle) => {
                let _ = servo.set_stop_angle(svc, angle);
            }
            None => invalid_attr(req, out),
        },
        ServoAttr::Motion => match val.as_str() {
            // Unknown mode strings parse to Invalid, which disables
            Some(token) => servo.set_motion(svc, Motion::from_token(token)),
            None => invalid_attr(req, out),
        },
        ServoAttr::MaxAngle => match int_value::<i32>(val) {
            Some(max_angle) => {
                let _ = servo.set_max_angle(svc, max_angle);
            }
            None => invalid_attr(req, out),
        },
        ServoAttr::Invalid => invalid_attr(req, out),
    }
}

fn dispatch_servo_get<'a>(
    req: &Request<'a>,
    attr: ServoAttr,
    servo: &MotionController,
    svc: &impl TimerService,
    out: &mut Responses<'a>,
) {
    let val = match attr {
        ServoAttr::AngleStep => Value::Int(servo.angle_step() as i64),
        ServoAttr::TimeDelay => Value::Int(servo.time_delay() as i64),
        ServoAttr::MinPwm => Value::Int(servo.pwm_min() as i64),
        ServoAttr::MaxPwm => Value::Int(servo.pwm_max() as i64),
        ServoAttr::Position => Value::Int(servo.position() as i64),
        ServoAttr::Pin => Value::Int(servo.pin() as i64),
        ServoAttr::Actuate => Value::Bool(servo.is_active(svc)),
        ServoAttr::StartAngle => Value::Int(servo.start_angle() as i64),
        ServoAttr::StopAngle => Value::Int(servo.stop_angle() as i64),
        ServoAttr::Motion => Value::Str(servo.motion().as_str()),
        ServoAttr::MaxAngle => Value::Int(servo.max_angle() as i64),
        ServoAttr::Invalid => {
            invalid_attr(req, out);
            return;
        }
    };
    push(out, Target::All, Response::get("SERVO", attr.as_str(), val));
}

fn dispatch_flex_group<'a>(
    req: &Request<'a>,
    method: Method,
    sensors: &mut SensorBank,
    svc: &mut impl TimerService,
    out: &mut Responses<'a>,
) {
    match FlexAttr::parse(req.attr) {
        FlexAttr::SampleRate => match method {
            Method::Set => {
                match req.val.and_then(int_value::<u64>) {
                    // Atomic reconfigure: every channel stops, the
                    // previously active ones restart at the new interval
                    Some(interval_us) => sensors.set_sampling_interval(svc, interval_us),
                    None => invalid_attr(req, out),
                }
            }
            Method::Get => push(
                out,
                Target::All,
                Response::get(
                    "FLEX",
                    "SAMPLE_RATE",
                    Value::Int(sensors.sampling_interval() as i64),
                ),
            ),
            Method::Invalid => {}
        },
        FlexAttr::Start => {
            sensors.set_all_active(svc, true);
            set_ack(req, true, out);
        }
        FlexAttr::Stop => {
            sensors.set_all_active(svc, false);
            set_ack(req, true, out);
        }
        FlexAttr::Invalid => invalid_attr(req, out),
    }
}

fn dispatch_flex_unit<'a>(
    req: &Request<'a>,
    method: Method,
    ordinal: u8,
    sensors: &mut SensorBank,
    svc: &mut impl TimerService,
    out: &mut Responses<'a>,
) {
    match FlexUnitAttr::parse(req.attr) {
        FlexUnitAttr::Pin => match method {
            Method::Get => {
                let Some(ch) = sensors.by_ordinal(ordinal) else {
                    invalid_request(req, out);
                    return;
                };
                let val = match ch.pin() {
                    Some(pin) => Value::Int(pin as i64),
                    // Boolean false is the "unbound" sentinel on the wire
                    None => Value::Bool(false),
                };
                push(out, Target::All, Response::get(ch.name(), "PIN", val));
            }
            Method::Set => match req.val {
                Some(Value::Bool(false)) => {
                    let _ = sensors.set_pin(svc, ordinal, None);
                    set_ack(req, true, out);
                }
                Some(Value::Str("false")) => {
                    let _ = sensors.set_pin(svc, ordinal, None);
                    set_ack(req, true, out);
                }
                Some(Value::Int(raw)) => {
                    let ok = match u8::try_from(raw) {
                        Ok(pin) => sensors.set_pin(svc, ordinal, Some(pin)).is_ok(),
                        Err(_) => false,
                    };
                    set_ack(req, ok, out);
                }
                // true, other strings, or no value at all
                _ => invalid_attr(req, out),
            },
            Method::Invalid => {}
        },
        FlexUnitAttr::Invalid => invalid_attr(req, out),
    }
}

/// Connection-time state snapshot
///
/// One get response per readable servo attribute, the shared sample rate
/// and every sensor's bound pin - what a freshly connected client needs to
/// render its controls.
pub fn connect_snapshot(
    servo: &MotionController,
    sensors: &SensorBank,
) -> Responses<'static> {
    let mut out = Responses::new();
    let servo_attrs: [(ServoAttr, Value<'static>); 10] = [
        (ServoAttr::AngleStep, Value::Int(servo.angle_step() as i64)),
        (ServoAttr::MaxPwm, Value::Int(servo.pwm_max() as i64)),
        (ServoAttr::MaxAngle, Value::Int(servo.max_angle() as i64)),
        (ServoAttr::MinPwm, Value::Int(servo.pwm_min() as i64)),
        (ServoAttr::Motion, Value::Str(servo.motion().as_str())),
        (ServoAttr::Pin, Value::Int(servo.pin() as i64)),
        (ServoAttr::Position, Value::Int(servo.position() as i64)),
        (ServoAttr::StartAngle, Value::Int(servo.start_angle() as i64)),
        (ServoAttr::StopAngle, Value::Int(servo.stop_angle() as i64)),
        (ServoAttr::TimeDelay, Value::Int(servo.time_delay() as i64)),
    ];
    for (attr, val) in servo_attrs {
        push(&mut out, Target::All, Response::get("SERVO", attr.as_str(), val));
    }
    push(
        &mut out,
        Target::All,
        Response::get(
            "FLEX",
            "SAMPLE_RATE",
            Value::Int(sensors.sampling_interval() as i64),
        ),
    );
    for ch in sensors.channels() {
        let val = match ch.pin() {
            Some(pin) => Value::Int(pin as i64),
            None => Value::Bool(false),
        };
        push(&mut out, Target::All, Response::get(ch.name(), "PIN", val));
    }
    out
}

/// Broadcast notification for a fresh sensor reading
pub fn sensor_reading(name: &'static str, reading: u16) -> Outbound<'static> {
    Outbound {
        target: Target::All,
        response: Response::get(name, "READ", Value::Int(reading as i64)),
    }
}

/// Broadcast notification for a servo position change
pub fn servo_position(pos: i32) -> Outbound<'static> {
    Outbound {
        target: Target::All,
        response: Response::get("SERVO", "POSITION", Value::Int(pos as i64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPwm, MockTimers};
    use crate::sensor::{Finger, SensorChannel};
    use crate::traits::TickFlag;
    use std::boxed::Box;

    struct Rig {
        timers: MockTimers,
        pwm: MockPwm,
        servo: MotionController,
        bank: SensorBank,
    }

    fn flag() -> &'static TickFlag {
        Box::leak(Box::new(TickFlag::new()))
    }

    fn rig() -> Rig {
        let mut timers = MockTimers::new();
        let mut servo = MotionController::new(16, 270, flag(), flag());
        servo.setup(&mut timers).unwrap();

        let mut bank = SensorBank::new([
            SensorChannel::new("FLEX_2", Finger::Index, flag()),
            SensorChannel::new("FLEX_3", Finger::Middle, flag()),
            SensorChannel::new("FLEX_4", Finger::Ring, flag()),
            SensorChannel::new("FLEX_5", Finger::Pinky, flag()),
        ]);
        bank.setup_all(&mut timers);
        for (ordinal, pin) in [(2u8, 26u8), (3, 27), (4, 28), (5, 29)] {
            bank.set_pin(&mut timers, ordinal, Some(pin)).unwrap();
        }

        Rig {
            timers,
            pwm: MockPwm::new(),
            servo,
            bank,
        }
    }

    fn send(r: &mut Rig, json: &'static str) -> Responses<'static> {
        let req = Request::from_json(json.as_bytes()).unwrap();
        dispatch(&req, &mut r.servo, &mut r.bank, &mut r.timers, &mut r.pwm)
    }

    #[test]
    fn test_position_round_trip() {
        let mut r = rig();

        let out = send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"POSITION","val":90}"#);
        // A position set broadcasts the applied position
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].target, Target::All);
        assert_eq!(
            out[0].response,
            Response::get("SERVO", "POSITION", Value::Int(90))
        );

        let out = send(&mut r, r#"{"dev":"SERVO","req":"GET","attr":"POSITION"}"#);
        assert_eq!(
            out[0].response,
            Response::get("SERVO", "POSITION", Value::Int(90))
        );
    }

    #[test]
    fn test_position_set_reports_clamped_value() {
        let mut r = rig();
        let out = send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"POSITION","val":400}"#);
        assert_eq!(
            out[0].response,
            Response::get("SERVO", "POSITION", Value::Int(270))
        );
    }

    #[test]
    fn test_unbind_pin_round_trip() {
        let mut r = rig();

        let out = send(&mut r, r#"{"dev":"FLEX_3","req":"SET","attr":"PIN","val":false}"#);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].target, Target::Caller);
        assert!(matches!(out[0].response, Response::Set { ok: true, .. }));
        assert_eq!(r.bank.by_ordinal(3).unwrap().pin(), None);

        let out = send(&mut r, r#"{"dev":"FLEX_3","req":"GET","attr":"PIN"}"#);
        assert_eq!(
            out[0].response,
            Response::get("FLEX_3", "PIN", Value::Bool(false))
        );
    }

    #[test]
    fn test_unbind_via_string_false() {
        let mut r = rig();
        let out = send(&mut r, r#"{"dev":"FLEX_4","req":"SET","attr":"PIN","val":"false"}"#);
        assert!(matches!(out[0].response, Response::Set { ok: true, .. }));
        assert_eq!(r.bank.by_ordinal(4).unwrap().pin(), None);
    }

    #[test]
    fn test_pin_rebind_status_follows_result() {
        let mut r = rig();

        let out = send(&mut r, r#"{"dev":"FLEX_2","req":"SET","attr":"PIN","val":28}"#);
        assert!(matches!(out[0].response, Response::Set { ok: true, .. }));
        assert_eq!(r.bank.by_ordinal(2).unwrap().pin(), Some(28));

        // Out of ADC range: rejected, previous binding kept, ERROR status
        let out = send(&mut r, r#"{"dev":"FLEX_2","req":"SET","attr":"PIN","val":99}"#);
        assert!(matches!(out[0].response, Response::Set { ok: false, .. }));
        assert_eq!(r.bank.by_ordinal(2).unwrap().pin(), Some(28));
    }

    #[test]
    fn test_pin_wrong_shapes_are_invalid_attr() {
        let mut r = rig();
        for json in [
            r#"{"dev":"FLEX_2","req":"SET","attr":"PIN","val":true}"#,
            r#"{"dev":"FLEX_2","req":"SET","attr":"PIN","val":"off"}"#,
            r#"{"dev":"FLEX_2","req":"SET","attr":"PIN"}"#,
        ] {
            let out = send(&mut r, json);
            assert!(
                matches!(out[0].response, Response::InvalidAttr { .. }),
                "expected invalid attr for {json}"
            );
        }
        assert_eq!(r.bank.by_ordinal(2).unwrap().pin(), Some(26));
    }

    #[test]
    fn test_invalid_device_and_method() {
        let mut r = rig();

        let out = send(&mut r, r#"{"dev":"BOGUS","req":"GET"}"#);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].target, Target::Caller);
        assert_eq!(
            out[0].response,
            Response::InvalidRequest { req: Some("GET") }
        );

        // Absent request field echoes as the "null" details downstream
        let out = send(&mut r, r#"{"dev":"SERVO"}"#);
        assert_eq!(out[0].response, Response::InvalidRequest { req: None });

        let out = send(&mut r, r#"{"dev":"SERVO","req":"DELETE"}"#);
        assert_eq!(
            out[0].response,
            Response::InvalidRequest { req: Some("DELETE") }
        );
    }

    #[test]
    fn test_servo_set_without_value_is_invalid_request() {
        let mut r = rig();
        let out = send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"POSITION"}"#);
        assert_eq!(out[0].response, Response::InvalidRequest { req: Some("SET") });
    }

    #[test]
    fn test_servo_unknown_attr() {
        let mut r = rig();

        let out = send(&mut r, r#"{"dev":"SERVO","req":"GET","attr":"WARP"}"#);
        assert_eq!(
            out[0].response,
            Response::InvalidAttr {
                dev: Some("SERVO"),
                req: Some("GET"),
                attr: Some("WARP"),
            }
        );

        let out = send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"WARP","val":1}"#);
        assert!(matches!(out[0].response, Response::InvalidAttr { .. }));
    }

    #[test]
    fn test_servo_wrong_value_shape() {
        let mut r = rig();

        // String where an integer is expected
        let out = send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"POSITION","val":"far"}"#);
        assert!(matches!(out[0].response, Response::InvalidAttr { .. }));

        // Integer where the motion mode string is expected
        let out = send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"MOTION","val":3}"#);
        assert!(matches!(out[0].response, Response::InvalidAttr { .. }));

        // Negative value for an unsigned attribute
        let out = send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"TIME_DELAY","val":-5}"#);
        assert!(matches!(out[0].response, Response::InvalidAttr { .. }));
    }

    #[test]
    fn test_pwm_bounds_route_to_matching_setters() {
        let mut r = rig();

        send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"MIN_PWM","val":600}"#);
        send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"MAX_PWM","val":2400}"#);
        assert_eq!(r.servo.pwm_min(), 600);
        assert_eq!(r.servo.pwm_max(), 2400);

        // A rejected bound changes nothing and stays silent on the wire
        let out = send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"MIN_PWM","val":3000}"#);
        assert!(out.is_empty());
        assert_eq!(r.servo.pwm_min(), 600);
    }

    #[test]
    fn test_motion_set_and_coercion() {
        let mut r = rig();

        send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"MOTION","val":"SWEEP"}"#);
        assert_eq!(r.servo.motion(), Motion::Sweep);

        send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"ACTUATE","val":true}"#);
        assert!(r.servo.is_active(&r.timers));
        // Unknown mode string coerces to a disable
        send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"MOTION","val":"WOBBLE"}"#);
        assert!(!r.servo.is_active(&r.timers));
        assert_eq!(r.servo.motion(), Motion::Sweep);
    }

    #[test]
    fn test_actuate_toggles_motion() {
        let mut r = rig();

        send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"ACTUATE","val":true}"#);
        assert!(r.servo.is_active(&r.timers));

        let out = send(&mut r, r#"{"dev":"SERVO","req":"GET","attr":"ACTUATE"}"#);
        assert_eq!(
            out[0].response,
            Response::get("SERVO", "ACTUATE", Value::Bool(true))
        );

        send(&mut r, r#"{"dev":"SERVO","req":"SET","attr":"ACTUATE","val":false}"#);
        assert!(!r.servo.is_active(&r.timers));
    }

    #[test]
    fn test_sample_rate_reconfigure() {
        let mut r = rig();
        send(&mut r, r#"{"dev":"FLEX","req":"SET","attr":"START"}"#);
        assert!(r.bank.channels().iter().all(|ch| ch.is_active(&r.timers)));

        send(&mut r, r#"{"dev":"FLEX","req":"SET","attr":"SAMPLE_RATE","val":25000}"#);
        assert_eq!(r.bank.sampling_interval(), 25_000);
        // Every previously active channel is running again at the new rate
        assert!(r.bank.channels().iter().all(|ch| ch.is_active(&r.timers)));

        let out = send(&mut r, r#"{"dev":"FLEX","req":"GET","attr":"SAMPLE_RATE"}"#);
        assert_eq!(
            out[0].response,
            Response::get("FLEX", "SAMPLE_RATE", Value::Int(25_000))
        );
    }

    #[test]
    fn test_sample_rate_set_requires_integer() {
        let mut r = rig();
        for json in [
            r#"{"dev":"FLEX","req":"SET","attr":"SAMPLE_RATE"}"#,
            r#"{"dev":"FLEX","req":"SET","attr":"SAMPLE_RATE","val":"fast"}"#,
        ] {
            let out = send(&mut r, json);
            assert!(matches!(out[0].response, Response::InvalidAttr { .. }));
        }
        assert_eq!(r.bank.sampling_interval(), 100_000);
    }

    #[test]
    fn test_start_stop_all_with_ack() {
        let mut r = rig();

        let out = send(&mut r, r#"{"dev":"FLEX","req":"SET","attr":"START"}"#);
        assert!(matches!(out[0].response, Response::Set { ok: true, .. }));
        assert!(r.bank.channels().iter().all(|ch| ch.is_active(&r.timers)));

        let out = send(&mut r, r#"{"dev":"FLEX","req":"SET","attr":"STOP"}"#);
        assert!(matches!(out[0].response, Response::Set { ok: true, .. }));
        assert!(r.bank.channels().iter().all(|ch| !ch.is_active(&r.timers)));
    }

    #[test]
    fn test_flex_unknown_attr() {
        let mut r = rig();
        let out = send(&mut r, r#"{"dev":"FLEX","req":"GET","attr":"RATE"}"#);
        assert!(matches!(out[0].response, Response::InvalidAttr { .. }));

        let out = send(&mut r, r#"{"dev":"FLEX_2","req":"GET","attr":"READ"}"#);
        assert!(matches!(out[0].response, Response::InvalidAttr { .. }));
    }

    #[test]
    fn test_connect_snapshot_contents() {
        let r = rig();
        let out = connect_snapshot(&r.servo, &r.bank);

        assert_eq!(out.len(), 15);
        assert!(out.iter().all(|o| o.target == Target::All));
        assert_eq!(
            out[0].response,
            Response::get("SERVO", "ANGLE_STEP", Value::Int(1))
        );
        assert!(out.iter().any(|o| o.response
            == Response::get("FLEX", "SAMPLE_RATE", Value::Int(100_000))));
        assert!(out.iter().any(|o| o.response
            == Response::get("FLEX_5", "PIN", Value::Int(29))));
    }

    #[test]
    fn test_snapshot_shows_unbound_sentinel() {
        let mut r = rig();
        send(&mut r, r#"{"dev":"FLEX_2","req":"SET","attr":"PIN","val":false}"#);

        let out = connect_snapshot(&r.servo, &r.bank);
        assert!(out.iter().any(|o| o.response
            == Response::get("FLEX_2", "PIN", Value::Bool(false))));
    }

    #[test]
    fn test_notification_helpers() {
        let reading = sensor_reading("FLEX_4", 2048);
        assert_eq!(reading.target, Target::All);
        assert_eq!(
            reading.response,
            Response::get("FLEX_4", "READ", Value::Int(2048))
        );

        let pos = servo_position(135);
        assert_eq!(pos.response, Response::get("SERVO", "POSITION", Value::Int(135)));
    }
}

//! Cooperative control loop
//!
//! Owns both devices and the dispatcher. One iteration drains session
//! events and queued command lines, then polls the servo and every sensor
//! channel, forwarding the resulting notifications to the outbound
//! channel. All hardware access happens here; the timer interrupts only
//! raise flags.

use defmt::*;
use embassy_time::{Duration, Ticker};
use heapless::String;

use dactyl_core::bridge::{connect_snapshot, dispatch, sensor_reading, servo_position, Outbound};
use dactyl_core::motion::MotionController;
use dactyl_core::sensor::{Finger, SensorBank, SensorChannel, ADC_PIN_MIN};
use dactyl_core::traits::TickFlag;
use dactyl_protocol::Request;

use crate::board::{BoardAdc, BoardPwm};
use crate::channels::{
    OutboundFrame, SessionEvent, COMMAND_CHANNEL, LINE_LEN, OUTBOUND_CHANNEL, SESSION_CHANNEL,
};
use crate::timers::{HardwareTimers, TIMER_TABLE};

/// GPIO driving the servo signal
const SERVO_PIN: u8 = 16;

/// Full travel of the tendon servo in degrees
const SERVO_MAX_ANGLE: i32 = 270;

/// Loop pacing: flags are drained once per millisecond
const LOOP_INTERVAL_MS: u64 = 1;

static SERVO_TICK: TickFlag = TickFlag::new();
static SERVO_SETTLE: TickFlag = TickFlag::new();
static FLEX_READY: [TickFlag; 4] = [
    TickFlag::new(),
    TickFlag::new(),
    TickFlag::new(),
    TickFlag::new(),
];

/// Serialize one response and queue it for the transport
fn forward(outbound: &Outbound<'_>) {
    let mut buf = [0u8; LINE_LEN];
    let line = match outbound.response.encode(&mut buf) {
        Ok(n) => match core::str::from_utf8(&buf[..n]) {
            Ok(s) => {
                let mut line: String<LINE_LEN> = String::new();
                let _ = line.push_str(s);
                line
            }
            Err(_) => return,
        },
        Err(e) => {
            warn!("Response encode failed: {:?}", e);
            return;
        }
    };
    let frame = OutboundFrame {
        target: outbound.target,
        line,
    };
    if OUTBOUND_CHANNEL.try_send(frame).is_err() {
        warn!("Outbound channel full, dropping response");
    }
}

/// Control task - the firmware's cooperative consumer loop
#[embassy_executor::task]
pub async fn control_task(mut adc: BoardAdc, mut pwm: BoardPwm) {
    info!("Control task started");

    let mut timers = HardwareTimers::new(&TIMER_TABLE);

    let mut servo = MotionController::new(SERVO_PIN, SERVO_MAX_ANGLE, &SERVO_TICK, &SERVO_SETTLE);
    if let Err(e) = servo.setup(&mut timers) {
        // Without its timers the actuator cannot run at all
        error!("Servo timer setup failed ({:?}), abandoning startup", e);
        return;
    }

    let mut bank = SensorBank::new([
        SensorChannel::new("FLEX_2", Finger::Index, &FLEX_READY[0]),
        SensorChannel::new("FLEX_3", Finger::Middle, &FLEX_READY[1]),
        SensorChannel::new("FLEX_4", Finger::Ring, &FLEX_READY[2]),
        SensorChannel::new("FLEX_5", Finger::Pinky, &FLEX_READY[3]),
    ]);
    if !bank.setup_all(&mut timers) {
        warn!("One or more sensor timers failed to set up");
    }
    for ordinal in 2..=5u8 {
        let pin = ADC_PIN_MIN + (ordinal - 2);
        if bank.set_pin(&mut timers, ordinal, Some(pin)).is_err() {
            warn!("Failed to bind sensor {} to pin {}", ordinal, pin);
        }
    }

    info!("Devices initialized, entering control loop");

    let mut ticker = Ticker::every(Duration::from_millis(LOOP_INTERVAL_MS));
    loop {
        while let Ok(event) = SESSION_CHANNEL.try_receive() {
            match event {
                SessionEvent::Connected => {
                    info!("Client connected, sending state snapshot");
                    for outbound in connect_snapshot(&servo, &bank).iter() {
                        forward(outbound);
                    }
                }
                SessionEvent::Disconnected => {
                    info!("Last client disconnected, stopping devices");
                    bank.set_all_active(&mut timers, false);
                    servo.disable_motion(&mut timers);
                }
            }
        }

        while let Ok(line) = COMMAND_CHANNEL.try_receive() {
            match Request::from_json(line.as_bytes()) {
                Some(request) => {
                    debug!("Request: {}", line.as_str());
                    let responses =
                        dispatch(&request, &mut servo, &mut bank, &mut timers, &mut pwm);
                    for outbound in responses.iter() {
                        forward(outbound);
                    }
                }
                None => warn!("Failed to parse request: {}", line.as_str()),
            }
        }

        if let Some(pos) = servo.poll(&mut timers, &mut pwm) {
            forward(&servo_position(pos));
        }
        for channel in bank.channels_mut() {
            if let Some(reading) = channel.poll(&mut adc) {
                forward(&sensor_reading(channel.name(), reading));
            }
        }

        ticker.next().await;
    }
}

//! Dactyl - Hand Exoskeleton Firmware
//!
//! Main firmware binary for RP2040-based controller boards. Wires the
//! board peripherals (ADC, PWM, UART) to the board-agnostic device core
//! and spawns the Embassy tasks:
//!
//! - `timer_engine`: raises the per-timer fire flags at their deadlines
//! - `control_task`: the cooperative consumer loop owning both devices
//! - `link_rx_task`/`link_tx_task`: the serial command link

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Pull;
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::board::{servo_pwm_config, BoardAdc, BoardPwm};
use crate::timers::TIMER_TABLE;

mod board;
mod channels;
mod tasks;
mod timers;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Dactyl firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // ADC channels for the four flex sensors (GPIO 26-29)
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let adc_channels = [
        Channel::new_pin(p.PIN_26, Pull::None),
        Channel::new_pin(p.PIN_27, Pull::None),
        Channel::new_pin(p.PIN_28, Pull::None),
        Channel::new_pin(p.PIN_29, Pull::None),
    ];
    let board_adc = BoardAdc::new(adc, adc_channels);

    // Servo PWM on GPIO16 (slice 0, channel A), 50 Hz frame
    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, servo_pwm_config());
    let board_pwm = BoardPwm::new(pwm);

    // Buffered UART for the command link
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("Board peripherals configured");

    spawner.spawn(timers::timer_engine(&TIMER_TABLE)).unwrap();
    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::control_task(board_adc, board_pwm)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

//! Serial command link tasks
//!
//! A line-oriented bridge carrying the attribute protocol over a buffered
//! UART: one JSON document per line in each direction. A network
//! transport (the Wi-Fi/WebSocket bridge) replaces these tasks on builds
//! that carry one; the channel interface is identical.
//!
//! The serial peer counts as attached once the link is up, so a
//! `Connected` session event is emitted at startup to trigger the state
//! snapshot.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use crate::channels::{
    CommandLine, SessionEvent, COMMAND_CHANNEL, LINE_LEN, OUTBOUND_CHANNEL, SESSION_CHANNEL,
};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - accumulates lines and queues them as commands
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    if SESSION_CHANNEL.try_send(SessionEvent::Connected).is_err() {
        warn!("Session channel full at startup");
    }

    let mut buf = [0u8; RX_BUF_SIZE];
    let mut line: CommandLine = CommandLine::new();

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    match byte {
                        b'\n' | b'\r' => {
                            if !line.is_empty() {
                                if COMMAND_CHANNEL.try_send(line.clone()).is_err() {
                                    warn!("Command channel full, dropping request");
                                }
                                line.clear();
                            }
                        }
                        _ => {
                            if line.push(byte as char).is_err() {
                                // Oversized line cannot be a valid request
                                warn!("Command line exceeds {} bytes, dropping", LINE_LEN);
                                line.clear();
                            }
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Link TX task - writes outbound responses, one per line
///
/// The single serial peer is both "the caller" and "everyone", so the
/// delivery target does not change the route here; a multi-client
/// transport uses it to pick recipients.
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let frame = OUTBOUND_CHANNEL.receive().await;
        if tx.write_all(frame.line.as_bytes()).await.is_err() {
            warn!("UART write error");
            continue;
        }
        if tx.write_all(b"\n").await.is_err() {
            warn!("UART write error");
        }
    }
}

//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy
//! tasks. The transport side (link tasks, or a future network bridge)
//! feeds raw command lines and session events in; the control task pushes
//! serialized responses out.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::String;

use dactyl_protocol::Target;

/// Maximum length of one command or response line
pub const LINE_LEN: usize = 200;

/// One raw inbound command line (JSON document)
pub type CommandLine = String<LINE_LEN>;

/// One serialized response plus its delivery target
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    pub target: Target,
    pub line: String<LINE_LEN>,
}

/// Transport session events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEvent {
    /// A client attached; it gets the connection-time state snapshot
    Connected,
    /// The last client detached; sampling and motion stop
    Disconnected,
}

/// Channel capacity for queued command lines
const COMMAND_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outbound responses
const OUTBOUND_CHANNEL_SIZE: usize = 16;

/// Channel capacity for session events
const SESSION_CHANNEL_SIZE: usize = 4;

/// Raw command lines from the transport (FIFO, single consumer)
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, CommandLine, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Serialized responses for the transport to deliver
pub static OUTBOUND_CHANNEL: Channel<CriticalSectionRawMutex, OutboundFrame, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Client attach/detach notifications
pub static SESSION_CHANNEL: Channel<CriticalSectionRawMutex, SessionEvent, SESSION_CHANNEL_SIZE> =
    Channel::new();

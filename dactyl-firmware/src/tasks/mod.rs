//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod control;
pub mod link;

pub use control::control_task;
pub use link::{link_rx_task, link_tx_task};

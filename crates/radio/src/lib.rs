//! radio medium observation and the transmission log

use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod transmission;
pub mod logger;
pub mod medium;
pub mod view;

pub use transmission::{LogReader, RadioEndpoint, TransmissionLog, TransmissionRecord};
pub use logger::RadioLogger;
pub use medium::{PacketRadio, Radio, RadioConnection, Subscription, TickObservers, TickReport};
pub use view::{Column, LogTable, MoteHighlighter};

/// Simulation time in milliseconds, owned by the simulation engine.
pub type SimTime = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RadioId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MoteId(pub u32);

impl fmt::Display for RadioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "radio {}", self.0)
    }
}

impl fmt::Display for MoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mote {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("record index {index} out of range for log of {len} records")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("destination {index} out of range for connection with {len} destinations")]
    DestinationOutOfRange { index: usize, len: usize },
}

//! packet classification and decoding for the radio logger

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod accessor;
pub mod aodv;
pub mod classify;
pub mod packet;

pub use accessor::ByteAccessor;
pub use aodv::{RouteReply, RouteRequest};
pub use classify::{classify, describe};
pub use packet::{DecodedPacket, PacketKind, UnknownPacket};

/// Rendering used when a transmission carried no packet-level data.
pub const UNKNOWN_DATA: &str = "[unknown data]";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("read of {len} bytes at offset {offset} exceeds buffer of {available} bytes")]
    OutOfRange {
        offset: usize,
        len: usize,
        available: usize,
    },
}

/// Short and detailed human readable forms of a decoded packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendering {
    pub summary: String,
    pub details: String,
}

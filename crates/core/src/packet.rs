use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::{Rendering, RouteReply, RouteRequest};

/// Result of classifying a raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodedPacket {
    RouteRequest(RouteRequest),
    RouteReply(RouteReply),
    Unknown(UnknownPacket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PacketKind {
    RouteRequest,
    RouteReply,
    Unknown,
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketKind::RouteRequest => write!(f, "RREQ"),
            PacketKind::RouteReply => write!(f, "RREP"),
            PacketKind::Unknown => write!(f, "DATA"),
        }
    }
}

impl DecodedPacket {
    pub fn kind(&self) -> PacketKind {
        match self {
            DecodedPacket::RouteRequest(_) => PacketKind::RouteRequest,
            DecodedPacket::RouteReply(_) => PacketKind::RouteReply,
            DecodedPacket::Unknown(_) => PacketKind::Unknown,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            DecodedPacket::RouteRequest(rreq) => rreq.summary(),
            DecodedPacket::RouteReply(rrep) => rrep.summary(),
            DecodedPacket::Unknown(data) => data.summary(),
        }
    }

    pub fn details(&self) -> String {
        match self {
            DecodedPacket::RouteRequest(rreq) => rreq.details(),
            DecodedPacket::RouteReply(rrep) => rrep.details(),
            DecodedPacket::Unknown(data) => data.details(),
        }
    }

    pub fn render(&self) -> Rendering {
        Rendering {
            summary: self.summary(),
            details: self.details(),
        }
    }
}

/// Payload that matched neither AODV header; keeps the full original bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownPacket {
    data: Vec<u8>,
}

impl UnknownPacket {
    /// Bytes per line in the hex section of [`Self::details`].
    pub const HEX_BYTES_PER_LINE: usize = 4;

    pub fn new(data: &[u8]) -> Self {
        Self { data: data.to_vec() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn summary(&self) -> String {
        format!("Data packet, size {}", self.data.len())
    }

    /// Hex dump followed by a blank line and the bytes as raw characters.
    ///
    /// The character section maps every byte to the code point of the same
    /// value without any validation, so control bytes come through as
    /// control characters.
    pub fn details(&self) -> String {
        let mut out = String::with_capacity(self.data.len() * 6 + 2);
        for (i, b) in self.data.iter().enumerate() {
            let _ = write!(out, "0x{b:02x} ");
            if (i + 1) % Self::HEX_BYTES_PER_LINE == 0 {
                out.push('\n');
            }
        }
        out.push_str("\n\n");
        out.extend(self.data.iter().map(|&b| char::from(b)));
        out
    }
}

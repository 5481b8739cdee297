//! AODV route request and route reply headers.
//!
//! Both headers are fixed size and read at fixed offsets, multi-byte fields
//! big-endian:
//!
//! ```text
//! RREQ (24 bytes)                      RREP (20 bytes)
//! 0      type = 1                      0      type = 2
//! 1      flags                         1      flags
//! 2      reserved                      2      prefix
//! 3      hop_count                     3      hop_count
//! 4..8   id                            4..8   dest_addr
//! 8..12  dest_addr                     8..12  dest_seqno
//! 12..16 dest_seqno                    12..16 orig_addr
//! 16..20 orig_addr                     16..20 lifetime
//! 20..24 orig_seqno
//! ```

use std::fmt::Write;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::{ByteAccessor, DecodeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub kind: u8,
    pub flags: u8,
    pub reserved: u8,
    pub hop_count: u8,
    pub id: u32,
    pub dest_addr: Ipv4Addr,
    pub dest_seqno: u32,
    pub orig_addr: Ipv4Addr,
    pub orig_seqno: u32,
}

impl RouteRequest {
    pub const SIZE: usize = 24;
    pub const TYPE: u8 = 1;

    /// Decode the header from the first [`Self::SIZE`] bytes of `header`.
    pub fn parse(header: &[u8]) -> Result<Self, DecodeError> {
        let acc = ByteAccessor::new(header);
        Ok(Self {
            kind: acc.u8_at(0)?,
            flags: acc.u8_at(1)?,
            reserved: acc.u8_at(2)?,
            hop_count: acc.u8_at(3)?,
            id: acc.u32_at(4)?,
            dest_addr: acc.addr_at(8)?,
            dest_seqno: acc.u32_at(12)?,
            orig_addr: acc.addr_at(16)?,
            orig_seqno: acc.u32_at(20)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0] = self.kind;
        out[1] = self.flags;
        out[2] = self.reserved;
        out[3] = self.hop_count;
        out[4..8].copy_from_slice(&self.id.to_be_bytes());
        out[8..12].copy_from_slice(&self.dest_addr.octets());
        out[12..16].copy_from_slice(&self.dest_seqno.to_be_bytes());
        out[16..20].copy_from_slice(&self.orig_addr.octets());
        out[20..24].copy_from_slice(&self.orig_seqno.to_be_bytes());
        out
    }

    pub fn summary(&self) -> String {
        format!("AODV RREQ to {} from {}", self.dest_addr, self.orig_addr)
    }

    pub fn details(&self) -> String {
        field_listing(
            "AODV RREQ",
            &[
                ("type", self.kind.to_string()),
                ("flags", self.flags.to_string()),
                ("reserved", self.reserved.to_string()),
                ("hop_count", self.hop_count.to_string()),
                ("id", self.id.to_string()),
                ("dest_addr", self.dest_addr.to_string()),
                ("dest_seqno", self.dest_seqno.to_string()),
                ("orig_addr", self.orig_addr.to_string()),
                ("orig_seqno", self.orig_seqno.to_string()),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteReply {
    pub kind: u8,
    pub flags: u8,
    pub prefix: u8,
    pub hop_count: u8,
    pub dest_addr: Ipv4Addr,
    pub dest_seqno: u32,
    pub orig_addr: Ipv4Addr,
    pub lifetime: u32,
}

impl RouteReply {
    pub const SIZE: usize = 20;
    pub const TYPE: u8 = 2;

    /// Decode the header from the first [`Self::SIZE`] bytes of `header`.
    pub fn parse(header: &[u8]) -> Result<Self, DecodeError> {
        let acc = ByteAccessor::new(header);
        Ok(Self {
            kind: acc.u8_at(0)?,
            flags: acc.u8_at(1)?,
            prefix: acc.u8_at(2)?,
            hop_count: acc.u8_at(3)?,
            dest_addr: acc.addr_at(4)?,
            dest_seqno: acc.u32_at(8)?,
            orig_addr: acc.addr_at(12)?,
            lifetime: acc.u32_at(16)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0] = self.kind;
        out[1] = self.flags;
        out[2] = self.prefix;
        out[3] = self.hop_count;
        out[4..8].copy_from_slice(&self.dest_addr.octets());
        out[8..12].copy_from_slice(&self.dest_seqno.to_be_bytes());
        out[12..16].copy_from_slice(&self.orig_addr.octets());
        out[16..20].copy_from_slice(&self.lifetime.to_be_bytes());
        out
    }

    pub fn summary(&self) -> String {
        format!("AODV RREP to {} from {}", self.dest_addr, self.orig_addr)
    }

    pub fn details(&self) -> String {
        field_listing(
            "AODV RREP",
            &[
                ("type", self.kind.to_string()),
                ("flags", self.flags.to_string()),
                ("prefix", self.prefix.to_string()),
                ("hop_count", self.hop_count.to_string()),
                ("dest_addr", self.dest_addr.to_string()),
                ("dest_seqno", self.dest_seqno.to_string()),
                ("orig_addr", self.orig_addr.to_string()),
                ("lifetime", self.lifetime.to_string()),
            ],
        )
    }
}

fn field_listing(label: &str, fields: &[(&str, String)]) -> String {
    let mut out = String::new();
    for (i, (name, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{label} {name}: {value}");
    }
    out
}

//! Payload generation for simulated motes.

use std::net::Ipv4Addr;

use bytes::{BufMut, Bytes, BytesMut};
use rand::Rng;
use radio_logger_core::{RouteReply, RouteRequest};

/// First two bytes of the generated link-layer envelope.
const ENVELOPE_FRAME_CONTROL: [u8; 2] = [0x41, 0x88];
const ENVELOPE_FILL: u8 = 0xab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traffic {
    RouteRequest,
    RouteReply,
    Data,
}

impl Traffic {
    pub fn pick<R: Rng>(rng: &mut R, rreq_share: f64, rrep_share: f64) -> Self {
        let r: f64 = rng.random();
        if r < rreq_share {
            Traffic::RouteRequest
        } else if r < rreq_share + rrep_share {
            Traffic::RouteReply
        } else {
            Traffic::Data
        }
    }
}

/// Address of the mote at `index`: 10.0.0.1 for index 0 and so on.
pub fn mote_addr(index: usize) -> Ipv4Addr {
    Ipv4Addr::from(0x0a00_0001u32.wrapping_add(index as u32))
}

pub fn route_request<R: Rng>(rng: &mut R, id: u32, orig: usize, dest: usize) -> RouteRequest {
    RouteRequest {
        kind: RouteRequest::TYPE,
        flags: 0,
        reserved: 0,
        hop_count: rng.random_range(0..4),
        id,
        dest_addr: mote_addr(dest),
        dest_seqno: rng.random_range(0..1000),
        orig_addr: mote_addr(orig),
        orig_seqno: id,
    }
}

pub fn route_reply<R: Rng>(rng: &mut R, orig: usize, dest: usize) -> RouteReply {
    RouteReply {
        kind: RouteReply::TYPE,
        flags: 0,
        prefix: 0,
        hop_count: rng.random_range(0..4),
        dest_addr: mote_addr(dest),
        dest_seqno: rng.random_range(0..1000),
        orig_addr: mote_addr(orig),
        lifetime: rng.random_range(1..=30) * 1000,
    }
}

/// Printable application data. Never starts a trailing AODV window with a
/// type byte, so it always classifies as opaque data.
pub fn data_payload(source: usize, seq: u32) -> Vec<u8> {
    format!("hello from mote {} #{}", source, seq).into_bytes()
}

/// Generate one payload of the given kind, behind `envelope_len` bytes of
/// link-layer header.
pub fn build_payload<R: Rng>(
    rng: &mut R,
    traffic: Traffic,
    seq: u32,
    source: usize,
    peer: usize,
    envelope_len: usize,
) -> Bytes {
    let body: Vec<u8> = match traffic {
        Traffic::RouteRequest => route_request(rng, seq, source, peer).to_bytes().to_vec(),
        Traffic::RouteReply => route_reply(rng, source, peer).to_bytes().to_vec(),
        Traffic::Data => data_payload(source, seq),
    };

    let mut buf = BytesMut::with_capacity(envelope_len + body.len());
    buf.put_slice(&ENVELOPE_FRAME_CONTROL[..envelope_len.min(ENVELOPE_FRAME_CONTROL.len())]);
    buf.put_bytes(ENVELOPE_FILL, envelope_len.saturating_sub(ENVELOPE_FRAME_CONTROL.len()));
    buf.put_slice(&body);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use radio_logger_core::{classify, PacketKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mote_addresses() {
        assert_eq!(mote_addr(0).to_string(), "10.0.0.1");
        assert_eq!(mote_addr(255).to_string(), "10.0.1.0");
    }

    #[test]
    fn test_generated_payloads_classify_as_generated() {
        let mut rng = StdRng::seed_from_u64(7);
        for envelope_len in [0, 1, 2, 4, 9, 30] {
            for (traffic, kind) in [
                (Traffic::RouteRequest, PacketKind::RouteRequest),
                (Traffic::RouteReply, PacketKind::RouteReply),
                (Traffic::Data, PacketKind::Unknown),
            ] {
                let payload = build_payload(&mut rng, traffic, 12, 3, 4, envelope_len);
                assert_eq!(
                    classify(&payload).kind(),
                    kind,
                    "{:?} behind {} envelope bytes",
                    traffic,
                    envelope_len
                );
            }
        }
    }

    #[test]
    fn test_envelope_layout() {
        let mut rng = StdRng::seed_from_u64(1);
        let payload = build_payload(&mut rng, Traffic::Data, 0, 0, 1, 5);
        assert_eq!(&payload[..5], &[0x41, 0x88, 0xab, 0xab, 0xab]);
        assert_eq!(&payload[5..], b"hello from mote 0 #0");
    }

    #[test]
    fn test_rreq_fields() {
        let mut rng = StdRng::seed_from_u64(3);
        let rreq = route_request(&mut rng, 77, 1, 5);
        assert_eq!(rreq.summary(), "AODV RREQ to 10.0.0.6 from 10.0.0.2");
        assert_eq!(rreq.orig_seqno, 77);
        assert!(rreq.hop_count < 4);
    }
}

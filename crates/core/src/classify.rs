//! Payload classification.
//!
//! AODV headers are matched against the *trailing* bytes of a payload, so a
//! header that sits behind any lower-layer envelope is still recognised.
//! The 24-byte route request window is always tried before the 20-byte route
//! reply window.

use log::{error, trace};

use crate::{DecodedPacket, RouteReply, RouteRequest, UnknownPacket, UNKNOWN_DATA};

pub fn classify(payload: &[u8]) -> DecodedPacket {
    if let Some(window) = trailing(payload, RouteRequest::SIZE) {
        if window[0] == RouteRequest::TYPE {
            match RouteRequest::parse(window) {
                Ok(rreq) => {
                    trace!("{} byte payload classified as RREQ", payload.len());
                    return DecodedPacket::RouteRequest(rreq);
                }
                Err(e) => error!("RREQ decoder rejected a length-checked window: {}", e),
            }
        }
    }

    if let Some(window) = trailing(payload, RouteReply::SIZE) {
        if window[0] == RouteReply::TYPE {
            match RouteReply::parse(window) {
                Ok(rrep) => {
                    trace!("{} byte payload classified as RREP", payload.len());
                    return DecodedPacket::RouteReply(rrep);
                }
                Err(e) => error!("RREP decoder rejected a length-checked window: {}", e),
            }
        }
    }

    trace!("{} byte payload left unclassified", payload.len());
    DecodedPacket::Unknown(UnknownPacket::new(payload))
}

/// Short rendering of an optional payload.
///
/// An absent payload never reaches the classifier.
pub fn describe(payload: Option<&[u8]>) -> String {
    match payload {
        Some(data) => classify(data).summary(),
        None => UNKNOWN_DATA.to_string(),
    }
}

fn trailing(payload: &[u8], size: usize) -> Option<&[u8]> {
    let start = payload.len().checked_sub(size)?;
    Some(&payload[start..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PacketKind;

    fn rreq_header() -> [u8; 24] {
        [1, 0, 0, 3, 0, 0, 0, 42, 10, 0, 0, 1, 0, 0, 0, 7, 10, 0, 0, 2, 0, 0, 0, 9]
    }

    fn rrep_header() -> [u8; 20] {
        [2, 0, 0, 1, 10, 0, 0, 5, 0, 0, 0, 11, 10, 0, 0, 6, 0, 0, 0, 60]
    }

    #[test]
    fn test_rreq_scenario() {
        let pkt = classify(&rreq_header());
        let DecodedPacket::RouteRequest(rreq) = &pkt else {
            panic!("expected RREQ, got {:?}", pkt);
        };
        assert_eq!(rreq.hop_count, 3);
        assert_eq!(rreq.id, 42);
        assert_eq!(rreq.dest_addr.to_string(), "10.0.0.1");
        assert_eq!(rreq.dest_seqno, 7);
        assert_eq!(rreq.orig_addr.to_string(), "10.0.0.2");
        assert_eq!(rreq.orig_seqno, 9);
        assert_eq!(pkt.summary(), "AODV RREQ to 10.0.0.1 from 10.0.0.2");
    }

    #[test]
    fn test_rreq_behind_envelope() {
        for prefix_len in [1usize, 7, 40] {
            let mut payload = vec![0xaa; prefix_len];
            payload.extend_from_slice(&rreq_header());
            match classify(&payload) {
                DecodedPacket::RouteRequest(rreq) => {
                    assert_eq!(rreq, RouteRequest::parse(&rreq_header()).unwrap());
                }
                other => panic!("prefix {}: expected RREQ, got {:?}", prefix_len, other),
            }
        }
    }

    #[test]
    fn test_leading_header_is_not_recognised() {
        let mut payload = rreq_header().to_vec();
        payload.extend_from_slice(&[0u8; 8]);
        assert_eq!(classify(&payload).kind(), PacketKind::Unknown);
    }

    #[test]
    fn test_rrep_for_short_lengths() {
        for len in 20..24 {
            let mut payload = vec![0x01; len - RouteReply::SIZE];
            payload.extend_from_slice(&rrep_header());
            match classify(&payload) {
                DecodedPacket::RouteReply(rrep) => {
                    assert_eq!(rrep.hop_count, 1);
                    assert_eq!(rrep.dest_addr.to_string(), "10.0.0.5");
                    assert_eq!(rrep.dest_seqno, 11);
                    assert_eq!(rrep.orig_addr.to_string(), "10.0.0.6");
                    assert_eq!(rrep.lifetime, 60);
                }
                other => panic!("len {}: expected RREP, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_rrep_when_rreq_window_misses() {
        let mut payload = vec![9u8; 10];
        payload.extend_from_slice(&rrep_header());
        assert_eq!(payload[payload.len() - 24], 9);
        let pkt = classify(&payload);
        assert_eq!(pkt.kind(), PacketKind::RouteReply);
        assert_eq!(pkt.summary(), "AODV RREP to 10.0.0.5 from 10.0.0.6");
    }

    #[test]
    fn test_rreq_wins_over_rrep() {
        let mut payload = rreq_header();
        // trailing-20 window starts at offset 4
        payload[4] = RouteReply::TYPE;
        assert_eq!(classify(&payload).kind(), PacketKind::RouteRequest);
    }

    #[test]
    fn test_unknown_keeps_full_payload() {
        let mut payload = vec![7u8; 30];
        payload[29] = 0x42;
        match classify(&payload) {
            DecodedPacket::Unknown(data) => {
                assert_eq!(data.data(), payload.as_slice());
                assert_eq!(data.summary(), "Data packet, size 30");
            }
            other => panic!("expected unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_small_payloads_are_unknown() {
        for len in 0..20 {
            let payload = vec![RouteReply::TYPE; len];
            let pkt = classify(&payload);
            assert_eq!(pkt.kind(), PacketKind::Unknown, "len {}", len);
            assert_eq!(pkt.summary(), format!("Data packet, size {}", len));
        }
    }

    #[test]
    fn test_three_byte_scenario() {
        let pkt = classify(&[5, 6, 7]);
        assert_eq!(pkt.summary(), "Data packet, size 3");
        assert!(pkt.details().starts_with("0x05 0x06 0x07 "));
        assert!(pkt.details().ends_with("\u{5}\u{6}\u{7}"));
    }

    #[test]
    fn test_classification_is_repeatable() {
        let mut rrep_payload = vec![0u8; 3];
        rrep_payload.extend_from_slice(&rrep_header());
        let payloads: Vec<Vec<u8>> = vec![
            rreq_header().to_vec(),
            rrep_payload,
            vec![5, 6, 7],
            Vec::new(),
        ];
        for payload in payloads {
            let first = classify(&payload);
            let second = classify(&payload);
            assert_eq!(first, second);
            assert_eq!(first.details(), second.details());
        }
    }

    #[test]
    fn test_describe_absent_payload() {
        assert_eq!(describe(None), "[unknown data]");
        assert_eq!(describe(Some(&[5, 6, 7])), "Data packet, size 3");
        assert_eq!(
            describe(Some(&rreq_header())),
            "AODV RREQ to 10.0.0.1 from 10.0.0.2"
        );
    }
}

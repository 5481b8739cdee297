//! Append-only transmission log.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use bytes::Bytes;
use radio_logger_core::{classify, DecodedPacket, UNKNOWN_DATA};
use serde::{Deserialize, Serialize};

use crate::medium::{Radio, RadioConnection};
use crate::{LogError, MoteId, RadioId, SimTime};

/// Identity of one end of a connection, captured at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RadioEndpoint {
    pub radio: RadioId,
    pub mote: Option<MoteId>,
}

impl RadioEndpoint {
    pub fn of(radio: &dyn Radio) -> Self {
        Self {
            radio: radio.id(),
            mote: radio.mote(),
        }
    }

    pub fn label(&self) -> String {
        match self.mote {
            Some(mote) => mote.to_string(),
            None => "[standalone radio]".to_string(),
        }
    }
}

/// One observed connection.
///
/// Holds a snapshot of the connection instead of the connection itself so
/// the log never keeps radios or motes alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmissionRecord {
    timestamp: SimTime,
    source: RadioEndpoint,
    destinations: Vec<RadioEndpoint>,
    payload: Option<Bytes>,
}

impl TransmissionRecord {
    pub fn new(
        timestamp: SimTime,
        source: RadioEndpoint,
        destinations: Vec<RadioEndpoint>,
        payload: Option<Bytes>,
    ) -> Self {
        Self {
            timestamp,
            source,
            destinations,
            payload,
        }
    }

    /// Snapshot a connection; the payload is only captured when the
    /// source radio exposes packet-level data.
    pub fn capture(timestamp: SimTime, connection: &RadioConnection) -> Self {
        let source = connection.source();
        let payload = source
            .as_packet_radio()
            .and_then(|packet_radio| packet_radio.last_packet_transmitted());

        Self {
            timestamp,
            source: RadioEndpoint::of(source),
            destinations: connection
                .destinations()
                .iter()
                .map(|radio| RadioEndpoint::of(radio.as_ref()))
                .collect(),
            payload,
        }
    }

    pub fn timestamp(&self) -> SimTime {
        self.timestamp
    }

    pub fn source(&self) -> RadioEndpoint {
        self.source
    }

    pub fn destinations(&self) -> &[RadioEndpoint] {
        &self.destinations
    }

    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Classify the payload. Not cached; every call decodes again.
    pub fn decode(&self) -> Option<DecodedPacket> {
        self.payload().map(classify)
    }

    pub fn data_summary(&self) -> String {
        match self.decode() {
            Some(packet) => packet.summary(),
            None => UNKNOWN_DATA.to_string(),
        }
    }

    pub fn data_details(&self) -> Option<String> {
        self.decode().map(|packet| packet.details())
    }
}

#[derive(Debug, Default)]
pub struct TransmissionLog {
    records: Vec<TransmissionRecord>,
}

impl TransmissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: TransmissionRecord) {
        self.records.push(record);
    }

    pub fn get(&self, index: usize) -> Result<&TransmissionRecord, LogError> {
        self.records.get(index).ok_or(LogError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransmissionRecord> {
        self.records.iter()
    }
}

pub(crate) type SharedLog = Arc<RwLock<TransmissionLog>>;

/// Cloneable read-only handle to a log that is being appended to elsewhere.
#[derive(Debug, Clone)]
pub struct LogReader {
    log: SharedLog,
}

impl LogReader {
    pub(crate) fn new(log: SharedLog) -> Self {
        Self { log }
    }

    fn read(&self) -> RwLockReadGuard<'_, TransmissionLog> {
        self.log.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Result<TransmissionRecord, LogError> {
        self.read().get(index).cloned()
    }

    /// Copy of every record appended so far.
    pub fn snapshot(&self) -> Vec<TransmissionRecord> {
        self.read().iter().cloned().collect()
    }

    pub fn with_record<T>(
        &self,
        index: usize,
        f: impl FnOnce(&TransmissionRecord) -> T,
    ) -> Result<T, LogError> {
        self.read().get(index).map(f)
    }
}

impl From<TransmissionLog> for LogReader {
    fn from(log: TransmissionLog) -> Self {
        Self::new(Arc::new(RwLock::new(log)))
    }
}

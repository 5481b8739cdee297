//! Tick-driven ingestion of radio connections into a transmission log.

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info};

use crate::medium::{Subscription, TickObservers, TickReport};
use crate::transmission::{LogReader, SharedLog, TransmissionLog, TransmissionRecord};
use crate::{LogError, SimTime};

/// Listens to a radio medium and records every completed connection.
///
/// The logger owns its subscription; dropping the logger or calling
/// [`RadioLogger::detach`] stops ingestion.
pub struct RadioLogger {
    log: SharedLog,
    subscription: Subscription,
}

impl RadioLogger {
    /// Start a logging session on the given medium observers.
    pub fn attach(observers: &TickObservers) -> Self {
        let log: SharedLog = Arc::new(RwLock::new(TransmissionLog::new()));

        let sink = log.clone();
        let subscription = observers.subscribe(move |report| {
            ingest(&sink, report);
        });
        info!("Radio logger attached (subscription {})", subscription.id());

        Self { log, subscription }
    }

    pub fn reader(&self) -> LogReader {
        LogReader::new(self.log.clone())
    }

    pub fn len(&self) -> usize {
        self.reader().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reader().is_empty()
    }

    pub fn get(&self, index: usize) -> Result<TransmissionRecord, LogError> {
        self.reader().get(index)
    }

    /// Stop listening and keep the recorded session readable.
    pub fn detach(self) -> LogReader {
        let reader = self.reader();
        info!(
            "Radio logger detached (subscription {}) after {} records",
            self.subscription.id(),
            reader.len()
        );
        reader
    }
}

impl std::fmt::Debug for RadioLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadioLogger")
            .field("subscription", &self.subscription.id())
            .field("records", &self.len())
            .finish()
    }
}

fn ingest(log: &SharedLog, report: &TickReport<'_>) {
    let connections = match report.connections {
        Some(connections) if !connections.is_empty() => connections,
        _ => return,
    };

    let time: SimTime = report.time;
    let mut log = log.write().unwrap_or_else(PoisonError::into_inner);
    for connection in connections {
        log.append(TransmissionRecord::capture(time, connection));
    }
    debug!(
        "Logged {} connections at {} ms ({} total)",
        connections.len(),
        time,
        log.len()
    );
}

//! Logging sessions over the simulated medium

use std::collections::BTreeMap;
use std::time::Duration;

use indicatif::ProgressBar;
use log::info;
use radio_logger_core::PacketKind;
use radio_logger_radio::{LogReader, RadioLogger};
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::time::{interval, MissedTickBehavior};

use crate::{MediumConfig, MediumStats, SimError, SimulatedMedium};

/// Per-kind record counts; records without payload are counted separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub by_kind: BTreeMap<PacketKind, usize>,
    pub no_payload: usize,
}

impl KindCounts {
    pub fn of(reader: &LogReader) -> Self {
        let mut counts = Self::default();
        for record in reader.snapshot() {
            match record.decode() {
                Some(packet) => {
                    *counts.by_kind.entry(packet.kind()).or_default() += 1;
                }
                None => counts.no_payload += 1,
            }
        }
        counts
    }

    pub fn get(&self, kind: PacketKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.by_kind.values().sum::<usize>() + self.no_payload
    }
}

pub struct SessionReport {
    pub reader: LogReader,
    pub stats: MediumStats,
    pub counts: KindCounts,
}

impl SessionReport {
    /// Medium stats, per-kind counts and every record with its decoded
    /// rendering.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        let records: Vec<serde_json::Value> = self
            .reader
            .snapshot()
            .into_iter()
            .map(|record| {
                let decoded = record.decode().map(|packet| packet.render());
                serde_json::json!({ "record": record, "decoded": decoded })
            })
            .collect();

        Ok(serde_json::json!({
            "stats": serde_json::to_value(self.stats)?,
            "counts": serde_json::to_value(&self.counts)?,
            "records": records,
        }))
    }
}

/// Run `ticks` ticks of the medium with a logger attached.
///
/// With `pace` set, each tick waits for the next interval of that length.
/// A background task polls the log while the session runs and reports how
/// many records it can see.
pub async fn logging_session(
    config: MediumConfig,
    ticks: u64,
    pace: Option<Duration>,
    progress: Option<&ProgressBar>,
) -> Result<SessionReport, SimError> {
    let mut medium = SimulatedMedium::new(config)?;
    let logger = RadioLogger::attach(medium.observers());

    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let watcher = {
        let reader = logger.reader();
        tokio::spawn(async move {
            let mut poll = interval(Duration::from_millis(250));
            let mut last_seen = 0;
            loop {
                tokio::select! {
                    _ = poll.tick() => {
                        let seen = reader.len();
                        if seen != last_seen {
                            info!("Radio log holds {} records", seen);
                            last_seen = seen;
                        }
                    }
                    _ = &mut stop_rx => break,
                }
            }
            last_seen
        })
    };

    let mut pacer = pace.map(|period| {
        let mut pacer = interval(period);
        pacer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        pacer
    });

    for _ in 0..ticks {
        if let Some(pacer) = pacer.as_mut() {
            pacer.tick().await;
        }
        medium.tick();
        if let Some(progress) = progress {
            progress.inc(1);
        }
    }

    let _ = stop_tx.send(());
    let _ = watcher.await;

    let reader = logger.detach();
    let counts = KindCounts::of(&reader);
    info!(
        "Session finished at {} ms: {} records, {:?}",
        medium.time(),
        reader.len(),
        counts
    );

    Ok(SessionReport {
        reader,
        stats: medium.stats(),
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimulationPresets;

    #[tokio::test]
    async fn test_session_records_every_connection() {
        let config = MediumConfig {
            seed: Some(5),
            ..SimulationPresets::busy_network()
        };
        let report = logging_session(config, 40, None, None).await.unwrap();

        assert_eq!(report.stats.ticks, 40);
        assert_eq!(report.reader.len() as u64, report.stats.connections);
        assert_eq!(report.counts.total(), report.reader.len());
        assert!(report.counts.get(PacketKind::RouteRequest) > 0);
        assert!(report.counts.get(PacketKind::RouteReply) > 0);
    }

    #[tokio::test]
    async fn test_legacy_radios_leave_payloads_out() {
        let config = MediumConfig {
            seed: Some(11),
            packet_radio_share: 0.0,
            ..SimulationPresets::legacy_radios()
        };
        let report = logging_session(config, 30, None, None).await.unwrap();

        assert!(report.reader.len() > 0);
        assert_eq!(report.counts.no_payload, report.reader.len());
        assert!(report.counts.by_kind.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_session_timestamps() {
        let config = MediumConfig {
            seed: Some(2),
            tick: Duration::from_millis(20),
            ..SimulationPresets::quiet_network()
        };
        let report = logging_session(config, 10, Some(Duration::from_millis(5)), None)
            .await
            .unwrap();

        let records = report.reader.snapshot();
        assert!(records.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()));
        assert!(records.iter().all(|r| r.timestamp() % 20 == 0 && r.timestamp() <= 200));
    }

    #[tokio::test]
    async fn test_report_json_carries_stats_and_counts() {
        let config = MediumConfig {
            seed: Some(3),
            ..SimulationPresets::busy_network()
        };
        let report = logging_session(config, 20, None, None).await.unwrap();
        let json = report.to_json().unwrap();

        assert_eq!(json["stats"]["ticks"], 20);
        assert_eq!(json["stats"]["connections"], report.stats.connections);
        assert_eq!(json["counts"]["no_payload"], report.counts.no_payload as u64);
        assert_eq!(
            json["counts"]["by_kind"]["RouteRequest"],
            report.counts.get(PacketKind::RouteRequest) as u64
        );
        assert_eq!(json["records"].as_array().unwrap().len(), report.reader.len());
    }
}

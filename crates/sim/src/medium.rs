//! Tick-driven simulated radio medium

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};
use serde::Serialize;

use radio_logger_radio::{
    MoteId, PacketRadio, Radio, RadioConnection, RadioId, SimTime, TickObservers, TickReport,
};

use crate::traffic::{build_payload, Traffic};
use crate::{MediumConfig, SimError};

/// Radio installed on a simulated mote.
#[derive(Debug)]
pub struct SimRadio {
    id: RadioId,
    mote: MoteId,
    packet_capable: bool,
    last_packet: Mutex<Option<Bytes>>,
}

impl SimRadio {
    pub fn new(index: u32, packet_capable: bool) -> Self {
        Self {
            id: RadioId(index),
            mote: MoteId(index),
            packet_capable,
            last_packet: Mutex::new(None),
        }
    }

    pub fn is_packet_capable(&self) -> bool {
        self.packet_capable
    }

    /// Record `data` as this radio's most recent transmission.
    pub fn transmit(&self, data: Bytes) {
        *self.last_packet.lock().unwrap_or_else(PoisonError::into_inner) = Some(data);
    }
}

impl Radio for SimRadio {
    fn id(&self) -> RadioId {
        self.id
    }

    fn mote(&self) -> Option<MoteId> {
        Some(self.mote)
    }

    fn as_packet_radio(&self) -> Option<&dyn PacketRadio> {
        if self.packet_capable {
            Some(self as &dyn PacketRadio)
        } else {
            None
        }
    }
}

impl PacketRadio for SimRadio {
    fn last_packet_transmitted(&self) -> Option<Bytes> {
        self.last_packet
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MediumStats {
    pub ticks: u64,
    pub connections: u64,
    pub bytes_sent: u64,
}

/// Radio medium that completes a batch of connections on every tick and
/// reports it to its observers.
///
/// A radio's last transmitted packet is read when observers are notified,
/// so a radio transmitting twice within one tick is seen with its later
/// payload on both connections. Generated traffic uses each source at most
/// once per tick.
pub struct SimulatedMedium {
    config: MediumConfig,
    radios: Vec<Arc<SimRadio>>,
    observers: TickObservers,
    rng: StdRng,
    rate: Option<Poisson<f64>>,
    time: SimTime,
    sequence: u32,
    pending: Vec<RadioConnection>,
    stats: MediumStats,
}

impl SimulatedMedium {
    pub fn new(config: MediumConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let rate = if config.transmissions_per_tick > 0.0 {
            let poisson = Poisson::new(config.transmissions_per_tick)
                .map_err(|e| SimError::InvalidConfig(e.to_string()))?;
            Some(poisson)
        } else {
            None
        };

        let radios: Vec<Arc<SimRadio>> = (0..config.motes)
            .map(|i| {
                let packet_capable = rng.random_bool(config.packet_radio_share);
                Arc::new(SimRadio::new(i as u32, packet_capable))
            })
            .collect();

        info!(
            "Simulated medium with {} motes ({} packet radios), {:?} per tick",
            radios.len(),
            radios.iter().filter(|r| r.is_packet_capable()).count(),
            config.tick
        );

        Ok(Self {
            config,
            radios,
            observers: TickObservers::new(),
            rng,
            rate,
            time: 0,
            sequence: 0,
            pending: Vec::new(),
            stats: MediumStats::default(),
        })
    }

    /// Observer registry that receives every tick's connection batch.
    pub fn observers(&self) -> &TickObservers {
        &self.observers
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn radios(&self) -> &[Arc<SimRadio>] {
        &self.radios
    }

    pub fn stats(&self) -> MediumStats {
        self.stats
    }

    /// Queue a transmission from `source` to `destinations`, completed on
    /// the next tick.
    pub fn transmit(
        &mut self,
        source: usize,
        payload: Bytes,
        destinations: &[usize],
    ) -> Result<(), SimError> {
        if destinations.is_empty() {
            return Err(SimError::NoDestinations(source));
        }
        let radio = self.radio(source)?;
        let receivers = destinations
            .iter()
            .map(|&d| self.radio(d).map(|r| r as Arc<dyn Radio>))
            .collect::<Result<Vec<_>, _>>()?;

        trace!(
            "Radio {} transmits {} bytes to {} receivers",
            source,
            payload.len(),
            receivers.len()
        );
        self.stats.bytes_sent += payload.len() as u64;
        radio.transmit(payload);
        self.pending.push(RadioConnection::new(radio, receivers));
        Ok(())
    }

    /// Advance simulated time by one tick, generate random traffic, and
    /// notify observers of every connection completed in this tick.
    pub fn tick(&mut self) -> usize {
        self.generate_traffic();

        self.time += self.config.tick.as_millis() as SimTime;
        self.stats.ticks += 1;

        let completed = std::mem::take(&mut self.pending);
        self.stats.connections += completed.len() as u64;
        let report = TickReport {
            time: self.time,
            connections: if completed.is_empty() {
                None
            } else {
                Some(completed.as_slice())
            },
        };
        self.observers.notify(&report);

        if !completed.is_empty() {
            debug!("Tick at {} ms completed {} connections", self.time, completed.len());
        }
        completed.len()
    }

    fn radio(&self, index: usize) -> Result<Arc<SimRadio>, SimError> {
        self.radios
            .get(index)
            .cloned()
            .ok_or(SimError::UnknownRadio(index))
    }

    fn generate_traffic(&mut self) {
        let Some(rate) = &self.rate else {
            return;
        };
        let motes = self.radios.len();
        let busy: HashSet<usize> = self
            .pending
            .iter()
            .map(|c| c.source().id().0 as usize)
            .collect();
        let draw: f64 = rate.sample(&mut self.rng);
        let wanted = (draw as usize).min(motes);
        if wanted == 0 {
            return;
        }

        let sources: Vec<usize> = index::sample(&mut self.rng, motes, wanted)
            .into_iter()
            .filter(|s| !busy.contains(s))
            .collect();
        let fan_out = self.config.fan_out.min(motes - 1);

        for source in sources {
            // pick receivers among the other motes
            let destinations: Vec<usize> = index::sample(&mut self.rng, motes - 1, fan_out)
                .into_iter()
                .map(|d| if d >= source { d + 1 } else { d })
                .collect();

            let traffic =
                Traffic::pick(&mut self.rng, self.config.rreq_share, self.config.rrep_share);
            self.sequence = self.sequence.wrapping_add(1);
            let payload = build_payload(
                &mut self.rng,
                traffic,
                self.sequence,
                source,
                destinations[0],
                self.config.envelope_len,
            );
            if let Err(e) = self.transmit(source, payload, &destinations) {
                debug!("Dropped generated transmission: {}", e);
            }
        }
    }
}

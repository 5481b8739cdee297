//! simulated radio medium for exercising the radio logger

pub mod medium;
pub mod scenarios;
pub mod traffic;

use std::time::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use medium::{MediumStats, SimRadio, SimulatedMedium};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid medium config: {0}")]
    InvalidConfig(String),

    #[error("no radio with index {0}")]
    UnknownRadio(usize),

    #[error("connection from radio {0} has no destinations")]
    NoDestinations(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediumConfig {
    pub motes: usize,
    /// Fraction of radios that expose packet-level data.
    pub packet_radio_share: f64,
    /// Mean number of transmissions per tick (Poisson).
    pub transmissions_per_tick: f64,
    /// Receivers per transmission, capped by the number of other motes.
    pub fan_out: usize,
    pub rreq_share: f64,
    pub rrep_share: f64,
    /// Lower-layer bytes placed in front of every generated payload.
    pub envelope_len: usize,
    pub tick: Duration,
    pub seed: Option<u64>,
}

impl Default for MediumConfig {
    fn default() -> Self {
        Self {
            motes: 8,
            packet_radio_share: 0.9,
            transmissions_per_tick: 1.5,
            fan_out: 3,
            rreq_share: 0.3,
            rrep_share: 0.2,
            envelope_len: 0,
            tick: Duration::from_millis(10),
            seed: None,
        }
    }
}

impl MediumConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.motes < 2 {
            return Err(SimError::InvalidConfig(format!(
                "need at least 2 motes, got {}",
                self.motes
            )));
        }
        for (name, share) in [
            ("packet_radio_share", self.packet_radio_share),
            ("rreq_share", self.rreq_share),
            ("rrep_share", self.rrep_share),
        ] {
            if !(0.0..=1.0).contains(&share) {
                return Err(SimError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, share
                )));
            }
        }
        if self.rreq_share + self.rrep_share > 1.0 {
            return Err(SimError::InvalidConfig(
                "rreq_share + rrep_share exceeds 1".to_string(),
            ));
        }
        if !self.transmissions_per_tick.is_finite() || self.transmissions_per_tick < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "transmissions_per_tick must be a non-negative number, got {}",
                self.transmissions_per_tick
            )));
        }
        if self.fan_out == 0 {
            return Err(SimError::InvalidConfig("fan_out must be at least 1".to_string()));
        }
        Ok(())
    }
}

pub struct SimulationPresets;

impl SimulationPresets {
    pub fn quiet_network() -> MediumConfig {
        MediumConfig {
            motes: 6,
            transmissions_per_tick: 0.5,
            fan_out: 2,
            ..Default::default()
        }
    }

    pub fn busy_network() -> MediumConfig {
        MediumConfig {
            motes: 24,
            transmissions_per_tick: 6.0,
            fan_out: 5,
            rreq_share: 0.4,
            rrep_share: 0.3,
            envelope_len: 9, // link-layer header in front of the AODV message
            ..Default::default()
        }
    }

    pub fn legacy_radios() -> MediumConfig {
        MediumConfig {
            motes: 10,
            packet_radio_share: 0.3,
            transmissions_per_tick: 2.0,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for config in [
            MediumConfig::default(),
            SimulationPresets::quiet_network(),
            SimulationPresets::busy_network(),
            SimulationPresets::legacy_radios(),
        ] {
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_invalid_configs() {
        let bad = [
            MediumConfig { motes: 1, ..Default::default() },
            MediumConfig { packet_radio_share: 1.5, ..Default::default() },
            MediumConfig { rreq_share: 0.7, rrep_share: 0.6, ..Default::default() },
            MediumConfig { transmissions_per_tick: f64::NAN, ..Default::default() },
            MediumConfig { fan_out: 0, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
        }
    }
}

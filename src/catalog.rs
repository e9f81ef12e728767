use itertools::Itertools;
use std::collections::HashMap;

use crate::prelude::{Constellation, Epoch, SatelliteObservation, SV};

/// [SatelliteCatalog] is the latest snapshot of [SatelliteObservation]s.
/// A new epoch replaces the previous catalog wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SatelliteCatalog {
    /// Optional sampling [Epoch]
    epoch: Option<Epoch>,
    /// Observations, at most one per [SV]
    observations: Vec<SatelliteObservation>,
}

impl SatelliteCatalog {
    /// Builds new [SatelliteCatalog] from a batch of observations.
    /// Duplicated [SV]s are resolved by retaining the latest entry of the batch.
    pub fn new(observations: Vec<SatelliteObservation>) -> Self {
        let mut latest = HashMap::<SV, usize>::with_capacity(observations.len());
        for (index, obs) in observations.iter().enumerate() {
            latest.insert(obs.sv, index);
        }
        let observations = observations
            .into_iter()
            .enumerate()
            .filter(|(index, obs)| latest.get(&obs.sv) == Some(index))
            .map(|(_, obs)| obs)
            .collect();
        Self {
            epoch: None,
            observations,
        }
    }
    /// Copies and returns with sampling [Epoch]
    pub fn with_epoch(&self, epoch: Epoch) -> Self {
        let mut s = self.clone();
        s.epoch = Some(epoch);
        s
    }
    pub fn epoch(&self) -> Option<Epoch> {
        self.epoch
    }
    pub fn observations(&self) -> &[SatelliteObservation] {
        &self.observations
    }
    pub fn len(&self) -> usize {
        self.observations.len()
    }
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
    /// Returns [SatelliteObservation] for given [SV], if tracked
    pub fn get(&self, sv: SV) -> Option<&SatelliteObservation> {
        self.observations.iter().find(|obs| obs.sv == sv)
    }
    /// Returns list of tracked [Constellation]s
    pub fn constellations(&self) -> Vec<Constellation> {
        self.observations
            .iter()
            .map(|obs| obs.sv.constellation)
            .unique()
            .collect()
    }
}

impl From<Vec<SatelliteObservation>> for SatelliteCatalog {
    fn from(observations: Vec<SatelliteObservation>) -> Self {
        Self::new(observations)
    }
}

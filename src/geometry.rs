use log::debug;

use crate::prelude::{Config, SatelliteObservation};

/// [GeometryFilter] selects the [SatelliteObservation]s that may
/// contribute to an integrity solution.
#[derive(Debug, Clone)]
pub struct GeometryFilter<'a> {
    cfg: &'a Config,
}

impl<'a> GeometryFilter<'a> {
    /// Minimal number of SV to form a position solution
    pub const MIN_SV_SOLUTION: usize = 4;

    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }
    /// True if this [SatelliteObservation] passes all criteria:
    /// well formed, above elevation mask, C/N0 at least the threshold
    /// and ephemeris not older than the limit.
    pub fn usable(&self, obs: &SatelliteObservation) -> bool {
        if !obs.is_well_formed() {
            debug!("({}) - malformed observation", obs.sv);
            return false;
        }
        if obs.elevation_rad < self.cfg.min_elevation_rad {
            debug!(
                "({}) - below elevation mask ({:.2}°)",
                obs.sv,
                obs.elevation_rad.to_degrees()
            );
            return false;
        }
        // unknown C/N0 never qualifies
        if obs.snr_dbhz.unwrap_or(-200.0) < self.cfg.min_snr_dbhz {
            debug!("({}) - signal too weak ({:?} dB.Hz)", obs.sv, obs.snr_dbhz);
            return false;
        }
        if obs.ephemeris_age > self.cfg.max_ephemeris_age {
            debug!("({}) - outdated ephemeris ({})", obs.sv, obs.ephemeris_age);
            return false;
        }
        true
    }
    /// Returns the usable subset of the catalog, preserving its order.
    pub fn filter(&self, catalog: &[SatelliteObservation]) -> Vec<SatelliteObservation> {
        let usable = catalog
            .iter()
            .filter(|obs| self.usable(obs))
            .cloned()
            .collect::<Vec<_>>();
        debug!(
            "{}/{} observations passed geometry criteria",
            usable.len(),
            catalog.len()
        );
        usable
    }
}

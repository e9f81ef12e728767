//! Integrity monitor
use log::{debug, error, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::{
    navigation::Navigation,
    prelude::{Config, ConfigError, PositionFix, RAIMResult, SatelliteCatalog},
    status::UnavailableReason,
};

/// Latest inputs, replaced wholesale
#[derive(Debug)]
struct Inputs {
    /// Active [Config]
    cfg: Config,
    /// Latest [SatelliteCatalog] snapshot
    catalog: Option<Arc<SatelliteCatalog>>,
}

/// [IntegrityMonitor] merges the satellite catalog and position fix streams
/// and runs one evaluation per position fix, always against the latest catalog.
/// Evaluations are serialized: inputs remain locked for the whole evaluation.
/// Only the latest [RAIMResult] is published (last write wins).
#[derive(Debug)]
pub struct IntegrityMonitor {
    inputs: Mutex<Inputs>,
    results: watch::Sender<Option<Arc<RAIMResult>>>,
}

impl Default for IntegrityMonitor {
    fn default() -> Self {
        Self::with_inputs(Config::default())
    }
}

impl IntegrityMonitor {
    fn with_inputs(cfg: Config) -> Self {
        let (results, _) = watch::channel(None);
        Self {
            results,
            inputs: Mutex::new(Inputs { cfg, catalog: None }),
        }
    }

    /// Builds new [IntegrityMonitor] with given [Config], that is verified first.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self::with_inputs(cfg))
    }

    fn inputs(&self) -> MutexGuard<'_, Inputs> {
        self.inputs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the active [Config], effective from the next evaluation.
    /// An invalid [Config] is rejected and the active one is preserved.
    pub fn configure(&self, cfg: Config) -> Result<(), ConfigError> {
        if let Err(e) = cfg.validate() {
            error!("rejected configuration: {}", e);
            return Err(e);
        }
        self.inputs().cfg = cfg;
        debug!("new configuration");
        Ok(())
    }

    /// Returns a copy of the active [Config]
    pub fn config(&self) -> Config {
        self.inputs().cfg.clone()
    }

    /// Replaces the current [SatelliteCatalog] wholesale. This never fails:
    /// malformed observations are filtered at evaluation time.
    pub fn ingest_satellite_catalog<C: Into<SatelliteCatalog>>(&self, catalog: C) {
        let catalog = Arc::new(catalog.into());
        debug!(
            "{:?} - new catalog ({} SV)",
            catalog.epoch(),
            catalog.len()
        );
        self.inputs().catalog = Some(catalog);
    }

    /// Returns the latest [SatelliteCatalog] snapshot
    pub fn current_catalog(&self) -> Option<Arc<SatelliteCatalog>> {
        self.inputs().catalog.clone()
    }

    /// Runs one evaluation cycle for this [PositionFix], publishes and returns its [RAIMResult].
    pub fn ingest_position_fix(&self, fix: &PositionFix) -> Arc<RAIMResult> {
        let inputs = self.inputs();
        let epoch = Some(fix.epoch);

        let result = match &inputs.catalog {
            None => RAIMResult::unavailable(epoch, UnavailableReason::NoSatelliteData),
            Some(_) if !fix.is_valid() => {
                RAIMResult::unavailable(epoch, UnavailableReason::InvalidPositionFix)
            },
            Some(catalog) => {
                let user = fix.position();
                Navigation::new(&inputs.cfg).evaluate(epoch, &user, catalog.observations())
            },
        };

        // published while still holding the inputs
        self.publish(result)
    }

    /// Positioning source lost its fix: drops the current catalog and
    /// publishes an Unavailable [RAIMResult].
    pub fn signal_loss(&self) -> Arc<RAIMResult> {
        let mut inputs = self.inputs();
        inputs.catalog = None;
        let result = RAIMResult::unavailable(None, UnavailableReason::NoSatelliteData);
        self.publish(result)
    }

    fn publish(&self, result: RAIMResult) -> Arc<RAIMResult> {
        let result = Arc::new(result);
        let previous = self.results.send_replace(Some(result.clone()));

        match previous {
            Some(previous) if previous.status() == result.status() => {},
            _ => info!("{:?} - {}", result.epoch(), result.status()),
        }
        result
    }

    /// Returns the latest [RAIMResult], if any evaluation happened yet
    pub fn current_result(&self) -> Option<Arc<RAIMResult>> {
        self.results.borrow().clone()
    }

    /// Returns a receiver that always observes the latest [RAIMResult]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<RAIMResult>>> {
        self.results.subscribe()
    }
}

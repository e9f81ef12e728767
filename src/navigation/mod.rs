pub mod detection;
pub mod dop;
pub mod exclusion;
pub mod protection;

use log::{debug, warn};

use crate::{
    classifier::{Assessment, Classifier},
    prelude::{
        Config, Epoch, FaultDetector, FaultExcluder, GeometryFilter, Position, RAIMResult,
        SatelliteObservation, SV,
    },
    status::UnavailableReason,
};

use dop::DilutionOfPrecision;
use exclusion::Exclusion;
use protection::ProtectionLevels;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Pseudo range [Residual]: measured pseudo range minus geometric range
/// between user and SV.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Residual {
    /// SV (signal emitter)
    pub sv: SV,
    /// Residual [m]
    pub value_m: f64,
}

impl Residual {
    /// Computes one [Residual] per [SatelliteObservation]
    pub fn compute(user: &Position, satellites: &[SatelliteObservation]) -> Vec<Self> {
        satellites
            .iter()
            .map(|sat| {
                let rho = user.distance_m(&sat.position_ecef_m);
                let value_m = sat.pseudorange_m - rho;
                debug!("({}) - residual={:.3}m", sat.sv, value_m);
                Self { sv: sat.sv, value_m }
            })
            .collect()
    }
}

/// [Navigation] runs one integrity evaluation, from the raw catalog
/// down to the published [RAIMResult].
pub(crate) struct Navigation<'a> {
    cfg: &'a Config,
}

impl<'a> Navigation<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }

    fn protection_levels(&self, dop: &DilutionOfPrecision) -> Option<ProtectionLevels> {
        ProtectionLevels::from_config(self.cfg, dop)
    }

    /// Evaluates integrity of the solution at user [Position], using the catalog.
    pub fn evaluate(
        &self,
        epoch: Option<Epoch>,
        user: &Position,
        catalog: &[SatelliteObservation],
    ) -> RAIMResult {
        let classifier = Classifier::new(self.cfg);

        let usable = GeometryFilter::new(self.cfg).filter(catalog);
        let mut assessment = Assessment::new(usable.iter().map(|sat| sat.sv).collect());

        if usable.len() < GeometryFilter::MIN_SV_SOLUTION {
            return classifier.classify(epoch, assessment);
        }

        let dop = match DilutionOfPrecision::new(user, &usable, self.cfg.max_dop) {
            Ok(dop) => dop,
            Err(reason) => {
                warn!("{:?} - {}", epoch, reason);
                assessment.unavailable = Some(reason);
                return classifier.classify(epoch, assessment);
            },
        };

        assessment.dop = Some(dop);
        assessment.protection = self.protection_levels(&dop);

        if assessment.protection.is_none() {
            assessment.unavailable = Some(UnavailableReason::UndefinedThreshold);
            return classifier.classify(epoch, assessment);
        }

        let detector = FaultDetector::new(self.cfg);

        let outcome = match detector.test(user, &usable) {
            Ok(outcome) => outcome,
            Err(reason) => {
                debug!("{:?} - no fault detection: {}", epoch, reason);
                assessment.unavailable = Some(reason);
                return classifier.classify(epoch, assessment);
            },
        };

        if outcome.fault {
            warn!(
                "{:?} - fault detected: {:.3} > {:.3}",
                epoch, outcome.statistic, outcome.threshold
            );

            let exclusion = FaultExcluder::new(self.cfg).exclude(&outcome);

            if let Exclusion::Isolated(faulty) = &exclusion {
                let remaining = usable
                    .iter()
                    .filter(|sat| !faulty.contains(&sat.sv))
                    .cloned()
                    .collect::<Vec<_>>();

                // protection levels of the post-exclusion geometry, when solvable
                if let Ok(dop) = DilutionOfPrecision::new(user, &remaining, self.cfg.max_dop) {
                    if let Some(protection) = self.protection_levels(&dop) {
                        assessment.dop = Some(dop);
                        assessment.protection = Some(protection);
                    }
                }

                if let Ok(retest) = detector.test(user, &remaining) {
                    debug!(
                        "{:?} - post-exclusion test: {:.3}/{:.3}",
                        epoch, retest.statistic, retest.threshold
                    );
                    assessment.post_exclusion_consistent = Some(!retest.fault);
                }
            }

            assessment.exclusion = Some(exclusion);
        }

        assessment.outcome = Some(outcome);
        classifier.classify(epoch, assessment)
    }
}

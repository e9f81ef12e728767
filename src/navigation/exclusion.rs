use itertools::Itertools;
use log::{debug, warn};
use std::cmp::Ordering;

use crate::{
    navigation::{detection::TestOutcome, Residual},
    prelude::{Config, SV},
};

/// Outcome of a fault exclusion attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Exclusion {
    /// Not enough SV to isolate the fault
    Insufficient,
    /// Faulty SV(s), sorted by decreasing absolute residual
    Isolated(Vec<SV>),
    /// Aggregated statistic exceeded, but no single SV stands out
    Unidentified,
}

/// [FaultExcluder] identifies the most suspicious measurement(s),
/// once a fault has been detected.
#[derive(Debug, Clone)]
pub struct FaultExcluder<'a> {
    cfg: &'a Config,
}

impl<'a> FaultExcluder<'a> {
    /// Residual bound, in number of σ
    pub const SIGMA_BOUND: f64 = 3.0;

    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }

    /// Sorts residuals by decreasing absolute value, ties being broken by
    /// ascending SV identifier.
    pub fn rank(residuals: &[Residual]) -> Vec<Residual> {
        residuals
            .iter()
            .copied()
            .sorted_by(|a, b| {
                b.value_m
                    .abs()
                    .partial_cmp(&a.value_m.abs())
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.sv.prn.cmp(&b.sv.prn))
                    .then_with(|| a.sv.constellation.cmp(&b.sv.constellation))
            })
            .collect()
    }

    /// Attempts to isolate the faulty SV(s) from a failed consistency test.
    pub fn exclude(&self, outcome: &TestOutcome) -> Exclusion {
        if outcome.residuals.len() < self.cfg.min_sv_fde {
            warn!(
                "cannot isolate fault: {}/{} SV",
                outcome.residuals.len(),
                self.cfg.min_sv_fde
            );
            return Exclusion::Insufficient;
        }

        let bound = Self::SIGMA_BOUND * self.cfg.sigma_m;

        let faulty = Self::rank(&outcome.residuals)
            .into_iter()
            .take_while(|res| res.value_m.abs() > bound)
            .map(|res| {
                warn!("({}) - excluded: |{:.3}| > {:.3}m", res.sv, res.value_m, bound);
                res.sv
            })
            .collect::<Vec<_>>();

        if faulty.is_empty() {
            debug!("no residual exceeds {:.3}m", bound);
            Exclusion::Unidentified
        } else {
            Exclusion::Isolated(faulty)
        }
    }
}

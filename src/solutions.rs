//! Integrity monitoring results
use crate::{
    classifier::Assessment,
    navigation::dop::DilutionOfPrecision,
    prelude::{Epoch, SV},
    stats::chi2_cdf,
    status::{Quality, RAIMStatus, UnavailableReason},
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// [RAIMResult] is the outcome of one evaluation. It is only formed by the
/// classifier: the [RAIMStatus] always derives from the other fields.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RAIMResult {
    /// [Epoch] of the evaluated position fix
    epoch: Option<Epoch>,
    /// [RAIMStatus]
    status: RAIMStatus,
    /// SV that passed the geometry criteria
    satellites: Vec<SV>,
    /// True if the chi-square test failed
    fault_detected: bool,
    /// Chi-square test statistic
    statistic: Option<f64>,
    /// Chi-square test threshold
    threshold: Option<f64>,
    /// Degrees of freedom of the test
    dof: Option<usize>,
    /// [DilutionOfPrecision] of the retained geometry
    dop: Option<DilutionOfPrecision>,
    /// Horizontal Protection Level [m]
    hpl_m: Option<f64>,
    /// Vertical Protection Level [m]
    vpl_m: Option<f64>,
    /// SV identified as faulty
    faulty: Vec<SV>,
    /// Consistency of the remaining SV, after exclusion
    post_exclusion_consistent: Option<bool>,
    /// Confidence score in [0, 1]
    confidence: f64,
    /// Integrity risk score in [0, 1]
    integrity_risk: f64,
}

impl RAIMResult {
    pub(crate) fn new(epoch: Option<Epoch>, status: RAIMStatus, assessment: Assessment) -> Self {
        let fault_detected = assessment.fault();

        let (statistic, threshold, dof) = match &assessment.outcome {
            Some(outcome) => (
                Some(outcome.statistic),
                Some(outcome.threshold),
                Some(outcome.dof),
            ),
            None => (None, None, None),
        };

        let faulty = match &status {
            RAIMStatus::FaultDetected(svs) => svs.clone(),
            _ => Vec::new(),
        };

        let integrity_risk = Self::risk(&status, statistic, dof);
        let confidence = Self::status_weight(&status) * (1.0 - integrity_risk);

        Self {
            epoch,
            status,
            fault_detected,
            statistic,
            threshold,
            dof,
            faulty,
            confidence,
            integrity_risk,
            satellites: assessment.satellites,
            dop: assessment.dop,
            hpl_m: assessment.protection.map(|pl| pl.hpl_m),
            vpl_m: assessment.protection.map(|pl| pl.vpl_m),
            post_exclusion_consistent: assessment.post_exclusion_consistent,
        }
    }

    /// Forms an Unavailable [RAIMResult] that did not reach the geometry stage
    pub(crate) fn unavailable(epoch: Option<Epoch>, reason: UnavailableReason) -> Self {
        Self::new(epoch, RAIMStatus::Unavailable(reason), Assessment::default())
    }

    fn risk(status: &RAIMStatus, statistic: Option<f64>, dof: Option<usize>) -> f64 {
        match status {
            RAIMStatus::Unavailable(_) | RAIMStatus::FaultDetected(_) => 1.0,
            RAIMStatus::Available(_) | RAIMStatus::Caution(_) => {
                let risk = match (statistic, dof) {
                    (Some(statistic), Some(dof)) => chi2_cdf(statistic, dof).unwrap_or(1.0),
                    _ => 1.0,
                };
                if matches!(status, RAIMStatus::Caution(_)) {
                    risk.max(0.5)
                } else {
                    risk
                }
            },
        }
    }

    fn status_weight(status: &RAIMStatus) -> f64 {
        match status {
            RAIMStatus::Available(Quality::Excellent) => 1.0,
            RAIMStatus::Available(Quality::Good) => 0.85,
            RAIMStatus::Available(Quality::Adequate) => 0.7,
            RAIMStatus::Available(Quality::Marginal) => 0.5,
            RAIMStatus::Caution(_) => 0.25,
            RAIMStatus::Unavailable(_) | RAIMStatus::FaultDetected(_) => 0.0,
        }
    }

    pub fn epoch(&self) -> Option<Epoch> {
        self.epoch
    }
    pub fn status(&self) -> &RAIMStatus {
        &self.status
    }
    /// Returns list of SV that passed the geometry criteria
    pub fn satellites(&self) -> &[SV] {
        &self.satellites
    }
    pub fn fault_detected(&self) -> bool {
        self.fault_detected
    }
    pub fn statistic(&self) -> Option<f64> {
        self.statistic
    }
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }
    pub fn dof(&self) -> Option<usize> {
        self.dof
    }
    pub fn dop(&self) -> Option<&DilutionOfPrecision> {
        self.dop.as_ref()
    }
    pub fn hpl_m(&self) -> Option<f64> {
        self.hpl_m
    }
    pub fn vpl_m(&self) -> Option<f64> {
        self.vpl_m
    }
    /// Returns SV implicated as faulty
    pub fn faulty(&self) -> &[SV] {
        &self.faulty
    }
    pub fn post_exclusion_consistent(&self) -> Option<bool> {
        self.post_exclusion_consistent
    }
    pub fn confidence(&self) -> f64 {
        self.confidence
    }
    pub fn integrity_risk(&self) -> f64 {
        self.integrity_risk
    }
}

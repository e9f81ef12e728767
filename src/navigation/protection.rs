use crate::{navigation::dop::DilutionOfPrecision, prelude::Config, stats::normal_upper_quantile};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Horizontal and Vertical [ProtectionLevels]. These are conservative
/// bounds of the position error, not error estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProtectionLevels {
    /// Missed detection multiplier
    pub k_md: f64,
    /// Horizontal Protection Level [m]
    pub hpl_m: f64,
    /// Vertical Protection Level [m]
    pub vpl_m: f64,
}

impl ProtectionLevels {
    /// One-sided normal multiplier matching the probability of missed detection.
    /// None when Pmd is too small to be resolved in double precision.
    pub fn missed_detection_multiplier(pmd: f64) -> Option<f64> {
        normal_upper_quantile(pmd).filter(|k| k.is_finite())
    }

    /// Builds [ProtectionLevels]: PL = k_md * σ * DOP
    pub fn new(k_md: f64, sigma_m: f64, dop: &DilutionOfPrecision) -> Self {
        Self {
            k_md,
            hpl_m: k_md * sigma_m * dop.hdop,
            vpl_m: k_md * sigma_m * dop.vdop,
        }
    }

    /// Builds [ProtectionLevels] from [Config]. A k_md override has precedence
    /// over the probability of missed detection.
    pub(crate) fn from_config(cfg: &Config, dop: &DilutionOfPrecision) -> Option<Self> {
        let k_md = match cfg.k_md {
            Some(k_md) => k_md,
            None => Self::missed_detection_multiplier(cfg.pmd)?,
        };
        let pl = Self::new(k_md, cfg.sigma_m, dop);
        if pl.hpl_m.is_finite() && pl.vpl_m.is_finite() {
            Some(pl)
        } else {
            None
        }
    }

    /// True if either level exceeds its (optional) alert limit
    pub fn exceeds(&self, hal_m: Option<f64>, val_m: Option<f64>) -> bool {
        hal_m.is_some_and(|hal| self.hpl_m > hal) || val_m.is_some_and(|val| self.vpl_m > val)
    }
}

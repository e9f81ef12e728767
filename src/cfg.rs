use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::{navigation::protection::ProtectionLevels, prelude::Duration};

/// Configuration Error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("probability of false alarm must lie within ]0, 1[ (got {0})")]
    InvalidFalseAlarmProbability(f64),
    #[error("probability of missed detection must lie within ]0, 1[ (got {0})")]
    InvalidMissedDetectionProbability(f64),
    #[error("measurement noise must be a positive number of meters (got {0})")]
    InvalidMeasurementNoise(f64),
    #[error("elevation mask must lie within [0, π/2[ rad (got {0})")]
    InvalidElevationMask(f64),
    #[error("invalid signal strength threshold {0}")]
    InvalidSignalThreshold(f64),
    #[error("maximal ephemeris age must be positive")]
    InvalidEphemerisAge,
    #[error("fault detection requires at least 5 SV (got {0})")]
    InvalidDetectionMinimum(usize),
    #[error("fault exclusion minimum ({fde}) must exceed fault detection minimum ({fd})")]
    InvalidExclusionMinimum { fd: usize, fde: usize },
    #[error("DOP limit must be >= 1.0 (got {0})")]
    InvalidDopLimit(f64),
    #[error("invalid k_md multiplier {0}")]
    InvalidMultiplier(f64),
    #[error("alert limits must be positive (got {0})")]
    InvalidAlertLimit(f64),
}

fn default_pfa() -> f64 {
    1.0 / 15000.0
}

fn default_pmd() -> f64 {
    1.0E-3
}

fn default_sigma() -> f64 {
    2.0
}

fn default_min_elevation() -> f64 {
    5.0_f64.to_radians()
}

fn default_min_snr() -> f64 {
    25.0
}

fn default_max_ephemeris_age() -> Duration {
    Duration::from_hours(4.0)
}

fn default_min_sv_fd() -> usize {
    5
}

fn default_min_sv_fde() -> usize {
    6
}

fn default_max_dop() -> f64 {
    100.0
}

/// Integrity monitoring [Config]uration. This is rarely changed
/// and validated each time it is presented to the monitor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Probability of false alarm, that drives the detection threshold.
    #[cfg_attr(feature = "serde", serde(default = "default_pfa"))]
    pub pfa: f64,
    /// Probability of missed detection, that drives the protection levels.
    /// The default (1E-3) yields k_md = 3.09, well below the 5.33 multiplier
    /// usually quoted for aviation (Pmd near 5E-8): use [Self::k_md] to pin the latter.
    #[cfg_attr(feature = "serde", serde(default = "default_pmd"))]
    pub pmd: f64,
    /// Pseudo range measurement noise standard deviation [m]
    #[cfg_attr(feature = "serde", serde(default = "default_sigma"))]
    pub sigma_m: f64,
    /// Elevation mask [rad]
    #[cfg_attr(feature = "serde", serde(default = "default_min_elevation"))]
    pub min_elevation_rad: f64,
    /// Minimal C/N0 [dB.Hz]
    #[cfg_attr(feature = "serde", serde(default = "default_min_snr"))]
    pub min_snr_dbhz: f64,
    /// Maximal ephemeris age
    #[cfg_attr(feature = "serde", serde(default = "default_max_ephemeris_age"))]
    pub max_ephemeris_age: Duration,
    /// Minimal number of SV for fault detection
    #[cfg_attr(feature = "serde", serde(default = "default_min_sv_fd"))]
    pub min_sv_fd: usize,
    /// Minimal number of SV for fault detection and exclusion
    #[cfg_attr(feature = "serde", serde(default = "default_min_sv_fde"))]
    pub min_sv_fde: usize,
    /// Geometry sanity limit: any DOP above this invalidates the geometry
    #[cfg_attr(feature = "serde", serde(default = "default_max_dop"))]
    pub max_dop: f64,
    /// Overrides the missed detection multiplier otherwise derived from [Self::pmd],
    /// for example 5.33 to match aviation protection levels.
    #[cfg_attr(feature = "serde", serde(default))]
    pub k_md: Option<f64>,
    /// Horizontal alert limit [m]
    #[cfg_attr(feature = "serde", serde(default))]
    pub hal_m: Option<f64>,
    /// Vertical alert limit [m]
    #[cfg_attr(feature = "serde", serde(default))]
    pub val_m: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pfa: default_pfa(),
            pmd: default_pmd(),
            sigma_m: default_sigma(),
            min_elevation_rad: default_min_elevation(),
            min_snr_dbhz: default_min_snr(),
            max_ephemeris_age: default_max_ephemeris_age(),
            min_sv_fd: default_min_sv_fd(),
            min_sv_fde: default_min_sv_fde(),
            max_dop: default_max_dop(),
            k_md: None,
            hal_m: None,
            val_m: None,
        }
    }
}

impl Config {
    /// Verifies this [Config] may be used for integrity monitoring.
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.pfa > 0.0 && self.pfa < 1.0) {
            return Err(Error::InvalidFalseAlarmProbability(self.pfa));
        }
        if !(self.pmd > 0.0 && self.pmd < 1.0) {
            return Err(Error::InvalidMissedDetectionProbability(self.pmd));
        }
        if self.k_md.is_none()
            && ProtectionLevels::missed_detection_multiplier(self.pmd).is_none()
        {
            return Err(Error::InvalidMissedDetectionProbability(self.pmd));
        }
        if !(self.sigma_m.is_finite() && self.sigma_m > 0.0) {
            return Err(Error::InvalidMeasurementNoise(self.sigma_m));
        }
        if !(self.min_elevation_rad >= 0.0 && self.min_elevation_rad < std::f64::consts::FRAC_PI_2)
        {
            return Err(Error::InvalidElevationMask(self.min_elevation_rad));
        }
        if !self.min_snr_dbhz.is_finite() {
            return Err(Error::InvalidSignalThreshold(self.min_snr_dbhz));
        }
        if self.max_ephemeris_age <= Duration::ZERO {
            return Err(Error::InvalidEphemerisAge);
        }
        if self.min_sv_fd < 5 {
            return Err(Error::InvalidDetectionMinimum(self.min_sv_fd));
        }
        if self.min_sv_fde <= self.min_sv_fd {
            return Err(Error::InvalidExclusionMinimum {
                fd: self.min_sv_fd,
                fde: self.min_sv_fde,
            });
        }
        if !(self.max_dop >= 1.0) {
            return Err(Error::InvalidDopLimit(self.max_dop));
        }
        if let Some(k_md) = self.k_md {
            if !(k_md.is_finite() && k_md > 0.0) {
                return Err(Error::InvalidMultiplier(k_md));
            }
        }
        for limit in [self.hal_m, self.val_m].into_iter().flatten() {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(Error::InvalidAlertLimit(limit));
            }
        }
        Ok(())
    }
    /// Copies and returns with probability of false alarm
    pub fn with_pfa(&self, pfa: f64) -> Self {
        let mut s = self.clone();
        s.pfa = pfa;
        s
    }
    /// Copies and returns with probability of missed detection
    pub fn with_pmd(&self, pmd: f64) -> Self {
        let mut s = self.clone();
        s.pmd = pmd;
        s
    }
    /// Copies and returns with measurement noise [m]
    pub fn with_sigma(&self, sigma_m: f64) -> Self {
        let mut s = self.clone();
        s.sigma_m = sigma_m;
        s
    }
    /// Copies and returns with elevation mask [rad]
    pub fn with_min_elevation(&self, min_elevation_rad: f64) -> Self {
        let mut s = self.clone();
        s.min_elevation_rad = min_elevation_rad;
        s
    }
    /// Copies and returns with C/N0 threshold [dB.Hz]
    pub fn with_min_snr(&self, min_snr_dbhz: f64) -> Self {
        let mut s = self.clone();
        s.min_snr_dbhz = min_snr_dbhz;
        s
    }
    /// Copies and returns with maximal ephemeris age
    pub fn with_max_ephemeris_age(&self, age: Duration) -> Self {
        let mut s = self.clone();
        s.max_ephemeris_age = age;
        s
    }
    /// Copies and returns with (detection, exclusion) SV minimums
    pub fn with_sv_minimums(&self, min_sv_fd: usize, min_sv_fde: usize) -> Self {
        let mut s = self.clone();
        s.min_sv_fd = min_sv_fd;
        s.min_sv_fde = min_sv_fde;
        s
    }
    /// Copies and returns with missed detection multiplier override
    pub fn with_k_md(&self, k_md: f64) -> Self {
        let mut s = self.clone();
        s.k_md = Some(k_md);
        s
    }
    /// Copies and returns with (horizontal, vertical) alert limits [m]
    pub fn with_alert_limits(&self, hal_m: Option<f64>, val_m: Option<f64>) -> Self {
        let mut s = self.clone();
        s.hal_m = hal_m;
        s.val_m = val_m;
        s
    }
}

#[cfg(test)]
mod test {
    use super::{Config, Error};
    use crate::prelude::Duration;
    use rstest::*;

    #[test]
    fn default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[rstest]
    #[case(Config::default().with_pfa(0.0), Error::InvalidFalseAlarmProbability(0.0))]
    #[case(Config::default().with_pfa(1.0), Error::InvalidFalseAlarmProbability(1.0))]
    #[case(Config::default().with_pfa(-0.5), Error::InvalidFalseAlarmProbability(-0.5))]
    #[case(Config::default().with_pmd(1.5), Error::InvalidMissedDetectionProbability(1.5))]
    #[case(
        Config::default().with_pmd(1.0E-320),
        Error::InvalidMissedDetectionProbability(1.0E-320)
    )]
    #[case(Config::default().with_sigma(0.0), Error::InvalidMeasurementNoise(0.0))]
    #[case(Config::default().with_min_elevation(2.0), Error::InvalidElevationMask(2.0))]
    #[case(Config::default().with_sv_minimums(4, 6), Error::InvalidDetectionMinimum(4))]
    #[case(
        Config::default().with_sv_minimums(6, 6),
        Error::InvalidExclusionMinimum { fd: 6, fde: 6 }
    )]
    #[case(Config::default().with_k_md(-1.0), Error::InvalidMultiplier(-1.0))]
    #[case(
        Config::default().with_alert_limits(Some(0.0), None),
        Error::InvalidAlertLimit(0.0)
    )]
    #[case(
        Config::default().with_max_ephemeris_age(Duration::ZERO),
        Error::InvalidEphemerisAge
    )]
    fn invalid_configurations(#[case] cfg: Config, #[case] expected: Error) {
        assert_eq!(cfg.validate(), Err(expected));
    }

    #[test]
    fn nan_pfa_is_rejected() {
        assert!(Config::default().with_pfa(f64::NAN).validate().is_err());
    }

    #[test]
    fn multiplier_override_bypasses_pmd() {
        let cfg = Config::default().with_pmd(1.0E-320).with_k_md(5.33);
        assert!(cfg.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_with_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "sigma_m": 1.5, "hal_m": 556.0 }"#).unwrap();
        assert_eq!(cfg.sigma_m, 1.5);
        assert_eq!(cfg.hal_m, Some(556.0));
        assert_eq!(cfg.pfa, 1.0 / 15000.0);
        assert_eq!(cfg.min_sv_fde, 6);
        assert!(cfg.validate().is_ok());
    }
}

use crate::prelude::{Constellation, Duration, Position, Vector3, SV};

/// Satellite observation, one per tracked [SV] and per epoch.
/// Observations are value types: the catalog replaces them wholesale
/// on every epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteObservation {
    /// SV (signal emitter): constellation + PRN
    pub(crate) sv: SV,
    /// Satellite position in ECEF [m]
    pub(crate) position_ecef_m: Vector3<f64>,
    /// Measured pseudo range [m]
    pub(crate) pseudorange_m: f64,
    /// Elevation angle [rad]
    pub(crate) elevation_rad: f64,
    /// Azimuth angle [rad]
    pub(crate) azimuth_rad: f64,
    /// Optional (but recommended) C/N0 in [dB.Hz]
    pub(crate) snr_dbhz: Option<f64>,
    /// Time elapsed since last ephemeris update
    pub(crate) ephemeris_age: Duration,
    /// True if the receiver's own solution currently uses this SV
    pub(crate) used_in_fix: bool,
}

impl SatelliteObservation {
    /// Builds new [SatelliteObservation] from the satellite ECEF position [m],
    /// measured pseudo range [m] and look angles [rad].
    /// Ephemeris is considered fresh and C/N0 is unknown: we recommend
    /// providing it with [Self::with_snr].
    pub fn new(
        sv: SV,
        position_ecef_m: Vector3<f64>,
        pseudorange_m: f64,
        elevation_rad: f64,
        azimuth_rad: f64,
    ) -> Self {
        Self {
            sv,
            position_ecef_m,
            pseudorange_m,
            elevation_rad,
            azimuth_rad,
            snr_dbhz: None,
            ephemeris_age: Duration::ZERO,
            used_in_fix: true,
        }
    }
    /// Builds new [SatelliteObservation], look angles being
    /// determined from given user [Position].
    pub fn from_user_position(
        sv: SV,
        position_ecef_m: Vector3<f64>,
        pseudorange_m: f64,
        user: &Position,
    ) -> Self {
        let (elevation_rad, azimuth_rad) = user.elevation_azimuth_rad(&position_ecef_m);
        Self::new(sv, position_ecef_m, pseudorange_m, elevation_rad, azimuth_rad)
    }
    /// Copies and returns with C/N0 estimate [dB.Hz]
    pub fn with_snr(&self, snr_dbhz: f64) -> Self {
        let mut s = self.clone();
        s.snr_dbhz = Some(snr_dbhz);
        s
    }
    /// Copies and returns with given ephemeris age
    pub fn with_ephemeris_age(&self, age: Duration) -> Self {
        let mut s = self.clone();
        s.ephemeris_age = age;
        s
    }
    /// Copies and returns with given "used in fix" receiver flag
    pub fn with_used_in_fix(&self, used: bool) -> Self {
        let mut s = self.clone();
        s.used_in_fix = used;
        s
    }
    /// Copies and returns with a new pseudo range [m]
    pub fn with_pseudorange(&self, pseudorange_m: f64) -> Self {
        let mut s = self.clone();
        s.pseudorange_m = pseudorange_m;
        s
    }
    pub fn sv(&self) -> SV {
        self.sv
    }
    pub fn constellation(&self) -> Constellation {
        self.sv.constellation
    }
    pub fn position_ecef_m(&self) -> Vector3<f64> {
        self.position_ecef_m
    }
    pub fn pseudorange_m(&self) -> f64 {
        self.pseudorange_m
    }
    pub fn elevation_rad(&self) -> f64 {
        self.elevation_rad
    }
    pub fn azimuth_rad(&self) -> f64 {
        self.azimuth_rad
    }
    pub fn snr_dbhz(&self) -> Option<f64> {
        self.snr_dbhz
    }
    pub fn ephemeris_age(&self) -> Duration {
        self.ephemeris_age
    }
    pub fn used_in_fix(&self) -> bool {
        self.used_in_fix
    }
    /// Observations carrying NaN or infinite values can never contribute
    pub(crate) fn is_well_formed(&self) -> bool {
        self.position_ecef_m.iter().all(|v| v.is_finite())
            && self.position_ecef_m.norm() > 0.0
            && self.pseudorange_m.is_finite()
            && self.pseudorange_m > 0.0
            && self.elevation_rad.is_finite()
            && self.azimuth_rad.is_finite()
    }
}

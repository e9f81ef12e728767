mod properties;

use log::LevelFilter;
use std::sync::Once;

use crate::prelude::{
    Constellation, Duration, Epoch, PositionFix, SatelliteCatalog, SatelliteObservation, SV,
};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Reference user location (ddeg, ddeg, m)
pub const REFERENCE_COORDS_DDEG: (f64, f64, f64) = (48.3538, 11.7861, 453.0);

/// Mean SV to user range [m]
pub const REFERENCE_RANGE_M: f64 = 20_200_000.0;

/// 8 SV, all elevations >= 30°, symmetric in azimuth: HDOP=1
pub const OPEN_SKY_DEG: [(f64, f64); 8] = [
    (30.0, 0.0),
    (30.0, 90.0),
    (30.0, 180.0),
    (30.0, 270.0),
    (60.0, 45.0),
    (60.0, 135.0),
    (60.0, 225.0),
    (60.0, 315.0),
];

/// 6 SV, well spread
pub const SIX_SV_DEG: [(f64, f64); 6] = [
    (30.0, 0.0),
    (30.0, 120.0),
    (30.0, 240.0),
    (60.0, 60.0),
    (60.0, 180.0),
    (60.0, 300.0),
];

pub fn reference_epoch() -> Epoch {
    Epoch::from_gregorian_utc(2024, 3, 14, 9, 30, 0, 0)
}

pub fn reference_fix(epoch: Epoch) -> PositionFix {
    let (lat, lon, alt) = REFERENCE_COORDS_DDEG;
    PositionFix::new(epoch, lat, lon, alt)
        .with_accuracy(3.0, 5.0)
        .with_velocity(62.0, 271.0)
}

/// Builds one [SatelliteObservation] seen from the fix, located at given
/// look angles [ddeg], with a pseudo range bias [m].
pub fn observation(
    fix: &PositionFix,
    sv: SV,
    elevation_deg: f64,
    azimuth_deg: f64,
    bias_m: f64,
) -> SatelliteObservation {
    let user = fix.position();
    let (el, az) = (elevation_deg.to_radians(), azimuth_deg.to_radians());
    let range = REFERENCE_RANGE_M + 1000.0 * sv.prn as f64;
    let position = user.look_at(range, el, az);
    let rho = user.distance_m(&position);
    SatelliteObservation::new(sv, position, rho + bias_m, el, az)
        .with_snr(45.0)
        .with_ephemeris_age(Duration::from_seconds(600.0))
}

/// Builds a GPS catalog (PRN 1..=N) from look angles [ddeg] and pseudo range biases [m]
pub fn gps_catalog(fix: &PositionFix, look_angles_deg: &[(f64, f64)], biases_m: &[f64]) -> SatelliteCatalog {
    let observations = look_angles_deg
        .iter()
        .zip(biases_m.iter())
        .enumerate()
        .map(|(i, ((el, az), bias))| {
            observation(fix, SV::new(Constellation::GPS, i as u8 + 1), *el, *az, *bias)
        })
        .collect::<Vec<_>>();
    SatelliteCatalog::new(observations).with_epoch(fix.epoch)
}

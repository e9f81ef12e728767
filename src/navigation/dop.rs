use log::debug;
use nalgebra::{Matrix3, Matrix4, MatrixXx4};

use crate::{
    prelude::{Position, SatelliteObservation},
    status::UnavailableReason,
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Dilution of Precision, derived from the satellite geometry
/// as seen from the user position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DilutionOfPrecision {
    /// Geometric DOP
    pub gdop: f64,
    /// Position DOP
    pub pdop: f64,
    /// Horizontal DOP
    pub hdop: f64,
    /// Vertical DOP
    pub vdop: f64,
    /// Temporal DOP
    pub tdop: f64,
}

impl DilutionOfPrecision {
    /// Lower bound applied to every DOP scalar
    pub const MIN_DOP: f64 = 1.0;

    /// Forms the geometry matrix G: one row per SV, made of the unit
    /// line of sight vector from user to SV, and the clock term.
    pub(crate) fn geometry_matrix(
        user: &Position,
        satellites: &[SatelliteObservation],
    ) -> Option<MatrixXx4<f64>> {
        let ecef = user.ecef();
        let mut g = MatrixXx4::<f64>::zeros(satellites.len());
        for (row, sat) in satellites.iter().enumerate() {
            let los = sat.position_ecef_m - ecef;
            let rho = los.norm();
            if !(rho > 0.0) {
                return None;
            }
            g[(row, 0)] = los[0] / rho;
            g[(row, 1)] = los[1] / rho;
            g[(row, 2)] = los[2] / rho;
            g[(row, 3)] = 1.0;
        }
        Some(g)
    }

    /// Rotates the position block of Q = (G'WG)⁻¹ to the local ENU frame
    pub(crate) fn q_enu(q: &Matrix4<f64>, user: &Position) -> Matrix3<f64> {
        let r = user.ecef_to_enu();
        let q_3: Matrix3<f64> = q.fixed_view::<3, 3>(0, 0).into_owned();
        r * q_3 * r.transpose()
    }

    /// Computes [DilutionOfPrecision] for given satellites seen from user [Position].
    /// All measurements share the same noise (W = I).
    /// Singular geometry, less than 4 SV, or any DOP exceeding `max_dop`
    /// is reported as [UnavailableReason].
    pub fn new(
        user: &Position,
        satellites: &[SatelliteObservation],
        max_dop: f64,
    ) -> Result<Self, UnavailableReason> {
        if satellites.len() < 4 {
            return Err(UnavailableReason::InsufficientSatellites);
        }

        let g = Self::geometry_matrix(user, satellites)
            .ok_or(UnavailableReason::DegenerateGeometry)?;

        let q = (g.transpose() * &g)
            .try_inverse()
            .ok_or(UnavailableReason::DegenerateGeometry)?;

        let q_enu = Self::q_enu(&q, user);

        let dop = Self {
            gdop: q.trace().sqrt(),
            pdop: (q[(0, 0)] + q[(1, 1)] + q[(2, 2)]).sqrt(),
            hdop: (q_enu[(0, 0)] + q_enu[(1, 1)]).sqrt(),
            vdop: q_enu[(2, 2)].sqrt(),
            tdop: q[(3, 3)].sqrt(),
        };

        debug!("geometry: {:?}", dop);

        for value in [dop.gdop, dop.pdop, dop.hdop, dop.vdop, dop.tdop] {
            if !value.is_finite() || value > max_dop {
                debug!("rejected geometry: dop={}", value);
                return Err(UnavailableReason::DegenerateGeometry);
            }
        }

        Ok(Self {
            gdop: dop.gdop.max(Self::MIN_DOP),
            pdop: dop.pdop.max(Self::MIN_DOP),
            hdop: dop.hdop.max(Self::MIN_DOP),
            vdop: dop.vdop.max(Self::MIN_DOP),
            tdop: dop.tdop.max(Self::MIN_DOP),
        })
    }
}

#[cfg(test)]
mod test {
    use super::DilutionOfPrecision;
    use crate::{
        prelude::{Constellation, Position, SatelliteObservation, Vector3, SV},
        status::UnavailableReason,
    };

    fn constellation(user: &Position, look_angles_deg: &[(f64, f64)]) -> Vec<SatelliteObservation> {
        look_angles_deg
            .iter()
            .enumerate()
            .map(|(i, (el, az))| {
                let (el, az) = (el.to_radians(), az.to_radians());
                let pos = user.look_at(20_200_000.0, el, az);
                SatelliteObservation::new(
                    SV::new(Constellation::GPS, i as u8 + 1),
                    pos,
                    20_200_000.0,
                    el,
                    az,
                )
            })
            .collect()
    }

    #[test]
    fn well_spread_geometry() {
        let user = Position::from_geo_ddeg(Vector3::new(52.0, 4.0, 0.0));
        let sats = constellation(
            &user,
            &[
                (90.0, 0.0),
                (30.0, 0.0),
                (30.0, 90.0),
                (30.0, 180.0),
                (30.0, 270.0),
                (60.0, 45.0),
                (60.0, 225.0),
                (45.0, 135.0),
            ],
        );
        let dop = DilutionOfPrecision::new(&user, &sats, 100.0).unwrap();
        assert!(dop.hdop >= 1.0 && dop.hdop < 1.5, "hdop={}", dop.hdop);
        assert!(dop.vdop >= 1.0 && dop.vdop < 2.5, "vdop={}", dop.vdop);
        assert!(dop.pdop >= dop.hdop);
        assert!(dop.gdop >= dop.pdop);
        assert!(
            (dop.pdop.powi(2) - dop.hdop.powi(2) - dop.vdop.powi(2)).abs() < 1.0E-6
                || dop.hdop == 1.0
                || dop.vdop == 1.0
        );
    }

    #[test]
    fn insufficient_satellites() {
        let user = Position::from_geo_ddeg(Vector3::new(52.0, 4.0, 0.0));
        let sats = constellation(&user, &[(90.0, 0.0), (30.0, 0.0), (30.0, 120.0)]);
        assert_eq!(
            DilutionOfPrecision::new(&user, &sats, 100.0),
            Err(UnavailableReason::InsufficientSatellites)
        );
    }

    #[test]
    fn clustered_geometry() {
        let user = Position::from_geo_ddeg(Vector3::new(52.0, 4.0, 0.0));
        let sats = constellation(
            &user,
            &[(40.0, 100.0), (40.1, 100.1), (40.2, 100.0), (40.0, 100.2), (40.1, 100.2)],
        );
        assert_eq!(
            DilutionOfPrecision::new(&user, &sats, 100.0),
            Err(UnavailableReason::DegenerateGeometry)
        );
    }
}

use crate::prelude::Vector3;
use map_3d::{deg2rad, ecef2geodetic, geodetic2ecef, rad2deg, Ellipsoid};
use std::f64::consts::PI;

/// User [Position], expressed both in ECEF and WGS84 geodetic coordinates.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// ECEF coordinates in meters
    ecef: Vector3<f64>,
    /// Geodetic coordinates in radians
    geodetic: Vector3<f64>,
}

impl Position {
    /// Returns Geodetic coordinates in decimal degrees
    pub fn geodetic_ddeg(&self) -> Vector3<f64> {
        Vector3::<f64>::new(
            rad2deg(self.geodetic[0]),
            rad2deg(self.geodetic[1]),
            self.geodetic[2],
        )
    }
    /// Returns Geodetic coordinates
    /// - latitude [rad]
    /// - longitude [rad]
    /// - altitude above the ellipsoid [m]
    pub fn geodetic_rad(&self) -> Vector3<f64> {
        self.geodetic
    }
    /// Returns coordinates in ECEF [m]
    pub fn ecef(&self) -> Vector3<f64> {
        self.ecef
    }
    /// True if all coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.ecef.iter().all(|v| v.is_finite()) && self.geodetic.iter().all(|v| v.is_finite())
    }
    /// Builds Self from ECEF position [m]
    pub fn from_ecef(ecef: Vector3<f64>) -> Self {
        let (x, y, z) = (ecef[0], ecef[1], ecef[2]);
        let (lat, lon, h) = ecef2geodetic(x, y, z, Ellipsoid::WGS84);
        Self {
            ecef,
            geodetic: Vector3::new(lat, lon, h),
        }
    }
    /// Builds Self from Geodetic coordinates (latitude [ddeg], longitude [ddeg], altitude [m])
    pub fn from_geo_ddeg(coords: Vector3<f64>) -> Self {
        let rad = Vector3::<f64>::new(deg2rad(coords[0]), deg2rad(coords[1]), coords[2]);
        Self::from_geo_rad(rad)
    }
    /// Builds Self from Geodetic coordinates (latitude [rad], longitude [rad], altitude [m])
    pub fn from_geo_rad(coords: Vector3<f64>) -> Self {
        let (x, y, z) = geodetic2ecef(coords[0], coords[1], coords[2], Ellipsoid::WGS84);
        Self {
            geodetic: coords,
            ecef: Vector3::new(x, y, z),
        }
    }
    /// Euclidean distance [m] between Self and given ECEF coordinates
    pub fn distance_m(&self, ecef: &Vector3<f64>) -> f64 {
        (ecef - self.ecef).norm()
    }
    /// ECEF to local East North Up rotation matrix, rows being E, N, U.
    pub(crate) fn ecef_to_enu(&self) -> nalgebra::Matrix3<f64> {
        let (lat, lon) = (self.geodetic[0], self.geodetic[1]);
        nalgebra::Matrix3::<f64>::new(
            -lon.sin(),
            lon.cos(),
            0.0_f64,
            -lat.sin() * lon.cos(),
            -lat.sin() * lon.sin(),
            lat.cos(),
            lat.cos() * lon.cos(),
            lat.cos() * lon.sin(),
            lat.sin(),
        )
    }
    /// Computes (elevation, azimuth) angles [rad] of given ECEF position
    /// in the sky, as seen from Self. Azimuth is counted clockwise from North, in [0, 2π[.
    pub fn elevation_azimuth_rad(&self, ecef: &Vector3<f64>) -> (f64, f64) {
        let los = ecef - self.ecef;
        let norm = los.norm();
        if norm == 0.0 {
            return (PI / 2.0, 0.0);
        }
        let enu = self.ecef_to_enu() * (los / norm);
        let el = enu[2].clamp(-1.0, 1.0).asin();
        let mut az = enu[0].atan2(enu[1]);
        if az < 0.0 {
            az += 2.0 * PI;
        }
        (el, az)
    }
    /// Returns the ECEF position located at given range [m], elevation and azimuth [rad]
    /// as seen from Self.
    pub fn look_at(&self, range_m: f64, elevation_rad: f64, azimuth_rad: f64) -> Vector3<f64> {
        let enu = Vector3::<f64>::new(
            elevation_rad.cos() * azimuth_rad.sin(),
            elevation_rad.cos() * azimuth_rad.cos(),
            elevation_rad.sin(),
        );
        self.ecef + self.ecef_to_enu().transpose() * enu * range_m
    }
}

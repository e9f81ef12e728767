use crate::prelude::{Epoch, Position, Vector3};

/// [PositionFix] is one location reported by the positioning source.
/// It is immutable once received.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// Latitude [ddeg]
    pub latitude_ddeg: f64,
    /// Longitude [ddeg]
    pub longitude_ddeg: f64,
    /// Altitude above the WGS84 ellipsoid [m]
    pub altitude_m: f64,
    /// Horizontal accuracy estimate [m]
    pub horizontal_accuracy_m: f64,
    /// Vertical accuracy estimate [m]
    pub vertical_accuracy_m: f64,
    /// Instantaneous ground speed [m/s]
    pub speed_m_s: f64,
    /// Course over ground [ddeg]
    pub course_ddeg: f64,
}

impl PositionFix {
    /// Builds new static [PositionFix] from geodetic coordinates.
    /// Accuracies are unknown (NaN) until specified.
    pub fn new(epoch: Epoch, latitude_ddeg: f64, longitude_ddeg: f64, altitude_m: f64) -> Self {
        Self {
            epoch,
            latitude_ddeg,
            longitude_ddeg,
            altitude_m,
            horizontal_accuracy_m: f64::NAN,
            vertical_accuracy_m: f64::NAN,
            speed_m_s: 0.0,
            course_ddeg: 0.0,
        }
    }
    /// Copies and returns with (horizontal, vertical) accuracy estimates [m]
    pub fn with_accuracy(&self, horizontal_m: f64, vertical_m: f64) -> Self {
        let mut s = *self;
        s.horizontal_accuracy_m = horizontal_m;
        s.vertical_accuracy_m = vertical_m;
        s
    }
    /// Copies and returns with ground speed [m/s] and course [ddeg]
    pub fn with_velocity(&self, speed_m_s: f64, course_ddeg: f64) -> Self {
        let mut s = *self;
        s.speed_m_s = speed_m_s;
        s.course_ddeg = course_ddeg;
        s
    }
    /// True if coordinates are usable. Accuracies, speed and course do not
    /// contribute to integrity monitoring and are not verified.
    pub fn is_valid(&self) -> bool {
        self.latitude_ddeg.is_finite()
            && self.longitude_ddeg.is_finite()
            && self.altitude_m.is_finite()
            && self.latitude_ddeg.abs() <= 90.0
            && self.longitude_ddeg.abs() <= 180.0
    }
    /// Returns user [Position]
    pub fn position(&self) -> Position {
        Position::from_geo_ddeg(Vector3::new(
            self.latitude_ddeg,
            self.longitude_ddeg,
            self.altitude_m,
        ))
    }
}

#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod catalog;
mod cfg;
mod classifier;
mod fix;
mod geometry;
mod monitor;
mod navigation;
mod observation;
mod position;
mod solutions;
mod stats;
mod status;

#[cfg(test)]
mod tests;

// pub export
pub use cfg::Error;

// prelude
pub mod prelude {
    pub use crate::catalog::SatelliteCatalog;
    pub use crate::cfg::{Config, Error as ConfigError};
    pub use crate::fix::PositionFix;
    pub use crate::geometry::GeometryFilter;
    pub use crate::monitor::IntegrityMonitor;
    pub use crate::navigation::{
        detection::{FaultDetector, TestOutcome},
        dop::DilutionOfPrecision,
        exclusion::{Exclusion, FaultExcluder},
        protection::ProtectionLevels,
        Residual,
    };
    pub use crate::observation::SatelliteObservation;
    pub use crate::position::Position;
    pub use crate::solutions::RAIMResult;
    pub use crate::status::{CautionReason, Quality, RAIMStatus, UnavailableReason};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale, Unit};
    pub use nalgebra::Vector3;
}

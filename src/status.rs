use crate::prelude::SV;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Integrity [Quality] grade, when RAIM is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Quality {
    Marginal,
    Adequate,
    Good,
    Excellent,
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Adequate => write!(f, "adequate"),
            Self::Marginal => write!(f, "marginal"),
        }
    }
}

/// Reasons why integrity cannot be monitored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum UnavailableReason {
    /// No satellite catalog received yet, or positioning source lost its fix
    NoSatelliteData,
    /// Less than 4 usable SV: no position solution
    InsufficientSatellites,
    /// Solvable, but below the fault detection minimum
    InsufficientForDetection(usize),
    /// Singular or near singular geometry (DOP out of range)
    DegenerateGeometry,
    /// Statistical test cannot be defined (no redundancy)
    UndefinedThreshold,
    /// Position fix is not usable
    InvalidPositionFix,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NoSatelliteData => write!(f, "no satellite data"),
            Self::InsufficientSatellites => write!(f, "insufficient satellites"),
            Self::InsufficientForDetection(min) => {
                write!(f, "need ≥{} satellites for RAIM", min)
            },
            Self::DegenerateGeometry => write!(f, "degenerate satellite geometry"),
            Self::UndefinedThreshold => write!(f, "undefined detection threshold"),
            Self::InvalidPositionFix => write!(f, "invalid position fix"),
        }
    }
}

/// Reasons to warn the user while integrity is not formally lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CautionReason {
    /// Fault detected, but not enough SV to attempt its exclusion
    CannotIsolate,
    /// Fault detected, but no single measurement stands out
    UnableToIsolate,
    /// Fault free, but a protection level exceeds the configured alert limit
    AlertLimitExceeded,
}

impl std::fmt::Display for CautionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::CannotIsolate => write!(f, "fault detected, cannot isolate"),
            Self::UnableToIsolate => write!(f, "fault detected but unable to isolate"),
            Self::AlertLimitExceeded => write!(f, "protection level exceeds alert limit"),
        }
    }
}

/// [RAIMStatus] of one evaluation. There is no terminal state:
/// a new evaluation always supersedes the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum RAIMStatus {
    Available(Quality),
    Caution(CautionReason),
    Unavailable(UnavailableReason),
    /// Faulty SV(s), sorted by decreasing residual
    FaultDetected(Vec<SV>),
}

impl RAIMStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
    pub fn is_fault_detected(&self) -> bool {
        matches!(self, Self::FaultDetected(_))
    }
    pub fn quality(&self) -> Option<Quality> {
        match self {
            Self::Available(quality) => Some(*quality),
            _ => None,
        }
    }
}

impl std::fmt::Display for RAIMStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Available(quality) => write!(f, "available ({})", quality),
            Self::Caution(reason) => write!(f, "caution: {}", reason),
            Self::Unavailable(reason) => write!(f, "unavailable: {}", reason),
            Self::FaultDetected(svs) => {
                write!(f, "fault detected:")?;
                for sv in svs {
                    write!(f, " {}", sv)?;
                }
                Ok(())
            },
        }
    }
}

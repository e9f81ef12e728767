use log::debug;

use crate::{
    navigation::{
        detection::TestOutcome, dop::DilutionOfPrecision, exclusion::Exclusion,
        protection::ProtectionLevels,
    },
    prelude::{Config, Epoch, RAIMResult, SV},
    status::{CautionReason, Quality, RAIMStatus, UnavailableReason},
};

/// Everything gathered along one evaluation, prior classification
#[derive(Debug, Clone, Default)]
pub(crate) struct Assessment {
    /// Usable SV
    pub satellites: Vec<SV>,
    /// Dead end reached along the way
    pub unavailable: Option<UnavailableReason>,
    pub dop: Option<DilutionOfPrecision>,
    pub protection: Option<ProtectionLevels>,
    pub outcome: Option<TestOutcome>,
    pub exclusion: Option<Exclusion>,
    pub post_exclusion_consistent: Option<bool>,
}

impl Assessment {
    pub fn new(satellites: Vec<SV>) -> Self {
        Self {
            satellites,
            ..Default::default()
        }
    }
    pub fn fault(&self) -> bool {
        self.outcome.as_ref().is_some_and(|outcome| outcome.fault)
    }
}

/// [Classifier] maps the evaluation outputs to a [RAIMStatus].
pub(crate) struct Classifier<'a> {
    cfg: &'a Config,
}

impl<'a> Classifier<'a> {
    /// (HPL upper bound [m], minimal SV count), most restrictive first
    const GRADES: [(Quality, f64, usize); 4] = [
        (Quality::Excellent, 10.0, 8),
        (Quality::Good, 25.0, 6),
        (Quality::Adequate, 40.0, 5),
        (Quality::Marginal, f64::INFINITY, 5),
    ];

    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }

    /// Grades a fault free solution
    pub fn grade(hpl_m: f64, satellites: usize) -> Option<Quality> {
        Self::GRADES
            .iter()
            .find(|(_, max_hpl, min_sv)| hpl_m < *max_hpl && satellites >= *min_sv)
            .map(|(quality, _, _)| *quality)
    }

    /// Evaluates the [RAIMStatus]: rules apply in order.
    pub fn status(&self, assessment: &Assessment) -> RAIMStatus {
        let count = assessment.satellites.len();

        if count < 4 {
            return RAIMStatus::Unavailable(UnavailableReason::InsufficientSatellites);
        }
        if count < self.cfg.min_sv_fd {
            return RAIMStatus::Unavailable(UnavailableReason::InsufficientForDetection(
                self.cfg.min_sv_fd,
            ));
        }
        if let Some(reason) = assessment.unavailable {
            return RAIMStatus::Unavailable(reason);
        }

        if assessment.fault() {
            return match &assessment.exclusion {
                Some(Exclusion::Isolated(faulty)) if !faulty.is_empty() => {
                    RAIMStatus::FaultDetected(faulty.clone())
                },
                Some(Exclusion::Insufficient) => RAIMStatus::Caution(CautionReason::CannotIsolate),
                _ => RAIMStatus::Caution(CautionReason::UnableToIsolate),
            };
        }

        let protection = match assessment.protection {
            Some(protection) => protection,
            None => return RAIMStatus::Unavailable(UnavailableReason::DegenerateGeometry),
        };

        match Self::grade(protection.hpl_m, count) {
            Some(quality) => {
                if protection.exceeds(self.cfg.hal_m, self.cfg.val_m) {
                    RAIMStatus::Caution(CautionReason::AlertLimitExceeded)
                } else {
                    RAIMStatus::Available(quality)
                }
            },
            None => RAIMStatus::Unavailable(UnavailableReason::InsufficientForDetection(
                self.cfg.min_sv_fd,
            )),
        }
    }

    /// Classifies this [Assessment] and forms the [RAIMResult]
    pub fn classify(&self, epoch: Option<Epoch>, assessment: Assessment) -> RAIMResult {
        let status = self.status(&assessment);
        debug!("{:?} - {}", epoch, status);
        RAIMResult::new(epoch, status, assessment)
    }
}

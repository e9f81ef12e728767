use log::debug;

use crate::{
    navigation::Residual,
    prelude::{Config, Position, SatelliteObservation},
    stats::chi2_quantile_upper,
    status::UnavailableReason,
};

/// Outcome of the chi-square consistency test
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    /// True when the test statistic exceeds the threshold
    pub fault: bool,
    /// Σ(r²/σ²)
    pub statistic: f64,
    /// Detection threshold
    pub threshold: f64,
    /// Degrees of freedom (N - 4)
    pub dof: usize,
    /// Residuals that contributed
    pub residuals: Vec<Residual>,
}

/// [FaultDetector] tests the pseudo range residuals consistency,
/// with a false alarm rate defined by the [Config].
#[derive(Debug, Clone)]
pub struct FaultDetector<'a> {
    cfg: &'a Config,
}

impl<'a> FaultDetector<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }

    /// Chi-square detection threshold for `n` SV, None when undefined.
    pub fn threshold(&self, n: usize) -> Option<f64> {
        let dof = n.checked_sub(4)?;
        chi2_quantile_upper(self.cfg.pfa, dof)
    }

    /// Runs the consistency test. This is side effect free.
    pub fn test(
        &self,
        user: &Position,
        satellites: &[SatelliteObservation],
    ) -> Result<TestOutcome, UnavailableReason> {
        let n = satellites.len();
        if n < self.cfg.min_sv_fd {
            return Err(UnavailableReason::InsufficientSatellites);
        }

        let threshold = self
            .threshold(n)
            .ok_or(UnavailableReason::UndefinedThreshold)?;

        let residuals = Residual::compute(user, satellites);

        let variance = self.cfg.sigma_m.powi(2);
        let statistic = residuals
            .iter()
            .map(|res| res.value_m.powi(2) / variance)
            .sum::<f64>();

        if !statistic.is_finite() {
            return Err(UnavailableReason::UndefinedThreshold);
        }

        debug!(
            "chi2 test: statistic={:.3} threshold={:.3} (dof={})",
            statistic,
            threshold,
            n - 4
        );

        Ok(TestOutcome {
            fault: statistic > threshold,
            statistic,
            threshold,
            dof: n - 4,
            residuals,
        })
    }
}

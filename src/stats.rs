//! Chi-square and normal distribution toolkit used by the statistical tests.
use std::f64::consts::PI;

/// Convergence criteria of the iterative evaluations
const EPSILON: f64 = 1.0E-14;

/// Maximal number of iterations of the iterative evaluations
const MAX_ITER: usize = 500;

/// Lanczos approximation (g=7, n=9) of ln(Γ(x)), for x > 0.
pub(crate) fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        // reflection formula
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut a = COEFFS[0];
    let t = x + G + 0.5;
    for (i, c) in COEFFS.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

/// Regularized lower incomplete gamma P(a, x), series representation (x < a + 1).
fn gamma_p_series(a: f64, x: f64) -> f64 {
    let mut ap = a;
    let mut del = 1.0 / a;
    let mut sum = del;
    for _ in 0..MAX_ITER {
        ap += 1.0;
        del *= x / ap;
        sum += del;
        if del.abs() < sum.abs() * EPSILON {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

/// Regularized upper incomplete gamma Q(a, x), continued fraction (x >= a + 1).
fn gamma_q_continued_fraction(a: f64, x: f64) -> f64 {
    const TINY: f64 = 1.0E-300;
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..MAX_ITER {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + an / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < EPSILON {
            break;
        }
    }
    (-x + a * x.ln() - ln_gamma(a)).exp() * h
}

/// Regularized upper incomplete gamma function Q(a, x) = 1 - P(a, x).
pub(crate) fn gamma_q(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        1.0
    } else if x < a + 1.0 {
        1.0 - gamma_p_series(a, x)
    } else {
        gamma_q_continued_fraction(a, x)
    }
}

/// Regularized lower incomplete gamma function P(a, x).
pub(crate) fn gamma_p(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else if x < a + 1.0 {
        gamma_p_series(a, x)
    } else {
        1.0 - gamma_q_continued_fraction(a, x)
    }
}

/// Chi-square cumulative distribution function with `dof` degrees of freedom.
/// Returns None when dof is null.
pub fn chi2_cdf(x: f64, dof: usize) -> Option<f64> {
    if dof == 0 || x.is_nan() {
        return None;
    }
    Some(gamma_p(dof as f64 / 2.0, x / 2.0).clamp(0.0, 1.0))
}

/// Chi-square survival function (right tail probability).
pub fn chi2_sf(x: f64, dof: usize) -> Option<f64> {
    if dof == 0 || x.is_nan() {
        return None;
    }
    Some(gamma_q(dof as f64 / 2.0, x / 2.0).clamp(0.0, 1.0))
}

fn chi2_pdf(x: f64, dof: usize) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let k = dof as f64 / 2.0;
    ((k - 1.0) * x.ln() - x / 2.0 - k * 2.0_f64.ln() - ln_gamma(k)).exp()
}

/// Standard normal cumulative distribution function
pub fn normal_cdf(x: f64) -> f64 {
    if x < 0.0 {
        0.5 * gamma_q(0.5, x * x / 2.0)
    } else {
        1.0 - 0.5 * gamma_q(0.5, x * x / 2.0)
    }
}

/// Acklam's rational approximation of the standard normal quantile function,
/// refined with one Halley step. `p` must lie within ]0, 1[.
pub fn normal_quantile(p: f64) -> Option<f64> {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.02425;

    if !(p > 0.0 && p < 1.0) {
        return None;
    }

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    let x = if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    };

    // Halley refinement
    let e = normal_cdf(x) - p;
    let u = e * (2.0 * PI).sqrt() * (x * x / 2.0).exp();
    Some(x - u / (1.0 + x * u / 2.0))
}

/// One-sided normal multiplier: returns k such that P(X > k) = alpha.
/// The evaluation is performed on the lower tail to preserve precision for small alpha.
pub fn normal_upper_quantile(alpha: f64) -> Option<f64> {
    normal_quantile(alpha).map(|x| -x)
}

/// Wilson-Hilferty approximation of the chi-square right tail quantile.
fn wilson_hilferty(alpha: f64, dof: usize) -> Option<f64> {
    let k = dof as f64;
    let z = normal_upper_quantile(alpha)?;
    let h = 2.0 / (9.0 * k);
    Some(k * (1.0 - h + z * h.sqrt()).powi(3).max(0.0))
}

/// Returns the chi-square threshold T such that P(X > T) = alpha, X following a
/// chi-square distribution with `dof` degrees of freedom.
/// Closed forms are used for 1 and 2 degrees of freedom. Larger dof are
/// obtained from the Wilson-Hilferty approximation, refined by safeguarded
/// Newton iterations on the exact right tail.
/// Returns None for null dof or alpha outside ]0, 1[.
pub fn chi2_quantile_upper(alpha: f64, dof: usize) -> Option<f64> {
    if dof == 0 || !(alpha > 0.0 && alpha < 1.0) {
        return None;
    }
    match dof {
        1 => {
            let z = normal_upper_quantile(alpha / 2.0)?;
            Some(z * z)
        },
        2 => Some(-2.0 * alpha.ln()),
        _ => {
            let mut x = wilson_hilferty(alpha, dof)?;
            if x <= 0.0 {
                x = dof as f64;
            }

            // maintain a bracket: sf(lo) > alpha > sf(hi)
            let (mut lo, mut hi) = (0.0_f64, f64::INFINITY);

            for _ in 0..MAX_ITER {
                let sf = chi2_sf(x, dof)?;
                if sf > alpha {
                    lo = x;
                } else {
                    hi = x;
                }

                let pdf = chi2_pdf(x, dof);
                let mut next = if pdf > 0.0 {
                    x + (sf - alpha) / pdf
                } else {
                    f64::NAN
                };

                if !(next > lo && next < hi) {
                    next = if hi.is_finite() {
                        (lo + hi) / 2.0
                    } else {
                        2.0 * x.max(1.0)
                    };
                }

                if (next - x).abs() <= 1.0E-12 * x.max(1.0) {
                    return Some(next);
                }
                x = next;
            }
            Some(x)
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[test]
    fn gamma_function() {
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1.0E-12);
        assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < 1.0E-12);
        assert!((ln_gamma(10.0) - 362880.0_f64.ln()).abs() < 1.0E-10);
    }

    #[rstest]
    #[case(0.05, 1, 3.841459)]
    #[case(0.05, 2, 5.991465)]
    #[case(0.01, 3, 11.344867)]
    #[case(0.05, 4, 9.487729)]
    #[case(0.05, 10, 18.307038)]
    #[case(0.01, 10, 23.209251)]
    #[case(0.05, 30, 43.772972)]
    #[case(0.001, 5, 20.515006)]
    fn chi2_critical_values(#[case] alpha: f64, #[case] dof: usize, #[case] expected: f64) {
        let t = chi2_quantile_upper(alpha, dof).unwrap();
        assert!(
            (t - expected).abs() < 1.0E-4,
            "chi2({}, {}) = {} expecting {}",
            alpha,
            dof,
            t,
            expected
        );
        let sf = chi2_sf(t, dof).unwrap();
        assert!((sf - alpha).abs() < 1.0E-8, "sf({})={}", t, sf);
    }

    #[test]
    fn chi2_threshold_monotonic() {
        let pfa = 1.0 / 15000.0;
        let mut prev = 0.0;
        for dof in 1..40 {
            let t = chi2_quantile_upper(pfa, dof).unwrap();
            assert!(t > prev, "dof={} threshold={} not increasing", dof, t);
            prev = t;
        }
    }

    #[test]
    fn chi2_undefined() {
        assert!(chi2_quantile_upper(0.01, 0).is_none());
        assert!(chi2_quantile_upper(0.0, 3).is_none());
        assert!(chi2_quantile_upper(1.0, 3).is_none());
        assert!(chi2_cdf(1.0, 0).is_none());
    }

    #[test]
    fn chi2_distribution() {
        assert!((chi2_cdf(3.841459, 1).unwrap() - 0.95).abs() < 1.0E-6);
        assert_eq!(chi2_cdf(0.0, 4), Some(0.0));
        assert!((chi2_cdf(2.0, 2).unwrap() - (1.0 - (-1.0_f64).exp())).abs() < 1.0E-12);
    }

    #[rstest]
    #[case(0.5, 0.0)]
    #[case(0.975, 1.959964)]
    #[case(0.025, -1.959964)]
    #[case(0.999, 3.090232)]
    #[case(1.0E-7, -5.199338)]
    fn normal_quantiles(#[case] p: f64, #[case] expected: f64) {
        let x = normal_quantile(p).unwrap();
        assert!((x - expected).abs() < 1.0E-6, "q({})={}", p, x);
    }

    #[test]
    fn normal_multiplier() {
        let k = normal_upper_quantile(1.0E-3).unwrap();
        assert!((k - 3.090232).abs() < 1.0E-6);
        assert!(normal_quantile(0.0).is_none());
        assert!(normal_quantile(1.0).is_none());
    }
}

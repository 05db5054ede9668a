//! Descriptive statistics and the two hypothesis tests of the report.
//!
//! - `independent_t_test`: Student's two-sample t-test, pooled variance,
//!   two-sided alternative.
//! - `pearson`: product-moment correlation with its two-sided t-based test.
//!
//! Both p-values come from the Student t CDF, expressed through the
//! regularized incomplete beta function I_x(a, b).

use crate::error::{DeskError, DeskResult};
use serde::{Deserialize, Serialize};

const BETA_MAX_ITER: usize = 300;
const BETA_EPS: f64 = 3.0e-14;
const BETA_FPMIN: f64 = 1.0e-300;

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TTestResult {
    pub mean_a: f64,
    pub mean_b: f64,
    /// mean_a - mean_b
    pub mean_difference: f64,
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
    pub significant: bool,
}

/// Sum of squared deviations from the mean.
fn sum_squares(xs: &[f64]) -> f64 {
    let m = mean(xs);
    xs.iter().map(|x| (x - m).powi(2)).sum()
}

/// Two-sample t-test assuming equal variances.
///
/// A one-row group is allowed as long as the pooled variance has at
/// least one degree of freedom.
pub fn independent_t_test(a: &[f64], b: &[f64], alpha: f64) -> DeskResult<TTestResult> {
    for sample in [a, b] {
        if sample.is_empty() {
            return Err(DeskError::InsufficientSample {
                test: "t-test",
                needed: 1,
                actual: 0,
            });
        }
    }
    if a.len() + b.len() < 3 {
        return Err(DeskError::InsufficientSample {
            test: "t-test",
            needed: 3,
            actual: a.len() + b.len(),
        });
    }
    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (mean_a, mean_b) = (mean(a), mean(b));
    let df = na + nb - 2.0;
    let pooled = (sum_squares(a) + sum_squares(b)) / df;
    let se = (pooled * (1.0 / na + 1.0 / nb)).sqrt();
    let diff = mean_a - mean_b;

    let t = if se > 0.0 {
        diff / se
    } else if diff == 0.0 {
        0.0
    } else {
        diff.signum() * f64::INFINITY
    };
    let p_value = student_t_two_sided_p(t, df);

    Ok(TTestResult {
        mean_a,
        mean_b,
        mean_difference: diff,
        t_statistic: t,
        degrees_of_freedom: df,
        p_value,
        significant: p_value < alpha,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PearsonResult {
    pub r: f64,
    pub p_value: f64,
    pub n: usize,
    pub significant: bool,
}

pub fn pearson(x: &[f64], y: &[f64], alpha: f64) -> DeskResult<PearsonResult> {
    if x.len() != y.len() {
        return Err(anyhow::anyhow!(
            "pearson: sample lengths differ ({} vs {})",
            x.len(),
            y.len()
        )
        .into());
    }
    let n = x.len();
    if n < 3 {
        return Err(DeskError::InsufficientSample {
            test: "pearson",
            needed: 3,
            actual: n,
        });
    }
    let (mx, my) = (mean(x), mean(y));
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let (dx, dy) = (xi - mx, yi - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return Err(anyhow::anyhow!("pearson: input is constant, correlation undefined").into());
    }
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);

    let df = (n - 2) as f64;
    let p_value = if r.abs() >= 1.0 {
        0.0
    } else {
        let t = r * (df / (1.0 - r * r)).sqrt();
        student_t_two_sided_p(t, df)
    };

    Ok(PearsonResult {
        r,
        p_value,
        n,
        significant: p_value < alpha,
    })
}

/// P(|T| >= |t|) for Student's t with `df` degrees of freedom.
pub fn student_t_two_sided_p(t: f64, df: f64) -> f64 {
    if t.is_nan() {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    let x = df / (df + t * t);
    regularized_incomplete_beta(x, df / 2.0, 0.5).clamp(0.0, 1.0)
}

/// I_x(a, b) via the Lentz continued fraction.
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    // The fraction converges fast only below the mean; use symmetry above it.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_continued_fraction(1.0 - x, b, a) / b
    }
}

fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < BETA_FPMIN {
        d = BETA_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=BETA_MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETA_FPMIN {
            d = BETA_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETA_FPMIN {
            c = BETA_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETA_FPMIN {
            d = BETA_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETA_FPMIN {
            c = BETA_FPMIN;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < BETA_EPS {
            break;
        }
    }
    h
}

/// ln Γ(x) for x > 0 (Lanczos, g = 7, n = 9).
pub fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEF: [f64; 9] = [
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
        // Reflection: Γ(x)Γ(1-x) = π / sin(πx)
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut acc = COEF[0];
    for (i, c) in COEF.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + G + 0.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

//! Satisfaction drivers and the statistical tests behind them.

use super::ReportSection;
use crate::{
    config::ReportConfig,
    error::{DeskError, DeskResult},
    grouping::{group_by, mean_of},
    interaction::{round_to, Resolution},
    stats::{independent_t_test, pearson, PearsonResult, TTestResult},
    table::InteractionTable,
    types::Label,
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionSatisfaction {
    pub resolution: Resolution,
    pub count: usize,
    pub avg_satisfaction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitBucketStats {
    pub label: Label,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// Rounded to 2 decimals; `None` for an empty bucket.
    pub avg_satisfaction: Option<f64>,
}

impl WaitBucketStats {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatisfactionView {
    /// Highest mean satisfaction first.
    pub by_resolution: Vec<ResolutionSatisfaction>,
    /// group a = first-contact resolutions, group b = everything else.
    /// `None` when the groups are too small to test.
    pub fcr_test: Option<TTestResult>,
    /// `None` when wait or satisfaction is constant.
    pub wait_correlation: Option<PearsonResult>,
    pub wait_buckets: Vec<WaitBucketStats>,
    pub alpha: f64,
}

impl SatisfactionView {
    pub fn compute(table: &InteractionTable, config: &ReportConfig) -> DeskResult<Self> {
        let rows = table.require_rows()?;

        let mut by_resolution: Vec<ResolutionSatisfaction> = group_by(rows, |r| r.resolution)
            .into_iter()
            .map(|(resolution, group)| ResolutionSatisfaction {
                resolution,
                count: group.len(),
                avg_satisfaction: mean_of(&group, |r| r.satisfaction_score),
            })
            .collect();
        by_resolution.sort_by(|a, b| b.avg_satisfaction.total_cmp(&a.avg_satisfaction));

        let (fcr, non_fcr): (Vec<f64>, Vec<f64>) = {
            let mut fcr = Vec::new();
            let mut other = Vec::new();
            for r in rows {
                if r.is_first_contact() {
                    fcr.push(r.satisfaction_score);
                } else {
                    other.push(r.satisfaction_score);
                }
            }
            (fcr, other)
        };
        let fcr_test = skip_untestable(independent_t_test(&fcr, &non_fcr, config.alpha))?;

        let waits: Vec<f64> = rows.iter().map(|r| r.wait_time_min).collect();
        let sats: Vec<f64> = rows.iter().map(|r| r.satisfaction_score).collect();
        let wait_correlation = skip_untestable(pearson(&waits, &sats, config.alpha))?;

        let edges = &config.wait_bucket_edges;
        let last = edges.len().saturating_sub(2);
        let wait_buckets = edges
            .windows(2)
            .zip(&config.wait_bucket_labels)
            .enumerate()
            .map(|(i, (bounds, label))| {
                let (lower, upper) = (bounds[0], bounds[1]);
                let members: Vec<f64> = rows
                    .iter()
                    .filter(|r| {
                        let w = r.wait_time_min;
                        w >= lower && (w < upper || (i == last && w == upper))
                    })
                    .map(|r| r.satisfaction_score)
                    .collect();
                WaitBucketStats {
                    label: label.clone(),
                    lower,
                    upper,
                    count: members.len(),
                    avg_satisfaction: (!members.is_empty())
                        .then(|| round_to(members.iter().sum::<f64>() / members.len() as f64, 2)),
                }
            })
            .collect();

        Ok(Self {
            by_resolution,
            fcr_test,
            wait_correlation,
            wait_buckets,
            alpha: config.alpha,
        })
    }

    /// Whether first-contact resolutions score significantly differently.
    pub fn fcr_lift_significant(&self) -> bool {
        self.fcr_test.as_ref().map_or(false, |t| t.significant)
    }

    /// Whether longer waits significantly lower satisfaction.
    pub fn wait_hurts_satisfaction(&self) -> bool {
        self.wait_correlation
            .as_ref()
            .map_or(false, |c| c.significant && c.r < 0.0)
    }

    /// Lower edge of the bucket after which mean satisfaction falls the
    /// most, compared with the preceding non-empty bucket.
    pub fn steepest_drop_threshold(&self) -> Option<f64> {
        let filled: Vec<(f64, f64)> = self
            .wait_buckets
            .iter()
            .filter_map(|b| b.avg_satisfaction.map(|s| (b.lower, s)))
            .collect();
        filled
            .windows(2)
            .map(|w| (w[1].0, w[0].1 - w[1].1))
            .filter(|(_, drop)| *drop > 0.0)
            .fold(None, |best: Option<(f64, f64)>, cur| match best {
                Some(b) if b.1 >= cur.1 => Some(b),
                _ => Some(cur),
            })
            .map(|(edge, _)| edge)
    }
}

/// Too-small or constant input leaves a test out of the section instead
/// of failing it; any other error still propagates.
fn skip_untestable<T>(result: DeskResult<T>) -> DeskResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err @ (DeskError::InsufficientSample { .. } | DeskError::Other(_))) => {
            log::warn!("satisfaction: test skipped: {err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

impl ReportSection for SatisfactionView {
    fn title(&self) -> &'static str {
        "5. SATISFACTION DRIVERS & STATISTICAL ANALYSIS"
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "\nSatisfaction by Resolution Type:")?;
        for r in &self.by_resolution {
            writeln!(out, "  {:<30} {:.2}/5.0", r.resolution.label(), r.avg_satisfaction)?;
        }

        writeln!(out, "\nT-Test: First Contact Resolution Impact on Satisfaction")?;
        match &self.fcr_test {
            Some(t) => {
                writeln!(out, "  FCR Avg Satisfaction:     {:.2}", t.mean_a)?;
                writeln!(out, "  Non-FCR Avg Satisfaction: {:.2}", t.mean_b)?;
                writeln!(out, "  Difference:              {:+.2}", t.mean_difference)?;
                writeln!(out, "  t-statistic:             {:.4}", t.t_statistic)?;
                writeln!(out, "  p-value:                 {:.6}", t.p_value)?;
            }
            None => {
                writeln!(out, "  t-statistic:             NaN")?;
                writeln!(out, "  p-value:                 NaN")?;
            }
        }
        let verdict = if self.fcr_lift_significant() {
            format!("Yes (p < {})", self.alpha)
        } else {
            "No".to_string()
        };
        writeln!(out, "  Significant:             {verdict}")?;

        writeln!(out, "\nCorrelation: Wait Time vs Satisfaction")?;
        match &self.wait_correlation {
            Some(c) => writeln!(out, "  r = {:.4}, p = {:.6}", c.r, c.p_value)?,
            None => writeln!(out, "  r = NaN, p = NaN")?,
        }
        let verdict = match &self.wait_correlation {
            Some(c) if c.significant && c.r < 0.0 => "Significant negative correlation",
            Some(c) if c.significant => "Significant positive correlation",
            _ => "Not significant",
        };
        writeln!(out, "  {verdict}")?;

        writeln!(out, "\nSatisfaction by Wait Time:")?;
        for b in self.wait_buckets.iter().filter(|b| !b.is_empty()) {
            if let Some(avg) = b.avg_satisfaction {
                writeln!(out, "  {:<12} n={:>5}  Sat: {:.2}", b.label, b.count, avg)?;
            }
        }
        Ok(())
    }
}

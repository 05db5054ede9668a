//! Key findings and process improvement recommendations.
//!
//! Nothing here is computed from the table directly: every number is an
//! argmax/argmin lookup over the other sections, interpolated into fixed
//! sentences.

use super::{ChannelView, KpiView, ReportSection, SatisfactionView, VolumeView};
use crate::{grouping::argmax_by, grouping::argmin_by, types::Label};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

const UNKNOWN: &str = "n/a";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub fcr_pct: f64,
    /// `None` when the FCR t-test could not be run.
    pub fcr_satisfaction_lift: Option<f64>,
    pub fcr_lift_significant: bool,
    pub busiest_channel: Label,
    pub busiest_channel_share_pct: f64,
    pub busiest_channel_has_highest_wait: bool,
    pub highest_wait_department: Label,
    pub highest_wait_minutes: f64,
    pub lowest_fcr_department: Label,
    pub peak_day: Label,
    pub peak_slot: Label,
    pub satisfaction_drop_threshold: Option<f64>,
    pub wait_correlation_negative: bool,
    pub escalation_pct: f64,
    pub alpha: f64,
    pub findings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Recommendations {
    pub fn derive(
        kpis: &KpiView,
        volume: &VolumeView,
        channels: &ChannelView,
        satisfaction: &SatisfactionView,
    ) -> Self {
        let busiest = argmax_by(&channels.channels, |c| c.share_pct);
        let slowest_channel = argmax_by(&channels.channels, |c| c.metrics.avg_wait);
        let highest_wait = argmax_by(&kpis.departments, |d| d.metrics.avg_wait);
        let lowest_fcr = argmin_by(&kpis.departments, |d| d.metrics.fcr_pct);

        let mut rec = Self {
            fcr_pct: kpis.global.fcr_pct,
            fcr_satisfaction_lift: satisfaction.fcr_test.as_ref().map(|t| t.mean_difference),
            fcr_lift_significant: satisfaction.fcr_lift_significant(),
            busiest_channel: busiest.map_or_else(|| UNKNOWN.into(), |c| c.channel.clone()),
            busiest_channel_share_pct: busiest.map_or(0.0, |c| c.share_pct),
            busiest_channel_has_highest_wait: matches!(
                (busiest, slowest_channel),
                (Some(a), Some(b)) if a.channel == b.channel
            ),
            highest_wait_department: highest_wait
                .map_or_else(|| UNKNOWN.into(), |d| d.department.clone()),
            highest_wait_minutes: highest_wait.map_or(0.0, |d| d.metrics.avg_wait),
            lowest_fcr_department: lowest_fcr
                .map_or_else(|| UNKNOWN.into(), |d| d.department.clone()),
            peak_day: volume
                .peak_day()
                .map_or_else(|| UNKNOWN.into(), |d| d.day.clone()),
            peak_slot: volume
                .peak_slot()
                .map_or_else(|| UNKNOWN.into(), |s| s.slot.clone()),
            satisfaction_drop_threshold: satisfaction.steepest_drop_threshold(),
            wait_correlation_negative: satisfaction.wait_hurts_satisfaction(),
            escalation_pct: kpis.global.escalation_pct,
            alpha: satisfaction.alpha,
            findings: Vec::new(),
            recommendations: Vec::new(),
        };
        rec.findings = rec.write_findings();
        rec.recommendations = rec.write_recommendations();
        rec
    }

    fn threshold_text(&self) -> String {
        self.satisfaction_drop_threshold
            .map_or_else(|| UNKNOWN.into(), |t| format!("{t:.0}"))
    }

    fn write_findings(&self) -> Vec<String> {
        let significance = if self.fcr_lift_significant {
            format!("statistically significant, p < {}", self.alpha)
        } else {
            "not statistically significant".to_string()
        };
        let channel_wait = if self.busiest_channel_has_highest_wait {
            " with highest wait times"
        } else {
            ""
        };
        let wait_effect = if self.wait_correlation_negative {
            "correlate with significant drops in satisfaction scores"
        } else {
            "show no significant negative relationship with satisfaction scores"
        };
        vec![
            match self.fcr_satisfaction_lift {
                Some(lift) => format!(
                    "First Contact Resolution of {:.1}% - students resolved on first contact report {lift:.2} higher satisfaction ({significance})",
                    self.fcr_pct
                ),
                None => format!(
                    "First Contact Resolution of {:.1}% - too few interactions to test its effect on satisfaction",
                    self.fcr_pct
                ),
            },
            format!(
                "{} channel handles {:.0}% of volume{channel_wait} - staffing optimization opportunity",
                self.busiest_channel, self.busiest_channel_share_pct
            ),
            format!(
                "{} has the longest average wait time ({:.1} min) - may need additional staff or process streamlining",
                self.highest_wait_department, self.highest_wait_minutes
            ),
            format!(
                "{}s and {} are peak periods requiring maximum staffing coverage",
                self.peak_day, self.peak_slot
            ),
            format!(
                "Wait times above {} minutes {wait_effect}",
                self.threshold_text()
            ),
            format!(
                "Escalation rate of {:.1}% suggests opportunity for expanded staff training",
                self.escalation_pct
            ),
        ]
    }

    fn write_recommendations(&self) -> Vec<String> {
        vec![
            format!(
                "Increase staffing during peak periods ({}s, {}) to reduce wait times below 10-minute target",
                self.peak_day, self.peak_slot
            ),
            format!(
                "Expand staff training for {} inquiries to improve first contact resolution rate",
                self.lowest_fcr_department
            ),
            format!(
                "Implement queue management system to redirect {} overflow to virtual appointments during peaks",
                self.busiest_channel.to_lowercase()
            ),
            "Create comprehensive reference materials for common inquiry types to reduce escalations"
                .to_string(),
            format!(
                "Set wait time target of under 10 minutes - data shows satisfaction drops most sharply above {} minutes",
                self.threshold_text()
            ),
            "Use staff performance scorecards (FCR, satisfaction, escalation rate) for coaching and development"
                .to_string(),
        ]
    }
}

impl ReportSection for Recommendations {
    fn title(&self) -> &'static str {
        "6. KEY FINDINGS & PROCESS IMPROVEMENT RECOMMENDATIONS"
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "\nFINDINGS:")?;
        for (i, f) in self.findings.iter().enumerate() {
            writeln!(out, "{}. {f}", i + 1)?;
        }
        writeln!(out, "\nRECOMMENDATIONS:")?;
        for (i, r) in self.recommendations.iter().enumerate() {
            writeln!(out, "{}. {r}", i + 1)?;
        }
        Ok(())
    }
}

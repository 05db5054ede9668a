use super::ReportSection;
use crate::{
    error::DeskResult,
    grouping::{group_by, GroupMetrics},
    table::InteractionTable,
    types::Label,
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffPerformance {
    pub staff_member: Label,
    /// Rounded to 2 decimals.
    pub metrics: GroupMetrics,
}

impl StaffPerformance {
    pub fn escalation_pct(&self) -> f64 {
        self.metrics.escalations as f64 / self.metrics.volume as f64 * 100.0
    }
}

/// Staff scorecards, best satisfaction first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffView {
    pub staff: Vec<StaffPerformance>,
}

impl StaffView {
    pub fn compute(table: &InteractionTable) -> DeskResult<Self> {
        let rows = table.require_rows()?;
        let mut staff: Vec<StaffPerformance> = group_by(rows, |r| r.staff_member.clone())
            .into_iter()
            .map(|(staff_member, group)| StaffPerformance {
                staff_member,
                metrics: GroupMetrics::from_rows(&group).rounded(2),
            })
            .collect();
        // Stable: equal scores keep name order.
        staff.sort_by(|a, b| {
            b.metrics
                .avg_satisfaction
                .total_cmp(&a.metrics.avg_satisfaction)
        });
        Ok(Self { staff })
    }
}

impl ReportSection for StaffView {
    fn title(&self) -> &'static str {
        "4. STAFF PERFORMANCE & WORKLOAD"
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            "\n{:<12} {:>8} {:>8} {:>8} {:>8} {:>6} {:>6}",
            "Staff", "Volume", "Wait", "Service", "FCR", "Sat", "Esc"
        )?;
        writeln!(out, "{}", "-".repeat(60))?;
        for s in &self.staff {
            let m = &s.metrics;
            writeln!(
                out,
                "{:<12} {:>8} {:>7.1}m {:>7.1}m {:>7.1}% {:>5.2} {:>5}",
                s.staff_member, m.volume, m.avg_wait, m.avg_service, m.fcr_pct, m.avg_satisfaction, m.escalations
            )?;
        }
        Ok(())
    }
}

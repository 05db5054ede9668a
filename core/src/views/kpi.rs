//! Operations overview: global KPIs and the per-department breakdown.

use super::ReportSection;
use crate::{
    error::DeskResult,
    grouping::{group_by, mean_of, pct, GroupMetrics},
    interaction::Interaction,
    table::InteractionTable,
    types::Label,
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalKpis {
    pub total: usize,
    pub avg_wait: f64,
    pub avg_service: f64,
    pub fcr_pct: f64,
    pub escalation_pct: f64,
    pub callback_pct: f64,
    pub avg_satisfaction: f64,
}

impl GlobalKpis {
    fn compute(rows: &[Interaction]) -> Self {
        let refs: Vec<&Interaction> = rows.iter().collect();
        Self {
            total: rows.len(),
            avg_wait: mean_of(&refs, |r| r.wait_time_min),
            avg_service: mean_of(&refs, |r| r.service_time_min),
            fcr_pct: pct(&refs, |r| r.is_first_contact()),
            escalation_pct: pct(&refs, |r| r.escalated.is_yes()),
            callback_pct: pct(&refs, |r| r.callback_required.is_yes()),
            avg_satisfaction: mean_of(&refs, |r| r.satisfaction_score),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentKpis {
    pub department: Label,
    /// Rounded to 2 decimals.
    pub metrics: GroupMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiView {
    pub global: GlobalKpis,
    /// Sorted by department name.
    pub departments: Vec<DepartmentKpis>,
}

impl KpiView {
    pub fn compute(table: &InteractionTable) -> DeskResult<Self> {
        let rows = table.require_rows()?;
        let departments = group_by(rows, |r| r.department.clone())
            .into_iter()
            .map(|(department, group)| DepartmentKpis {
                department,
                metrics: GroupMetrics::from_rows(&group).rounded(2),
            })
            .collect();
        Ok(Self {
            global: GlobalKpis::compute(rows),
            departments,
        })
    }
}

impl ReportSection for KpiView {
    fn title(&self) -> &'static str {
        "1. OPERATIONS OVERVIEW & KPIs"
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        let g = &self.global;
        writeln!(out, "\nTotal Interactions:        {:>10}", g.total)?;
        writeln!(out, "Avg Wait Time:             {:>10.1} min", g.avg_wait)?;
        writeln!(out, "Avg Service Time:          {:>10.1} min", g.avg_service)?;
        writeln!(out, "First Contact Resolution:  {:>10.1}%", g.fcr_pct)?;
        writeln!(out, "Escalation Rate:           {:>10.1}%", g.escalation_pct)?;
        writeln!(out, "Callback Rate:             {:>10.1}%", g.callback_pct)?;
        writeln!(out, "Avg Satisfaction:          {:>10.2}/5.0", g.avg_satisfaction)?;

        writeln!(
            out,
            "\n{:<28} {:>8} {:>8} {:>8} {:>8} {:>6}",
            "Department", "Volume", "Wait", "Service", "FCR %", "Sat"
        )?;
        writeln!(out, "{}", "-".repeat(70))?;
        for d in &self.departments {
            let m = &d.metrics;
            writeln!(
                out,
                "{:<28} {:>8} {:>7.1}m {:>7.1}m {:>7.1}% {:>5.2}",
                d.department, m.volume, m.avg_wait, m.avg_service, m.fcr_pct, m.avg_satisfaction
            )?;
        }
        Ok(())
    }
}

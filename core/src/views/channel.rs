use super::ReportSection;
use crate::{
    error::DeskResult,
    grouping::{group_by, GroupMetrics},
    interaction::round_to,
    table::InteractionTable,
    types::Label,
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStats {
    pub channel: Label,
    /// Percent of all interactions, rounded to 2 decimals.
    pub share_pct: f64,
    /// Rounded to 2 decimals.
    pub metrics: GroupMetrics,
}

/// Per-channel volume, share and service efficiency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelView {
    pub channels: Vec<ChannelStats>,
}

impl ChannelView {
    pub fn compute(table: &InteractionTable) -> DeskResult<Self> {
        let rows = table.require_rows()?;
        let total = rows.len() as f64;
        let channels = group_by(rows, |r| r.channel.clone())
            .into_iter()
            .map(|(channel, group)| ChannelStats {
                channel,
                share_pct: round_to(group.len() as f64 / total * 100.0, 2),
                metrics: GroupMetrics::from_rows(&group).rounded(2),
            })
            .collect();
        Ok(Self { channels })
    }
}

impl ReportSection for ChannelView {
    fn title(&self) -> &'static str {
        "3. CHANNEL ANALYSIS & SERVICE EFFICIENCY"
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            "\n{:<22} {:>8} {:>6} {:>8} {:>8} {:>8} {:>6}",
            "Channel", "Volume", "%", "Wait", "Service", "FCR", "Sat"
        )?;
        writeln!(out, "{}", "-".repeat(70))?;
        for c in &self.channels {
            let m = &c.metrics;
            writeln!(
                out,
                "{:<22} {:>8} {:>5.1}% {:>7.1}m {:>7.1}m {:>7.1}% {:>5.2}",
                c.channel, m.volume, c.share_pct, m.avg_wait, m.avg_service, m.fcr_pct, m.avg_satisfaction
            )?;
        }
        Ok(())
    }
}

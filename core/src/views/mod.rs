//! Report sections.
//!
//! RULE: Every section implements ReportSection.
//! Each section is a pure function of the interaction table (plus, for
//! recommendations, of the sections before it). The report renders them
//! in the fixed order documented in report.rs.

use std::fmt::{self, Write};

pub mod channel;
pub mod kpi;
pub mod overview;
pub mod recommendations;
pub mod satisfaction;
pub mod staff;
pub mod volume;

pub use channel::{ChannelStats, ChannelView};
pub use kpi::{DepartmentKpis, GlobalKpis, KpiView};
pub use overview::OverviewView;
pub use recommendations::Recommendations;
pub use satisfaction::{ResolutionSatisfaction, SatisfactionView, WaitBucketStats};
pub use staff::{StaffPerformance, StaffView};
pub use volume::{DayVolume, PeakPeriod, QuarterVolume, SlotVolume, VolumeView};

pub const RULE_WIDTH: usize = 60;

/// The contract every report section fulfills.
pub trait ReportSection {
    /// Banner title printed above the section.
    fn title(&self) -> &'static str;

    /// Append the section body (without banner) to `out`.
    fn render(&self, out: &mut String) -> fmt::Result;
}

/// `====` / TITLE / `====` block.
pub fn write_banner(out: &mut String, title: &str) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{rule}")
}

/// Render an optional count right-aligned, `NaN` when absent.
pub(crate) fn fmt_count(value: Option<usize>, width: usize) -> String {
    match value {
        Some(v) => format!("{v:>width$}"),
        None => format!("{:>width$}", "NaN"),
    }
}

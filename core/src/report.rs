//! The operations report: every view over one interaction table.
//!
//! SECTION ORDER (fixed, documented, never reordered):
//!   0. Overview         dataset header
//!   1. KPIs             global + per department
//!   2. Volume           quarter, day, slot, peaks
//!   3. Channels
//!   4. Staff
//!   5. Satisfaction     by resolution, t-test, correlation, wait buckets
//!   6. Recommendations  derived from 1-5 only
//!
//! RULES:
//!   - Sections 0-5 are pure functions of the table and the config.
//!   - Recommendations read the computed sections, never the table.
//!   - Rendering and export never recompute anything.

use crate::{
    charts,
    config::ReportConfig,
    error::DeskResult,
    table::InteractionTable,
    views::{
        write_banner, ChannelView, KpiView, OverviewView, Recommendations, ReportSection,
        SatisfactionView, StaffView, VolumeView,
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Write,
    fs,
    path::{Path, PathBuf},
};

pub const REPORT_JSON: &str = "report.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationsReport {
    pub overview: OverviewView,
    pub kpis: KpiView,
    pub volume: VolumeView,
    pub channels: ChannelView,
    pub staff: StaffView,
    pub satisfaction: SatisfactionView,
    pub recommendations: Recommendations,
}

/// What `report.json` holds.
#[derive(Debug, Serialize)]
struct ReportEnvelope<'a> {
    generated_at: DateTime<Utc>,
    source: Option<String>,
    report: &'a OperationsReport,
}

impl OperationsReport {
    pub fn build(table: &InteractionTable, config: &ReportConfig) -> DeskResult<Self> {
        config.validate()?;
        let overview = OverviewView::compute(table)?;
        let kpis = KpiView::compute(table)?;
        let volume = VolumeView::compute(table, config)?;
        let channels = ChannelView::compute(table)?;
        let staff = StaffView::compute(table)?;
        let satisfaction = SatisfactionView::compute(table, config)?;
        let recommendations = Recommendations::derive(&kpis, &volume, &channels, &satisfaction);
        log::debug!(
            "report: {} departments, {} channels, {} staff, {} peaks",
            kpis.departments.len(),
            channels.channels.len(),
            staff.staff.len(),
            volume.peaks.len()
        );
        Ok(Self {
            overview,
            kpis,
            volume,
            channels,
            staff,
            satisfaction,
            recommendations,
        })
    }

    /// Sections in print order.
    pub fn sections(&self) -> [&dyn ReportSection; 7] {
        [
            &self.overview,
            &self.kpis,
            &self.volume,
            &self.channels,
            &self.staff,
            &self.satisfaction,
            &self.recommendations,
        ]
    }

    /// The console report: one banner + body per section.
    pub fn render_text(&self) -> DeskResult<String> {
        let mut out = String::new();
        for (i, section) in self.sections().iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            write_banner(&mut out, section.title())?;
            section.render(&mut out)?;
        }
        Ok(out)
    }

    /// Write `report.json` into `dir`, creating it if needed.
    pub fn write_json(&self, dir: &Path, source: Option<&Path>) -> DeskResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(REPORT_JSON);
        let envelope = ReportEnvelope {
            generated_at: Utc::now(),
            source: source.map(|p| p.display().to_string()),
            report: self,
        };
        fs::write(&path, serde_json::to_string_pretty(&envelope)?)?;
        log::info!("report: saved {}", path.display());
        Ok(path)
    }

    /// Charts, JSON export and text in one go. Returns the text and every
    /// file written.
    pub fn publish(
        &self,
        config: &ReportConfig,
        source: Option<&Path>,
    ) -> DeskResult<(String, Vec<PathBuf>)> {
        let mut written = Vec::new();
        if config.render_charts {
            written.extend(charts::render_all(self, &config.output_dir)?);
        }
        written.push(self.write_json(&config.output_dir, source)?);

        let mut text = self.render_text()?;
        write!(
            text,
            "\n{rule}\nAnalysis complete. {} files saved to {}\n{rule}\n",
            written.len(),
            config.output_dir.display(),
            rule = "=".repeat(crate::views::RULE_WIDTH)
        )?;
        Ok((text, written))
    }
}

use super::ReportSection;
use crate::{error::DeskResult, table::InteractionTable, types::Label};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Dataset header: size and coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewView {
    pub interactions: usize,
    pub departments: usize,
    /// In first-appearance order.
    pub channels: Vec<Label>,
    pub quarters: usize,
}

impl OverviewView {
    pub fn compute(table: &InteractionTable) -> DeskResult<Self> {
        table.require_rows()?;
        Ok(Self {
            interactions: table.len(),
            departments: table.departments().len(),
            channels: table.channels_in_order(),
            quarters: table.quarters().len(),
        })
    }
}

impl ReportSection for OverviewView {
    fn title(&self) -> &'static str {
        "STUDENT SERVICES OPERATIONS ANALYTICS"
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            "\nDataset: {} interactions across {} departments",
            self.interactions, self.departments
        )?;
        writeln!(out, "Channels: {}", self.channels.join(", "))?;
        writeln!(out, "Coverage: {} quarters", self.quarters)
    }
}

//! Flat-file persistence layer.
//!
//! RULE: Only table.rs reads or writes the interaction file.
//! Views receive an `InteractionTable` and never touch the filesystem.

use crate::{
    error::{DeskError, DeskResult},
    interaction::Interaction,
    types::Label,
};
use std::{collections::BTreeSet, fs, path::Path};

/// The immutable interaction table.
#[derive(Debug, Clone, Default)]
pub struct InteractionTable {
    rows: Vec<Interaction>,
}

impl InteractionTable {
    pub fn from_rows(rows: Vec<Interaction>) -> Self {
        Self { rows }
    }

    /// Read a CSV file with a header row. Any malformed row is fatal.
    /// Rows that parse but break an invariant are kept and logged.
    pub fn read_csv(path: &Path) -> DeskResult<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let row: Interaction = record?;
            rows.push(row);
        }

        let inconsistent = rows.iter().filter(|r| !r.violations().is_empty()).count();
        if inconsistent > 0 {
            if let Some(first) = rows.iter().find(|r| !r.violations().is_empty()) {
                log::warn!(
                    "table: {inconsistent} of {} rows break an invariant; first is inquiry {}: {}",
                    rows.len(),
                    first.id,
                    first.violations().join("; ")
                );
            }
        }
        log::info!("table: read {} rows from {}", rows.len(), path.display());
        Ok(Self { rows })
    }

    /// Write the table as CSV, creating the parent directory if needed.
    pub fn write_csv(&self, path: &Path) -> DeskResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        log::info!("table: wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    pub fn rows(&self) -> &[Interaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Error out on an empty table; every view divides by the row count.
    pub fn require_rows(&self) -> DeskResult<&[Interaction]> {
        if self.rows.is_empty() {
            return Err(DeskError::EmptyTable);
        }
        Ok(&self.rows)
    }

    /// Distinct departments, sorted.
    pub fn departments(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.department.as_str()).collect()
    }

    /// Distinct quarters, sorted.
    pub fn quarters(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.quarter.as_str()).collect()
    }

    /// Distinct channels in first-appearance order.
    pub fn channels_in_order(&self) -> Vec<Label> {
        let mut seen: Vec<Label> = Vec::new();
        for r in &self.rows {
            if !seen.contains(&r.channel) {
                seen.push(r.channel.clone());
            }
        }
        seen
    }
}

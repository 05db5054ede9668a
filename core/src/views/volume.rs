//! Volume patterns: when do students show up?
//!
//! Quarter groups follow name order. Day and time-slot counts are
//! reindexed to the configured orders; a configured day or slot with no
//! rows is kept as `None`. Peaks are the busiest (day, slot) pairs.

use super::{fmt_count, ReportSection};
use crate::{
    config::ReportConfig,
    error::DeskResult,
    grouping::{group_by, mean_of},
    interaction::round_to,
    table::InteractionTable,
    types::Label,
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarterVolume {
    pub quarter: Label,
    pub volume: usize,
    /// Rounded to 1 decimal.
    pub avg_wait: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayVolume {
    pub day: Label,
    pub volume: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotVolume {
    pub slot: Label,
    pub volume: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakPeriod {
    pub day: Label,
    pub slot: Label,
    pub volume: usize,
    /// Rounded to 1 decimal.
    pub avg_wait: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeView {
    pub quarters: Vec<QuarterVolume>,
    pub days: Vec<DayVolume>,
    pub slots: Vec<SlotVolume>,
    pub peaks: Vec<PeakPeriod>,
    /// `heatmap[d][s]` = rows on `days[d]` in `slots[s]` (0 when absent).
    pub heatmap: Vec<Vec<usize>>,
}

impl VolumeView {
    pub fn compute(table: &InteractionTable, config: &ReportConfig) -> DeskResult<Self> {
        let rows = table.require_rows()?;

        let quarters = group_by(rows, |r| r.quarter.clone())
            .into_iter()
            .map(|(quarter, group)| QuarterVolume {
                quarter,
                volume: group.len(),
                avg_wait: round_to(mean_of(&group, |r| r.wait_time_min), 1),
            })
            .collect();

        let by_day = group_by(rows, |r| r.day_of_week.as_str());
        let days = config
            .day_order
            .iter()
            .map(|day| DayVolume {
                day: day.clone(),
                volume: by_day.get(day.as_str()).map(Vec::len),
            })
            .collect();

        let by_slot = group_by(rows, |r| r.time_slot.as_str());
        let slots = config
            .time_slot_order
            .iter()
            .map(|slot| SlotVolume {
                slot: slot.clone(),
                volume: by_slot.get(slot.as_str()).map(Vec::len),
            })
            .collect();

        let by_pair = group_by(rows, |r| (r.day_of_week.as_str(), r.time_slot.as_str()));
        let heatmap = config
            .day_order
            .iter()
            .map(|day| {
                config
                    .time_slot_order
                    .iter()
                    .map(|slot| {
                        by_pair
                            .get(&(day.as_str(), slot.as_str()))
                            .map_or(0, Vec::len)
                    })
                    .collect()
            })
            .collect();

        let mut peaks: Vec<PeakPeriod> = by_pair
            .iter()
            .map(|((day, slot), group)| PeakPeriod {
                day: (*day).to_string(),
                slot: (*slot).to_string(),
                volume: group.len(),
                avg_wait: round_to(mean_of(group, |r| r.wait_time_min), 1),
            })
            .collect();
        // Stable: ties keep (day, slot) name order.
        peaks.sort_by(|a, b| b.volume.cmp(&a.volume));
        peaks.truncate(config.peak_periods);

        Ok(Self {
            quarters,
            days,
            slots,
            peaks,
            heatmap,
        })
    }

    /// Busiest configured day; the first one wins ties.
    pub fn peak_day(&self) -> Option<&DayVolume> {
        let mut best: Option<&DayVolume> = None;
        for d in &self.days {
            if let Some(v) = d.volume {
                if best.and_then(|b| b.volume).map_or(true, |b| v > b) {
                    best = Some(d);
                }
            }
        }
        best
    }

    /// Busiest configured time slot; the first one wins ties.
    pub fn peak_slot(&self) -> Option<&SlotVolume> {
        let mut best: Option<&SlotVolume> = None;
        for s in &self.slots {
            if let Some(v) = s.volume {
                if best.and_then(|b| b.volume).map_or(true, |b| v > b) {
                    best = Some(s);
                }
            }
        }
        best
    }
}

impl ReportSection for VolumeView {
    fn title(&self) -> &'static str {
        "2. VOLUME PATTERNS & STAFFING ANALYSIS"
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "\nVolume by Quarter:")?;
        for q in &self.quarters {
            writeln!(
                out,
                "  {:<15} {:>5} interactions  Avg Wait: {:.1}m",
                q.quarter, q.volume, q.avg_wait
            )?;
        }

        writeln!(out, "\nVolume by Day of Week:")?;
        for d in &self.days {
            writeln!(out, "  {:<12} {}", d.day, fmt_count(d.volume, 5))?;
        }

        writeln!(out, "\nVolume by Time Slot:")?;
        for s in &self.slots {
            writeln!(out, "  {:<12} {}", s.slot, fmt_count(s.volume, 5))?;
        }

        writeln!(out, "\nTop {} Peak Periods (highest volume):", self.peaks.len())?;
        for p in &self.peaks {
            writeln!(
                out,
                "  {} {}: {} interactions, {:.1}m avg wait",
                p.day, p.slot, p.volume, p.avg_wait
            )?;
        }
        Ok(())
    }
}

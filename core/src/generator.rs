//! Synthetic interaction generator.
//!
//! Every attribute is sampled from its own deterministic column stream
//! (see `rng.rs`), then the dependent fields are derived:
//!   1. categorical columns from their priors
//!   2. conditional columns (month | quarter, inquiry type | department)
//!   3. wait and service time: base draw + additive adjustments, clipped
//!   4. resolution from its prior, independent of every other column
//!   5. satisfaction from resolution and the rounded wait time
//!   6. escalated / callback flags from resolution
//!
//! The per-department `fcr_boost` is computed for the summary only.
//! Resolution sampling does not see it.

use crate::{
    config::{Categorical, GeneratorConfig},
    error::{DeskError, DeskResult},
    interaction::{round_to, Interaction, Resolution, YesNo},
    rng::{ColumnRng, ColumnSlot, RngBank},
    types::Label,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One RNG stream per generated column.
struct ColumnStreams {
    department: ColumnRng,
    channel: ColumnRng,
    quarter: ColumnRng,
    month: ColumnRng,
    day_of_week: ColumnRng,
    time_slot: ColumnRng,
    staff: ColumnRng,
    inquiry_type: ColumnRng,
    student_type: ColumnRng,
    wait: ColumnRng,
    service: ColumnRng,
    resolution: ColumnRng,
    satisfaction: ColumnRng,
    callback: ColumnRng,
}

impl ColumnStreams {
    fn new(bank: &RngBank) -> Self {
        Self {
            department: bank.for_column(ColumnSlot::Department),
            channel: bank.for_column(ColumnSlot::Channel),
            quarter: bank.for_column(ColumnSlot::Quarter),
            month: bank.for_column(ColumnSlot::Month),
            day_of_week: bank.for_column(ColumnSlot::DayOfWeek),
            time_slot: bank.for_column(ColumnSlot::TimeSlot),
            staff: bank.for_column(ColumnSlot::Staff),
            inquiry_type: bank.for_column(ColumnSlot::InquiryType),
            student_type: bank.for_column(ColumnSlot::StudentType),
            wait: bank.for_column(ColumnSlot::WaitTime),
            service: bank.for_column(ColumnSlot::ServiceTime),
            resolution: bank.for_column(ColumnSlot::Resolution),
            satisfaction: bank.for_column(ColumnSlot::Satisfaction),
            callback: bank.for_column(ColumnSlot::Callback),
        }
    }
}

pub struct InteractionGenerator {
    config: GeneratorConfig,
    bank: RngBank,
}

impl InteractionGenerator {
    /// Validates the config; the seed is taken from `config.seed`.
    pub fn new(config: GeneratorConfig) -> DeskResult<Self> {
        config.validate()?;
        let bank = RngBank::new(config.seed);
        Ok(Self { config, bank })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produce `config.rows` interactions. Calling this twice on the same
    /// generator yields identical rows.
    pub fn generate(&self) -> DeskResult<Vec<Interaction>> {
        let n = self.config.rows;
        let mut streams = ColumnStreams::new(&self.bank);
        let mut rows = Vec::with_capacity(n);

        for i in 0..n {
            rows.push(self.generate_row(self.config.first_id + i as u64, &mut streams)?);
        }
        log::info!(
            "generator: produced {n} interactions (seed={})",
            self.bank.master_seed()
        );
        Ok(rows)
    }

    fn generate_row(&self, id: u64, s: &mut ColumnStreams) -> DeskResult<Interaction> {
        let cfg = &self.config;

        let department = pick(&cfg.departments, &mut s.department);
        let channel = pick(&cfg.channels, &mut s.channel);
        let quarter = pick(&cfg.quarters, &mut s.quarter);
        let month = pick_from(&cfg.months, &quarter, &mut s.month)?;
        let day_of_week = pick(&cfg.days_of_week, &mut s.day_of_week);
        let time_slot = pick(&cfg.time_slots, &mut s.time_slot);
        let staff_member = pick(&cfg.staff, &mut s.staff);
        let inquiry_type = pick_from(&cfg.inquiry_types, &department, &mut s.inquiry_type)?;
        let student_type = pick(&cfg.student_types, &mut s.student_type);

        let w = &cfg.wait;
        let wait_adj = adjustment(&w.channel_adjustments, &channel)
            + adjustment(&w.quarter_adjustments, &quarter)
            + adjustment(&w.month_adjustments, &month);
        let wait_time_min = round_to(
            (s.wait.exponential(w.exponential_scale) + wait_adj).clamp(w.min, w.max),
            1,
        );

        let sv = &cfg.service;
        let service_adj = adjustment(&sv.department_adjustments, &department)
            + adjustment(&sv.channel_adjustments, &channel);
        let service_time_min = round_to(
            (s.service.normal(sv.mean, sv.std_dev) + service_adj).clamp(sv.min, sv.max),
            1,
        );

        let resolution = Resolution::ALL[s.resolution.pick_weighted(&cfg.resolution_weights)];

        let sat = &cfg.satisfaction;
        let mut sat_adj = sat
            .resolution_adjustments
            .get(&resolution)
            .copied()
            .unwrap_or(0.0);
        if wait_time_min > sat.long_wait_threshold {
            sat_adj += sat.long_wait_adjustment;
        }
        if wait_time_min < sat.short_wait_threshold {
            sat_adj += sat.short_wait_adjustment;
        }
        let satisfaction_score = round_to(
            (s.satisfaction.normal(sat.mean, sat.std_dev) + sat_adj).clamp(sat.min, sat.max),
            1,
        );

        let escalated = YesNo::from(resolution == Resolution::Escalated);
        // The draw is taken for every row so the callback stream stays
        // aligned with row index regardless of resolution.
        let callback_draw = s.callback.chance(cfg.callback_probability);
        let callback_required = YesNo::from(resolution == Resolution::FollowUp && callback_draw);

        Ok(Interaction {
            id,
            department,
            inquiry_type,
            channel,
            student_type,
            quarter,
            month,
            day_of_week,
            time_slot,
            staff_member,
            wait_time_min,
            service_time_min,
            resolution,
            escalated,
            callback_required,
            satisfaction_score,
        })
    }
}

fn pick(column: &Categorical, rng: &mut ColumnRng) -> Label {
    let idx = match &column.weights {
        Some(weights) => rng.pick_weighted(weights),
        None => rng.pick_uniform(column.labels.len()),
    };
    column.labels[idx].clone()
}

/// Uniform draw from the bucket keyed by `key`. `validate()` rejects
/// configs where a parent label has no bucket, so the error arm only
/// fires for a config that skipped validation.
fn pick_from(
    buckets: &BTreeMap<Label, Vec<Label>>,
    key: &str,
    rng: &mut ColumnRng,
) -> DeskResult<Label> {
    match buckets.get(key) {
        Some(options) if !options.is_empty() => {
            Ok(options[rng.pick_uniform(options.len())].clone())
        }
        _ => Err(DeskError::invalid_config(format!(
            "{}: no options for '{key}'",
            rng.name
        ))),
    }
}

fn adjustment(table: &BTreeMap<Label, f64>, key: &str) -> f64 {
    table.get(key).copied().unwrap_or(0.0)
}

// ── Generation summary ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueCount {
    pub label: Label,
    pub count: usize,
}

/// Headline numbers printed after a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub rows: usize,
    pub departments: Vec<ValueCount>,
    pub channels: Vec<ValueCount>,
    pub resolutions: Vec<ValueCount>,
    pub avg_wait: f64,
    pub avg_service: f64,
    pub avg_satisfaction: f64,
    pub fcr_pct: f64,
    /// Mean of the (unapplied) department FCR boost over all rows.
    pub avg_fcr_boost: f64,
}

impl GenerationSummary {
    pub fn from_rows(rows: &[Interaction], config: &GeneratorConfig) -> Self {
        let n = rows.len().max(1) as f64;
        let avg = |f: fn(&Interaction) -> f64| rows.iter().map(f).sum::<f64>() / n;
        Self {
            rows: rows.len(),
            departments: value_counts(rows.iter().map(|r| r.department.as_str())),
            channels: value_counts(rows.iter().map(|r| r.channel.as_str())),
            resolutions: value_counts(rows.iter().map(|r| r.resolution.label())),
            avg_wait: avg(|r| r.wait_time_min),
            avg_service: avg(|r| r.service_time_min),
            avg_satisfaction: avg(|r| r.satisfaction_score),
            fcr_pct: rows.iter().filter(|r| r.is_first_contact()).count() as f64 / n * 100.0,
            avg_fcr_boost: rows
                .iter()
                .map(|r| config.fcr_boost_for(&r.department))
                .sum::<f64>()
                / n,
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("Dataset created: {} student service interactions\n", self.rows);
        for (title, counts) in [
            ("Departments", &self.departments),
            ("Channels", &self.channels),
            ("Resolution", &self.resolutions),
        ] {
            out.push_str(&format!("\n{title}:\n"));
            for vc in counts {
                out.push_str(&format!("  {:<30} {:>6}\n", vc.label, vc.count));
            }
        }
        out.push_str(&format!("\nAvg Wait Time: {:.1} min\n", self.avg_wait));
        out.push_str(&format!("Avg Service Time: {:.1} min\n", self.avg_service));
        out.push_str(&format!("Avg Satisfaction: {:.2}/5.0\n", self.avg_satisfaction));
        out.push_str(&format!("First Contact Resolution: {:.1}%\n", self.fcr_pct));
        out
    }
}

/// Counts sorted by count descending; ties keep first-appearance order.
fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<ValueCount> {
    let mut counts: Vec<ValueCount> = Vec::new();
    for v in values {
        match counts.iter_mut().find(|c| c.label == v) {
            Some(c) => c.count += 1,
            None => counts.push(ValueCount {
                label: v.to_string(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

//! Generator and report configuration.
//!
//! Both configs carry the constants of the reference dataset as their
//! `Default`, and may be overridden from a JSON file. Fields missing from
//! the file keep their default value.

use crate::{
    error::{DeskError, DeskResult},
    interaction::{Resolution, SATISFACTION_RANGE, SERVICE_RANGE, WAIT_RANGE},
    types::Label,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

const WEIGHT_TOLERANCE: f64 = 1e-6;

// ── Categorical distributions ──────────────────────────────────────

/// A categorical column: labels plus optional prior weights.
/// `weights: None` means uniform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Categorical {
    pub labels: Vec<Label>,
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
}

impl Categorical {
    pub fn weighted(pairs: &[(&str, f64)]) -> Self {
        Self {
            labels: pairs.iter().map(|(l, _)| (*l).to_string()).collect(),
            weights: Some(pairs.iter().map(|(_, w)| *w).collect()),
        }
    }

    pub fn uniform(labels: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
            weights: None,
        }
    }

    fn validate(&self, column: &str) -> DeskResult<()> {
        if self.labels.is_empty() {
            return Err(DeskError::invalid_config(format!("{column}: no labels")));
        }
        if let Some(weights) = &self.weights {
            validate_weights(column, weights, self.labels.len())?;
        }
        Ok(())
    }
}

fn validate_weights(column: &str, weights: &[f64], expected_len: usize) -> DeskResult<()> {
    if weights.len() != expected_len {
        return Err(DeskError::invalid_config(format!(
            "{column}: {} weights for {expected_len} labels",
            weights.len()
        )));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(DeskError::invalid_config(format!(
            "{column}: weights must be finite and non-negative"
        )));
    }
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(DeskError::invalid_config(format!(
            "{column}: weights sum to {total}, expected 1"
        )));
    }
    Ok(())
}

fn validate_range(column: &str, min: f64, max: f64, bounds: (f64, f64)) -> DeskResult<()> {
    if !(min < max && min >= bounds.0 && max <= bounds.1) {
        return Err(DeskError::invalid_config(format!(
            "{column}: clip range [{min}, {max}] must be ordered and within {bounds:?}"
        )));
    }
    Ok(())
}

fn table(pairs: &[(&str, f64)]) -> BTreeMap<Label, f64> {
    pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}

fn lookup(pairs: &[(&str, &[&str])]) -> BTreeMap<Label, Vec<Label>> {
    pairs
        .iter()
        .map(|(k, vs)| ((*k).to_string(), vs.iter().map(|v| (*v).to_string()).collect()))
        .collect()
}

// ── Numeric models ─────────────────────────────────────────────────

/// wait = clip(Exp(scale) + adjustments, min, max)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitModel {
    pub exponential_scale: f64,
    pub channel_adjustments: BTreeMap<Label, f64>,
    pub quarter_adjustments: BTreeMap<Label, f64>,
    pub month_adjustments: BTreeMap<Label, f64>,
    pub min: f64,
    pub max: f64,
}

impl Default for WaitModel {
    fn default() -> Self {
        Self {
            exponential_scale: 8.0,
            channel_adjustments: table(&[("Walk-In", 5.0)]),
            quarter_adjustments: table(&[("Fall 2024", 4.0)]),
            month_adjustments: table(&[("Sep", 3.0), ("Jan", 3.0)]),
            min: WAIT_RANGE.0,
            max: WAIT_RANGE.1,
        }
    }
}

/// service = clip(N(mean, std_dev) + adjustments, min, max)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceModel {
    pub mean: f64,
    pub std_dev: f64,
    pub department_adjustments: BTreeMap<Label, f64>,
    pub channel_adjustments: BTreeMap<Label, f64>,
    pub min: f64,
    pub max: f64,
}

impl Default for ServiceModel {
    fn default() -> Self {
        Self {
            mean: 12.0,
            std_dev: 5.0,
            department_adjustments: table(&[
                ("Financial Aid", 5.0),
                ("Student Business Services", 3.0),
            ]),
            channel_adjustments: table(&[("Email", -4.0)]),
            min: SERVICE_RANGE.0,
            max: SERVICE_RANGE.1,
        }
    }
}

/// satisfaction = clip(N(mean, std_dev) + resolution and wait adjustments, min, max)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SatisfactionModel {
    pub mean: f64,
    pub std_dev: f64,
    pub resolution_adjustments: BTreeMap<Resolution, f64>,
    /// Applied when wait is strictly above the threshold.
    pub long_wait_threshold: f64,
    pub long_wait_adjustment: f64,
    /// Applied when wait is strictly below the threshold.
    pub short_wait_threshold: f64,
    pub short_wait_adjustment: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for SatisfactionModel {
    fn default() -> Self {
        Self {
            mean: 3.8,
            std_dev: 0.8,
            resolution_adjustments: [(Resolution::FirstContact, 0.5), (Resolution::Escalated, -0.3)]
                .into_iter()
                .collect(),
            long_wait_threshold: 20.0,
            long_wait_adjustment: -0.4,
            short_wait_threshold: 5.0,
            short_wait_adjustment: 0.3,
            min: SATISFACTION_RANGE.0,
            max: SATISFACTION_RANGE.1,
        }
    }
}

// ── Generator ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub seed: u64,
    pub first_id: u64,
    pub departments: Categorical,
    pub channels: Categorical,
    pub quarters: Categorical,
    /// Months available in each quarter, drawn uniformly.
    pub months: BTreeMap<Label, Vec<Label>>,
    pub days_of_week: Categorical,
    pub time_slots: Categorical,
    pub staff: Categorical,
    /// Inquiry types available in each department, drawn uniformly.
    pub inquiry_types: BTreeMap<Label, Vec<Label>>,
    pub student_types: Categorical,
    /// Prior over `Resolution::ALL`, in that order.
    pub resolution_weights: Vec<f64>,
    /// Per-department first-contact boost. Reported in the generation
    /// summary but never fed into resolution sampling.
    pub fcr_boost: BTreeMap<Label, f64>,
    pub callback_probability: f64,
    pub wait: WaitModel,
    pub service: ServiceModel,
    pub satisfaction: SatisfactionModel,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 3000,
            seed: 42,
            first_id: 10001,
            departments: Categorical::weighted(&[
                ("Financial Aid", 0.30),
                ("Registrar", 0.25),
                ("Student Business Services", 0.20),
                ("Admissions", 0.15),
                ("General Inquiry", 0.10),
            ]),
            channels: Categorical::weighted(&[
                ("Walk-In", 0.45),
                ("Phone", 0.25),
                ("Email", 0.20),
                ("Virtual Appointment", 0.10),
            ]),
            quarters: Categorical::weighted(&[
                ("Fall 2024", 0.35),
                ("Winter 2025", 0.25),
                ("Spring 2025", 0.25),
                ("Summer 2025", 0.15),
            ]),
            months: lookup(&[
                ("Fall 2024", &["Sep", "Oct", "Nov", "Dec"]),
                ("Winter 2025", &["Jan", "Feb", "Mar"]),
                ("Spring 2025", &["Apr", "May", "Jun"]),
                ("Summer 2025", &["Jul", "Aug"]),
            ]),
            days_of_week: Categorical::weighted(&[
                ("Monday", 0.22),
                ("Tuesday", 0.20),
                ("Wednesday", 0.20),
                ("Thursday", 0.20),
                ("Friday", 0.18),
            ]),
            time_slots: Categorical::weighted(&[
                ("8-10 AM", 0.20),
                ("10-12 PM", 0.35),
                ("12-2 PM", 0.25),
                ("2-4 PM", 0.20),
            ]),
            staff: Categorical::uniform(&[
                "Staff A", "Staff B", "Staff C", "Staff D", "Staff E", "Staff F", "Staff G",
                "Staff H",
            ]),
            inquiry_types: lookup(&[
                (
                    "Financial Aid",
                    &["FAFSA Status", "Award Letter", "Scholarship Inquiry", "Loan Questions", "Work-Study"],
                ),
                (
                    "Registrar",
                    &["Transcript Request", "Enrollment Verification", "Grade Change", "Graduation Check", "Add/Drop"],
                ),
                (
                    "Student Business Services",
                    &["Tuition Payment", "Refund Status", "Payment Plan", "Account Hold", "1098-T"],
                ),
                (
                    "Admissions",
                    &["Application Status", "Admission Decision", "Transfer Credits", "Orientation", "Residency"],
                ),
                (
                    "General Inquiry",
                    &["Campus Resources", "Department Referral", "Hours/Location", "General Question", "Complaint"],
                ),
            ]),
            student_types: Categorical::weighted(&[
                ("Undergraduate", 0.55),
                ("Graduate", 0.20),
                ("Prospective", 0.15),
                ("Parent/Guardian", 0.10),
            ]),
            resolution_weights: vec![0.55, 0.20, 0.15, 0.10],
            fcr_boost: table(&[("General Inquiry", 0.15), ("Registrar", 0.05)]),
            callback_probability: 0.70,
            wait: WaitModel::default(),
            service: ServiceModel::default(),
            satisfaction: SatisfactionModel::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load from a JSON file and validate.
    pub fn load(path: &Path) -> DeskResult<Self> {
        let config: Self = read_json(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn fcr_boost_for(&self, department: &str) -> f64 {
        self.fcr_boost.get(department).copied().unwrap_or(0.0)
    }

    pub fn validate(&self) -> DeskResult<()> {
        self.departments.validate("departments")?;
        self.channels.validate("channels")?;
        self.quarters.validate("quarters")?;
        self.days_of_week.validate("days_of_week")?;
        self.time_slots.validate("time_slots")?;
        self.staff.validate("staff")?;
        self.student_types.validate("student_types")?;
        validate_weights("resolution_weights", &self.resolution_weights, Resolution::ALL.len())?;

        for quarter in &self.quarters.labels {
            match self.months.get(quarter) {
                Some(months) if !months.is_empty() => {}
                _ => {
                    return Err(DeskError::invalid_config(format!(
                        "months: no months listed for quarter '{quarter}'"
                    )))
                }
            }
        }
        for department in &self.departments.labels {
            match self.inquiry_types.get(department) {
                Some(types) if !types.is_empty() => {}
                _ => {
                    return Err(DeskError::invalid_config(format!(
                        "inquiry_types: no inquiry types listed for department '{department}'"
                    )))
                }
            }
        }

        if !(0.0..=1.0).contains(&self.callback_probability) {
            return Err(DeskError::invalid_config(format!(
                "callback_probability {} outside [0, 1]",
                self.callback_probability
            )));
        }
        if !(self.wait.exponential_scale > 0.0) {
            return Err(DeskError::invalid_config("wait.exponential_scale must be positive"));
        }
        if !(self.service.std_dev >= 0.0 && self.satisfaction.std_dev >= 0.0) {
            return Err(DeskError::invalid_config("standard deviations must be non-negative"));
        }
        validate_range("wait", self.wait.min, self.wait.max, WAIT_RANGE)?;
        validate_range("service", self.service.min, self.service.max, SERVICE_RANGE)?;
        validate_range(
            "satisfaction",
            self.satisfaction.min,
            self.satisfaction.max,
            SATISFACTION_RANGE,
        )?;
        Ok(())
    }
}

// ── Report ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    /// Significance threshold for both hypothesis tests.
    pub alpha: f64,
    pub day_order: Vec<Label>,
    pub time_slot_order: Vec<Label>,
    /// Bucket i spans [edges[i], edges[i+1]); the last bucket is closed.
    pub wait_bucket_edges: Vec<f64>,
    pub wait_bucket_labels: Vec<Label>,
    pub peak_periods: usize,
    pub render_charts: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|x| (*x).to_string()).collect::<Vec<_>>();
        Self {
            output_dir: PathBuf::from("dashboards"),
            alpha: 0.05,
            day_order: owned(&["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]),
            time_slot_order: owned(&["8-10 AM", "10-12 PM", "12-2 PM", "2-4 PM"]),
            wait_bucket_edges: vec![0.0, 5.0, 10.0, 15.0, 20.0, 50.0],
            wait_bucket_labels: owned(&["0-5 min", "5-10 min", "10-15 min", "15-20 min", "20+ min"]),
            peak_periods: 5,
            render_charts: true,
        }
    }
}

impl ReportConfig {
    pub fn load(path: &Path) -> DeskResult<Self> {
        let config: Self = read_json(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn validate(&self) -> DeskResult<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(DeskError::invalid_config(format!(
                "alpha {} outside (0, 1)",
                self.alpha
            )));
        }
        let edges = &self.wait_bucket_edges;
        if edges.len() < 2 || edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DeskError::invalid_config(
                "wait_bucket_edges must hold at least two strictly increasing values",
            ));
        }
        if self.wait_bucket_labels.len() != edges.len() - 1 {
            return Err(DeskError::invalid_config(format!(
                "{} wait bucket labels for {} buckets",
                self.wait_bucket_labels.len(),
                edges.len() - 1
            )));
        }
        if self.day_order.is_empty() || self.time_slot_order.is_empty() {
            return Err(DeskError::invalid_config("day_order and time_slot_order must not be empty"));
        }
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> DeskResult<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GeneratorConfig::default().validate().unwrap();
        ReportConfig::default().validate().unwrap();
    }

    #[test]
    fn weights_must_sum_to_one() {
        let mut config = GeneratorConfig::default();
        config.channels.weights = Some(vec![0.5, 0.25, 0.20, 0.10]);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DeskError::InvalidConfig { .. }), "got {err}");
    }

    #[test]
    fn every_department_needs_inquiry_types() {
        let mut config = GeneratorConfig::default();
        config.inquiry_types.remove("Admissions");
        assert!(config.validate().is_err());
    }

    #[test]
    fn bucket_labels_must_match_edges() {
        let mut config = ReportConfig::default();
        config.wait_bucket_labels.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{ "rows": 10, "seed": 7 }"#).unwrap();
        assert_eq!(config.rows, 10);
        assert_eq!(config.seed, 7);
        assert_eq!(config.first_id, 10001);
        assert_eq!(config.departments.labels.len(), 5);
        config.validate().unwrap();
    }

    #[test]
    fn resolution_adjustments_round_trip_through_json() {
        let json = serde_json::to_string(&SatisfactionModel::default()).unwrap();
        assert!(json.contains("Resolved on First Contact"));
        let back: SatisfactionModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.resolution_adjustments[&Resolution::Escalated], -0.3);
    }

    #[test]
    fn fcr_boost_lookup_defaults_to_zero() {
        let config = GeneratorConfig::default();
        assert_eq!(config.fcr_boost_for("General Inquiry"), 0.15);
        assert_eq!(config.fcr_boost_for("Admissions"), 0.0);
    }
}

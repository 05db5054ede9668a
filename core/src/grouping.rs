//! Grouped aggregation over the interaction table.
//!
//! Groups are keyed in an ordered map, so iteration follows the sorted
//! key order. Every view that reports "per X" metrics goes through here.

use crate::{
    interaction::{round_to, Interaction},
    stats::mean,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Partition rows by `key`. Groups are never empty.
pub fn group_by<'a, K, F>(rows: &'a [Interaction], key: F) -> BTreeMap<K, Vec<&'a Interaction>>
where
    K: Ord,
    F: Fn(&'a Interaction) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a Interaction>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(row);
    }
    groups
}

/// Share of `rows` matching `pred`, in percent.
pub fn pct<F>(rows: &[&Interaction], pred: F) -> f64
where
    F: Fn(&Interaction) -> bool,
{
    if rows.is_empty() {
        return f64::NAN;
    }
    rows.iter().filter(|r| pred(r)).count() as f64 / rows.len() as f64 * 100.0
}

pub fn mean_of<F>(rows: &[&Interaction], field: F) -> f64
where
    F: Fn(&Interaction) -> f64,
{
    let values: Vec<f64> = rows.iter().map(|r| field(r)).collect();
    mean(&values)
}

/// The metric set shared by the department, channel and staff views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub volume: usize,
    pub avg_wait: f64,
    pub avg_service: f64,
    pub fcr_pct: f64,
    pub escalation_pct: f64,
    pub callback_pct: f64,
    pub escalations: usize,
    pub avg_satisfaction: f64,
}

impl GroupMetrics {
    pub fn from_rows(rows: &[&Interaction]) -> Self {
        Self {
            volume: rows.len(),
            avg_wait: mean_of(rows, |r| r.wait_time_min),
            avg_service: mean_of(rows, |r| r.service_time_min),
            fcr_pct: pct(rows, |r| r.is_first_contact()),
            escalation_pct: pct(rows, |r| r.escalated.is_yes()),
            callback_pct: pct(rows, |r| r.callback_required.is_yes()),
            escalations: rows.iter().filter(|r| r.escalated.is_yes()).count(),
            avg_satisfaction: mean_of(rows, |r| r.satisfaction_score),
        }
    }

    /// Round every float metric to `places` decimals.
    pub fn rounded(mut self, places: i32) -> Self {
        self.avg_wait = round_to(self.avg_wait, places);
        self.avg_service = round_to(self.avg_service, places);
        self.fcr_pct = round_to(self.fcr_pct, places);
        self.escalation_pct = round_to(self.escalation_pct, places);
        self.callback_pct = round_to(self.callback_pct, places);
        self.avg_satisfaction = round_to(self.avg_satisfaction, places);
        self
    }
}

/// First entry with the largest value; NaN values never win.
pub fn argmax_by<'a, T, F>(items: &'a [T], value: F) -> Option<&'a T>
where
    F: Fn(&T) -> f64,
{
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let v = value(item);
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((item, v)),
        }
    }
    best.map(|(item, _)| item)
}

/// First entry with the smallest value; NaN values never win.
pub fn argmin_by<'a, T, F>(items: &'a [T], value: F) -> Option<&'a T>
where
    F: Fn(&T) -> f64,
{
    argmax_by(items, |item| -value(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{Resolution, YesNo};

    fn row(dept: &str, wait: f64, resolution: Resolution, sat: f64) -> Interaction {
        Interaction {
            id: 1,
            department: dept.into(),
            inquiry_type: "x".into(),
            channel: "Phone".into(),
            student_type: "Graduate".into(),
            quarter: "Fall 2024".into(),
            month: "Oct".into(),
            day_of_week: "Monday".into(),
            time_slot: "8-10 AM".into(),
            staff_member: "Staff A".into(),
            wait_time_min: wait,
            service_time_min: 10.0,
            resolution,
            escalated: YesNo::from(resolution == Resolution::Escalated),
            callback_required: YesNo::No,
            satisfaction_score: sat,
        }
    }

    #[test]
    fn groups_are_sorted_by_key() {
        let rows = vec![
            row("Registrar", 1.0, Resolution::FirstContact, 4.0),
            row("Admissions", 2.0, Resolution::FirstContact, 4.0),
            row("Registrar", 3.0, Resolution::FollowUp, 4.0),
        ];
        let groups = group_by(&rows, |r| r.department.as_str());
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["Admissions", "Registrar"]);
        assert_eq!(groups["Registrar"].len(), 2);
    }

    #[test]
    fn metrics_over_a_group() {
        let rows = vec![
            row("A", 2.0, Resolution::FirstContact, 5.0),
            row("A", 4.0, Resolution::Escalated, 3.0),
            row("A", 6.0, Resolution::FollowUp, 4.0),
            row("A", 8.0, Resolution::FirstContact, 4.0),
        ];
        let refs: Vec<&Interaction> = rows.iter().collect();
        let m = GroupMetrics::from_rows(&refs);
        assert_eq!(m.volume, 4);
        assert_eq!(m.avg_wait, 5.0);
        assert_eq!(m.fcr_pct, 50.0);
        assert_eq!(m.escalation_pct, 25.0);
        assert_eq!(m.escalations, 1);
        assert_eq!(m.avg_satisfaction, 4.0);
    }

    #[test]
    fn argmax_keeps_first_on_ties_and_skips_nan() {
        let items = [f64::NAN, 3.0, 5.0, 5.0, 1.0];
        let idx = |x: &f64| items.iter().position(|y| std::ptr::eq(x, y));
        assert_eq!(argmax_by(&items, |x| *x).and_then(idx), Some(2));
        assert_eq!(argmin_by(&items, |x| *x).and_then(idx), Some(4));
        let empty: [f64; 0] = [];
        assert!(argmax_by(&empty, |x| *x).is_none());
    }
}

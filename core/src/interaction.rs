//! The single entity of the dataset: one service-desk contact.

use crate::types::{InquiryId, Label, Minutes};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const WAIT_RANGE: (f64, f64) = (0.0, 45.0);
pub const SERVICE_RANGE: (f64, f64) = (2.0, 40.0);
pub const SATISFACTION_RANGE: (f64, f64) = (1.0, 5.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "Resolved on First Contact")]
    FirstContact,
    #[serde(rename = "Follow-Up Required")]
    FollowUp,
    #[serde(rename = "Escalated to Department")]
    Escalated,
    #[serde(rename = "Referred to Another Office")]
    Referred,
}

impl Resolution {
    /// Sampling order used by the generator's probability vector.
    pub const ALL: [Resolution; 4] = [
        Self::FirstContact,
        Self::FollowUp,
        Self::Escalated,
        Self::Referred,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstContact => "Resolved on First Contact",
            Self::FollowUp => "Follow-Up Required",
            Self::Escalated => "Escalated to Department",
            Self::Referred => "Referred to Another Office",
        }
    }

    pub fn is_first_contact(&self) -> bool {
        matches!(self, Self::FirstContact)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(rename = "inquiry_id")]
    pub id: InquiryId,
    pub department: Label,
    pub inquiry_type: Label,
    pub channel: Label,
    pub student_type: Label,
    pub quarter: Label,
    pub month: Label,
    pub day_of_week: Label,
    pub time_slot: Label,
    pub staff_member: Label,
    pub wait_time_min: Minutes,
    pub service_time_min: Minutes,
    pub resolution: Resolution,
    pub escalated: YesNo,
    pub callback_required: YesNo,
    pub satisfaction_score: f64,
}

impl Interaction {
    pub fn is_first_contact(&self) -> bool {
        self.resolution.is_first_contact()
    }

    /// Lists every row invariant this interaction breaks.
    /// An empty vec means the row is consistent.
    pub fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        let in_range = |v: f64, (lo, hi): (f64, f64)| v >= lo && v <= hi;

        if !in_range(self.wait_time_min, WAIT_RANGE) {
            out.push(format!("wait_time_min {} outside {:?}", self.wait_time_min, WAIT_RANGE));
        }
        if !in_range(self.service_time_min, SERVICE_RANGE) {
            out.push(format!(
                "service_time_min {} outside {:?}",
                self.service_time_min, SERVICE_RANGE
            ));
        }
        if !in_range(self.satisfaction_score, SATISFACTION_RANGE) {
            out.push(format!(
                "satisfaction_score {} outside {:?}",
                self.satisfaction_score, SATISFACTION_RANGE
            ));
        }
        if self.escalated.is_yes() != (self.resolution == Resolution::Escalated) {
            out.push(format!(
                "escalated={:?} inconsistent with resolution '{}'",
                self.escalated, self.resolution
            ));
        }
        if self.callback_required.is_yes() && self.resolution != Resolution::FollowUp {
            out.push(format!(
                "callback required on non-follow-up resolution '{}'",
                self.resolution
            ));
        }
        out
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Interaction {
        Interaction {
            id: 10001,
            department: "Registrar".into(),
            inquiry_type: "Grade Change".into(),
            channel: "Phone".into(),
            student_type: "Graduate".into(),
            quarter: "Spring 2025".into(),
            month: "Apr".into(),
            day_of_week: "Monday".into(),
            time_slot: "8-10 AM".into(),
            staff_member: "Staff A".into(),
            wait_time_min: 4.2,
            service_time_min: 11.0,
            resolution: Resolution::FirstContact,
            escalated: YesNo::No,
            callback_required: YesNo::No,
            satisfaction_score: 4.4,
        }
    }

    #[test]
    fn consistent_row_has_no_violations() {
        assert!(row().violations().is_empty());
    }

    #[test]
    fn escalated_flag_must_match_resolution() {
        let mut r = row();
        r.escalated = YesNo::Yes;
        assert_eq!(r.violations().len(), 1);

        r.resolution = Resolution::Escalated;
        assert!(r.violations().is_empty());
    }

    #[test]
    fn callback_only_on_follow_up() {
        let mut r = row();
        r.callback_required = YesNo::Yes;
        assert_eq!(r.violations().len(), 1);
        r.resolution = Resolution::FollowUp;
        assert!(r.violations().is_empty());
    }

    #[test]
    fn out_of_range_values_are_flagged() {
        let mut r = row();
        r.wait_time_min = 45.1;
        r.satisfaction_score = 0.9;
        assert_eq!(r.violations().len(), 2);
    }

    #[test]
    fn rounding_to_places() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(2.25, 1), 2.3);
        assert_eq!(round_to(-1.05, 0), -1.0);
    }
}

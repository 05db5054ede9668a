//! Row builders shared by the integration tests.
#![allow(dead_code)]

use servicedesk_core::{Interaction, InteractionTable, Resolution, YesNo};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A consistent row; tweak fields with struct update syntax.
pub fn row(id: u64) -> Interaction {
    Interaction {
        id,
        department: "Registrar".into(),
        inquiry_type: "Transcript Request".into(),
        channel: "Phone".into(),
        student_type: "Undergraduate".into(),
        quarter: "Fall 2024".into(),
        month: "Oct".into(),
        day_of_week: "Monday".into(),
        time_slot: "10-12 PM".into(),
        staff_member: "Staff A".into(),
        wait_time_min: 6.0,
        service_time_min: 12.0,
        resolution: Resolution::FirstContact,
        escalated: YesNo::No,
        callback_required: YesNo::No,
        satisfaction_score: 4.0,
    }
}

pub fn with_resolution(mut r: Interaction, resolution: Resolution) -> Interaction {
    r.resolution = resolution;
    r.escalated = YesNo::from(resolution == Resolution::Escalated);
    if resolution != Resolution::FollowUp {
        r.callback_required = YesNo::No;
    }
    r
}

/// Cycle through all four resolutions by id.
pub fn cycled_resolution(id: u64) -> Resolution {
    Resolution::ALL[(id % 4) as usize]
}

pub fn table(rows: Vec<Interaction>) -> InteractionTable {
    InteractionTable::from_rows(rows)
}

const DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
const SLOTS: [&str; 4] = ["8-10 AM", "10-12 PM", "12-2 PM", "2-4 PM"];
const CHANNELS: [&str; 3] = ["Phone", "Email", "Walk-In"];
const STAFF: [&str; 3] = ["Staff A", "Staff B", "Staff C"];

/// `n` rows spread over days, slots, channels, staff and resolutions,
/// with waits and scores that vary enough for both hypothesis tests.
pub fn spread(n: u64) -> Vec<Interaction> {
    (1..=n)
        .map(|id| {
            let i = id as usize;
            let mut r = with_resolution(row(id), cycled_resolution(id));
            r.day_of_week = DAYS[i % DAYS.len()].into();
            r.time_slot = SLOTS[(i / 2) % SLOTS.len()].into();
            r.channel = CHANNELS[i % CHANNELS.len()].into();
            r.staff_member = STAFF[(i / 3) % STAFF.len()].into();
            r.department = if i % 2 == 0 { "Registrar" } else { "Financial Aid" }.into();
            r.wait_time_min = ((i * 7) % 45) as f64;
            r.satisfaction_score = 1.0 + ((i * 3) % 5) as f64;
            r
        })
        .collect()
}

mod support;

use servicedesk_core::views::VolumeView;
use servicedesk_core::{Interaction, ReportConfig};
use support::{row, table};

fn at(id: u64, day: &str, slot: &str, wait: f64) -> Interaction {
    let mut r = row(id);
    r.day_of_week = day.into();
    r.time_slot = slot.into();
    r.wait_time_min = wait;
    r
}

fn sample() -> VolumeView {
    let rows = vec![
        at(1, "Tuesday", "10-12 PM", 4.0),
        at(2, "Tuesday", "10-12 PM", 5.0),
        at(3, "Tuesday", "10-12 PM", 9.0),
        at(4, "Friday", "2-4 PM", 1.0),
        at(5, "Friday", "2-4 PM", 2.0),
        at(6, "Monday", "8-10 AM", 10.0),
        at(7, "Monday", "8-10 AM", 11.0),
        at(8, "Monday", "10-12 PM", 3.0),
    ];
    VolumeView::compute(&table(rows), &ReportConfig::default()).unwrap()
}

#[test]
fn days_follow_configured_order_with_gaps() {
    let view = sample();
    let days: Vec<(&str, Option<usize>)> = view
        .days
        .iter()
        .map(|d| (d.day.as_str(), d.volume))
        .collect();
    assert_eq!(
        days,
        [
            ("Monday", Some(3)),
            ("Tuesday", Some(3)),
            ("Wednesday", None),
            ("Thursday", None),
            ("Friday", Some(2)),
        ]
    );
    assert_eq!(view.slots[2].slot, "12-2 PM");
    assert_eq!(view.slots[2].volume, None);
}

#[test]
fn peaks_sorted_by_volume_then_name() {
    let view = sample();
    let peaks: Vec<(&str, &str, usize)> = view
        .peaks
        .iter()
        .map(|p| (p.day.as_str(), p.slot.as_str(), p.volume))
        .collect();
    assert_eq!(
        peaks,
        [
            ("Tuesday", "10-12 PM", 3),
            ("Friday", "2-4 PM", 2),
            ("Monday", "8-10 AM", 2),
            ("Monday", "10-12 PM", 1),
        ]
    );
    assert_eq!(view.peaks[0].avg_wait, 6.0);
    assert_eq!(view.peaks[1].avg_wait, 1.5);
}

#[test]
fn peak_periods_are_truncated() {
    let config = ReportConfig {
        peak_periods: 2,
        ..ReportConfig::default()
    };
    let rows = (1..=20)
        .map(|i| at(i, "Wednesday", if i % 2 == 0 { "8-10 AM" } else { "12-2 PM" }, 1.0))
        .chain([at(21, "Thursday", "2-4 PM", 1.0)])
        .collect();
    let view = VolumeView::compute(&table(rows), &config).unwrap();
    assert_eq!(view.peaks.len(), 2);
    assert!(view.peaks.iter().all(|p| p.day == "Wednesday"));
}

#[test]
fn first_day_wins_ties() {
    let view = sample();
    assert_eq!(view.peak_day().unwrap().day, "Monday");
    assert_eq!(view.peak_slot().unwrap().slot, "10-12 PM");
}

#[test]
fn heatmap_matches_row_count() {
    let view = sample();
    assert_eq!(view.heatmap.len(), 5);
    assert!(view.heatmap.iter().all(|row| row.len() == 4));
    let total: usize = view.heatmap.iter().flatten().sum();
    assert_eq!(total, 8);
    // Tuesday x 10-12 PM
    assert_eq!(view.heatmap[1][1], 3);
    assert_eq!(view.heatmap[2], vec![0, 0, 0, 0]);
}

#[test]
fn quarters_in_name_order() {
    let mut spring = row(2);
    spring.quarter = "Spring 2025".into();
    spring.wait_time_min = 2.25;
    let view = VolumeView::compute(&table(vec![row(1), spring]), &ReportConfig::default()).unwrap();
    let names: Vec<&str> = view.quarters.iter().map(|q| q.quarter.as_str()).collect();
    assert_eq!(names, ["Fall 2024", "Spring 2025"]);
    assert_eq!(view.quarters[1].avg_wait, 2.3);
}

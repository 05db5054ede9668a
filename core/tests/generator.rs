mod support;

use servicedesk_core::views::KpiView;
use servicedesk_core::{
    GenerationSummary, GeneratorConfig, Interaction, InteractionGenerator, InteractionTable,
    Resolution,
};

fn generate(seed: u64, rows: usize) -> (GeneratorConfig, Vec<Interaction>) {
    let config = GeneratorConfig::default().with_seed(seed).with_rows(rows);
    let generator = InteractionGenerator::new(config.clone()).expect("valid config");
    (config, generator.generate().expect("generate"))
}

#[test]
fn numeric_fields_stay_in_range() {
    support::init_logging();
    let (_, rows) = generate(42, 3000);
    assert_eq!(rows.len(), 3000);
    for r in &rows {
        assert!((0.0..=45.0).contains(&r.wait_time_min), "wait {}", r.wait_time_min);
        assert!((2.0..=40.0).contains(&r.service_time_min), "service {}", r.service_time_min);
        assert!((1.0..=5.0).contains(&r.satisfaction_score), "sat {}", r.satisfaction_score);
    }
}

#[test]
fn numeric_fields_have_one_decimal() {
    let (_, rows) = generate(42, 500);
    for r in &rows {
        for v in [r.wait_time_min, r.service_time_min, r.satisfaction_score] {
            assert!(((v * 10.0).round() - v * 10.0).abs() < 1e-9, "{v} has more than one decimal");
        }
    }
}

#[test]
fn escalated_iff_escalated_resolution() {
    let (_, rows) = generate(42, 3000);
    for r in &rows {
        assert_eq!(
            r.escalated.is_yes(),
            r.resolution == Resolution::Escalated,
            "inquiry {}",
            r.id
        );
    }
}

#[test]
fn callback_implies_follow_up() {
    let (_, rows) = generate(42, 3000);
    let callbacks: Vec<_> = rows.iter().filter(|r| r.callback_required.is_yes()).collect();
    assert!(!callbacks.is_empty());
    for r in callbacks {
        assert_eq!(r.resolution, Resolution::FollowUp, "inquiry {}", r.id);
    }

    // About 70% of follow-ups should require a callback.
    let follow_ups: Vec<_> = rows
        .iter()
        .filter(|r| r.resolution == Resolution::FollowUp)
        .collect();
    let share = follow_ups.iter().filter(|r| r.callback_required.is_yes()).count() as f64
        / follow_ups.len() as f64;
    assert!((share - 0.70).abs() < 0.08, "callback share {share}");
}

#[test]
fn every_row_is_consistent() {
    let (_, rows) = generate(7, 2000);
    for r in &rows {
        assert!(r.violations().is_empty(), "inquiry {}: {:?}", r.id, r.violations());
    }
}

#[test]
fn ids_are_sequential_from_first_id() {
    let (config, rows) = generate(42, 25);
    for (i, r) in rows.iter().enumerate() {
        assert_eq!(r.id, config.first_id + i as u64);
    }
}

#[test]
fn conditional_columns_come_from_their_bucket() {
    let (config, rows) = generate(42, 3000);
    for r in &rows {
        assert!(config.months[&r.quarter].contains(&r.month), "{} not in {}", r.month, r.quarter);
        assert!(
            config.inquiry_types[&r.department].contains(&r.inquiry_type),
            "{} not in {}",
            r.inquiry_type,
            r.department
        );
    }
}

#[test]
fn fcr_share_matches_prior() {
    let (_, rows) = generate(42, 3000);
    let fcr = rows.iter().filter(|r| r.is_first_contact()).count() as f64 / rows.len() as f64;
    assert!((fcr - 0.55).abs() < 0.03, "fcr share {fcr}");
}

#[test]
fn report_fcr_rate_matches_generated_rows() {
    let (_, rows) = generate(42, 3000);
    let first_contact = rows.iter().filter(|r| r.resolution == Resolution::FirstContact).count();
    let expected = first_contact as f64 / rows.len() as f64 * 100.0;

    let kpis = KpiView::compute(&InteractionTable::from_rows(rows)).unwrap();
    assert_eq!(kpis.global.total, 3000);
    assert!((kpis.global.fcr_pct - expected).abs() < 1e-9);
    assert!((kpis.global.fcr_pct - 55.0).abs() < 3.0, "fcr {}", kpis.global.fcr_pct);
}

#[test]
fn walk_in_waits_longer_than_email() {
    let (_, rows) = generate(42, 3000);
    let avg = |channel: &str| {
        let waits: Vec<f64> = rows
            .iter()
            .filter(|r| r.channel == channel)
            .map(|r| r.wait_time_min)
            .collect();
        waits.iter().sum::<f64>() / waits.len() as f64
    };
    // +5 minute walk-in adjustment
    assert!(avg("Walk-In") - avg("Email") > 3.0);
}

#[test]
fn fcr_boost_does_not_bias_resolution() {
    // General Inquiry carries the largest boost; its FCR share should still
    // sit at the global prior.
    let (_, rows) = generate(42, 20_000);
    let gi: Vec<_> = rows.iter().filter(|r| r.department == "General Inquiry").collect();
    let share = gi.iter().filter(|r| r.is_first_contact()).count() as f64 / gi.len() as f64;
    assert!((share - 0.55).abs() < 0.05, "General Inquiry fcr share {share}");
}

#[test]
fn summary_reports_counts_and_boost() {
    let (config, rows) = generate(42, 3000);
    let summary = GenerationSummary::from_rows(&rows, &config);
    assert_eq!(summary.rows, 3000);
    assert_eq!(summary.departments.iter().map(|v| v.count).sum::<usize>(), 3000);
    assert!(summary
        .departments
        .windows(2)
        .all(|w| w[0].count >= w[1].count));
    assert!(summary.avg_fcr_boost > 0.0 && summary.avg_fcr_boost < 0.15);
    let text = summary.render();
    assert!(text.starts_with("Dataset created: 3000 student service interactions"));
    assert!(text.contains("First Contact Resolution:"));
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = GeneratorConfig::default();
    config.resolution_weights = vec![0.5, 0.5];
    assert!(InteractionGenerator::new(config).is_err());
}

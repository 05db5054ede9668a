mod support;

use servicedesk_core::charts::CHART_FILES;
use servicedesk_core::report::REPORT_JSON;
use servicedesk_core::{DeskError, InteractionTable, OperationsReport, ReportConfig};
use std::fs;
use support::{spread, table};

const TITLES: [&str; 7] = [
    "STUDENT SERVICES OPERATIONS ANALYTICS",
    "1. OPERATIONS OVERVIEW & KPIs",
    "2. VOLUME PATTERNS & STAFFING ANALYSIS",
    "3. CHANNEL ANALYSIS & SERVICE EFFICIENCY",
    "4. STAFF PERFORMANCE & WORKLOAD",
    "5. SATISFACTION DRIVERS & STATISTICAL ANALYSIS",
    "6. KEY FINDINGS & PROCESS IMPROVEMENT RECOMMENDATIONS",
];

fn build() -> OperationsReport {
    OperationsReport::build(&table(spread(200)), &ReportConfig::default()).unwrap()
}

#[test]
fn text_has_every_banner_in_order() {
    support::init_logging();
    let text = build().render_text().unwrap();
    let mut from = 0;
    for title in TITLES {
        let at = text[from..]
            .find(title)
            .unwrap_or_else(|| panic!("missing or out of order: {title}"));
        from += at + title.len();
    }
}

#[test]
fn recommendations_come_from_the_sections() {
    let report = build();
    let rec = &report.recommendations;
    assert_eq!(rec.findings.len(), 6);
    assert_eq!(rec.recommendations.len(), 6);
    // Equal day volumes: first configured day wins.
    assert_eq!(rec.peak_day, "Monday");
    assert_eq!(rec.fcr_pct, report.kpis.global.fcr_pct);
    assert!(rec.findings[1].starts_with(&rec.busiest_channel));
}

#[test]
fn publish_writes_charts_and_json() {
    support::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("dashboards");
    let config = ReportConfig::default().with_output_dir(&out);

    let report = build();
    let (text, written) = report.publish(&config, None).unwrap();
    assert_eq!(written.len(), CHART_FILES.len() + 1);
    for name in CHART_FILES {
        let path = out.join(name);
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"), "{} is not svg", path.display());
    }
    assert!(text.contains("Analysis complete. 7 files saved"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(REPORT_JSON)).unwrap()).unwrap();
    assert!(json["generated_at"].is_string());
    assert_eq!(json["report"]["overview"]["interactions"], 200);
}

#[test]
fn publish_without_charts_writes_only_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = ReportConfig {
        render_charts: false,
        ..ReportConfig::default().with_output_dir(dir.path())
    };
    let (_, written) = build().publish(&config, None).unwrap();
    assert_eq!(written, vec![dir.path().join(REPORT_JSON)]);
}

#[test]
fn empty_table_cannot_be_reported() {
    let err = OperationsReport::build(&InteractionTable::default(), &ReportConfig::default())
        .unwrap_err();
    assert!(matches!(err, DeskError::EmptyTable));
}

#[test]
fn invalid_config_is_rejected_before_work() {
    let config = ReportConfig {
        alpha: 1.5,
        ..ReportConfig::default()
    };
    let err = OperationsReport::build(&table(spread(20)), &config).unwrap_err();
    assert!(matches!(err, DeskError::InvalidConfig { .. }));
}

#[test]
fn constant_waits_do_not_block_the_report() {
    let rows = spread(40)
        .into_iter()
        .map(|mut r| {
            r.wait_time_min = 25.0;
            r
        })
        .collect();
    let report = OperationsReport::build(&table(rows), &ReportConfig::default()).unwrap();
    assert!(report.satisfaction.wait_correlation.is_none());
    assert!(!report.recommendations.wait_correlation_negative);
    assert_eq!(report.satisfaction.wait_buckets[4].count, 40);
    assert!(report.render_text().unwrap().contains("r = NaN"));
}

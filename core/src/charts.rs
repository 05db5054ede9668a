//! Dashboard charts.
//!
//! Six SVG files, one per report area, written into the output directory:
//!   01_kpi_dashboard         wait / FCR / satisfaction by department
//!   02_volume_heatmap        day of week x time slot volume
//!   03_channel_analysis      channel share, wait vs service time
//!   04_staff_performance     FCR, satisfaction (x20), escalation rate
//!   05_satisfaction_drivers  satisfaction by resolution and by wait bucket
//!   06_quarterly_volume      volume and average wait by quarter

use crate::{error::DeskResult, report::OperationsReport};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const CHART_FILES: [&str; 6] = [
    "01_kpi_dashboard.svg",
    "02_volume_heatmap.svg",
    "03_channel_analysis.svg",
    "04_staff_performance.svg",
    "05_satisfaction_drivers.svg",
    "06_quarterly_volume.svg",
];

const FONT: &str = "sans-serif";

const DEPT_COLORS: [RGBColor; 5] = [
    RGBColor(0x15, 0x65, 0xC0),
    RGBColor(0x42, 0xA5, 0xF5),
    RGBColor(0x90, 0xCA, 0xF9),
    RGBColor(0xBB, 0xDE, 0xFB),
    RGBColor(0xE3, 0xF2, 0xFD),
];
/// Channel share bars, in channel name order.
const CHANNEL_COLORS: [RGBColor; 4] = [
    RGBColor(0x15, 0x65, 0xC0),
    RGBColor(0x42, 0xA5, 0xF5),
    RGBColor(0x90, 0xCA, 0xF9),
    RGBColor(0xBB, 0xDE, 0xFB),
];
const RESOLUTION_COLORS: [RGBColor; 4] = [
    RGBColor(0x4C, 0xAF, 0x50),
    RGBColor(0xFF, 0x98, 0x00),
    RGBColor(0xF4, 0x43, 0x36),
    RGBColor(0x9E, 0x9E, 0x9E),
];
const BUCKET_COLORS: [RGBColor; 5] = [
    RGBColor(0x4C, 0xAF, 0x50),
    RGBColor(0x8B, 0xC3, 0x4A),
    RGBColor(0xFF, 0x98, 0x00),
    RGBColor(0xFF, 0x57, 0x22),
    RGBColor(0xF4, 0x43, 0x36),
];
const ORANGE_BAR: RGBColor = RGBColor(0xFF, 0x98, 0x00);
const BLUE_BAR: RGBColor = RGBColor(0x15, 0x65, 0xC0);
const GREEN_BAR: RGBColor = RGBColor(0x4C, 0xAF, 0x50);
const RED_BAR: RGBColor = RGBColor(0xFF, 0x57, 0x22);

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// One bar series of a grouped bar chart.
struct Series<'a> {
    name: &'a str,
    color: RGBColor,
    values: Vec<f64>,
}

/// Render all six charts. Creates `dir` if missing.
pub fn render_all(report: &OperationsReport, dir: &Path) -> DeskResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let paths: Vec<PathBuf> = CHART_FILES.iter().map(|f| dir.join(f)).collect();

    kpi_dashboard(report, &paths[0])?;
    volume_heatmap(report, &paths[1])?;
    channel_analysis(report, &paths[2])?;
    staff_performance(report, &paths[3])?;
    satisfaction_drivers(report, &paths[4])?;
    quarterly_volume(report, &paths[5])?;

    for p in &paths {
        log::info!("charts: saved {}", p.display());
    }
    Ok(paths)
}

fn kpi_dashboard(report: &OperationsReport, path: &Path) -> anyhow::Result<()> {
    let depts = &report.kpis.departments;
    let labels: Vec<String> = depts.iter().map(|d| d.department.clone()).collect();

    let root = SVGBackend::new(path, (1500, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Student Services KPI Dashboard", (FONT, 24))?;
    let panels = root.split_evenly((1, 3));

    horizontal_bars(
        &panels[0],
        "Wait Time by Department",
        "Avg Wait Time (min)",
        &labels,
        &depts.iter().map(|d| d.metrics.avg_wait).collect::<Vec<_>>(),
        &DEPT_COLORS,
        |v| format!("{v:.1}m"),
    )?;
    horizontal_bars(
        &panels[1],
        "FCR Rate by Department",
        "First Contact Resolution (%)",
        &labels,
        &depts.iter().map(|d| d.metrics.fcr_pct).collect::<Vec<_>>(),
        &DEPT_COLORS,
        |v| format!("{v:.1}%"),
    )?;
    horizontal_bars(
        &panels[2],
        "Satisfaction by Department",
        "Avg Satisfaction (1-5)",
        &labels,
        &depts.iter().map(|d| d.metrics.avg_satisfaction).collect::<Vec<_>>(),
        &DEPT_COLORS,
        |v| format!("{v:.2}"),
    )?;

    root.present()?;
    Ok(())
}

fn volume_heatmap(report: &OperationsReport, path: &Path) -> anyhow::Result<()> {
    let volume = &report.volume;
    let days: Vec<String> = volume.days.iter().map(|d| d.day.clone()).collect();
    let slots: Vec<String> = volume.slots.iter().map(|s| s.slot.clone()).collect();
    let (nd, ns) = (days.len() as i32, slots.len() as i32);
    let max = volume
        .heatmap
        .iter()
        .flatten()
        .copied()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    // First day at the top.
    let rev_days: Vec<String> = days.iter().rev().cloned().collect();

    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Inquiry Volume: Day of Week x Time Slot", (FONT, 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(100)
        .build_cartesian_2d((0..ns).into_segmented(), (0..nd).into_segmented())?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(slots.len())
        .y_labels(days.len())
        .x_label_formatter(&|v| segment_label(v, &slots))
        .y_label_formatter(&|v| segment_label(v, &rev_days))
        .x_desc("Time Slot")
        .y_desc("Day of Week")
        .draw()?;

    let mut cells = Vec::new();
    for (d, row) in volume.heatmap.iter().enumerate() {
        let y = nd - 1 - d as i32;
        for (s, count) in row.iter().enumerate() {
            cells.push((s as i32, y, *count));
        }
    }
    chart.draw_series(cells.iter().map(|(x, y, count)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(*x), SegmentValue::Exact(*y)),
                (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
            ],
            blues(*count as f64 / max).filled(),
        )
    }))?;
    chart.draw_series(cells.iter().map(|(x, y, count)| {
        let color = if (*count as f64 / max) > 0.6 { WHITE } else { BLACK };
        Text::new(
            count.to_string(),
            (SegmentValue::CenterOf(*x), SegmentValue::CenterOf(*y)),
            (FONT, 14).into_font().color(&color),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn channel_analysis(report: &OperationsReport, path: &Path) -> anyhow::Result<()> {
    let channels = &report.channels.channels;
    let labels: Vec<String> = channels.iter().map(|c| c.channel.clone()).collect();

    let root = SVGBackend::new(path, (1200, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Channel Performance Analysis", (FONT, 24))?;
    let panels = root.split_evenly((1, 2));

    horizontal_bars(
        &panels[0],
        "Inquiry Volume by Channel",
        "Share of Interactions (%)",
        &labels,
        &channels.iter().map(|c| c.share_pct).collect::<Vec<_>>(),
        &CHANNEL_COLORS,
        |v| format!("{v:.1}%"),
    )?;
    grouped_bars(
        &panels[1],
        "Wait & Service Time by Channel",
        "Minutes",
        &labels,
        &[
            Series {
                name: "Wait Time",
                color: ORANGE_BAR,
                values: channels.iter().map(|c| c.metrics.avg_wait).collect(),
            },
            Series {
                name: "Service Time",
                color: BLUE_BAR,
                values: channels.iter().map(|c| c.metrics.avg_service).collect(),
            },
        ],
    )?;

    root.present()?;
    Ok(())
}

fn staff_performance(report: &OperationsReport, path: &Path) -> anyhow::Result<()> {
    let staff = &report.staff.staff;
    let labels: Vec<String> = staff.iter().map(|s| s.staff_member.clone()).collect();

    let root = SVGBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    grouped_bars(
        &root,
        "Staff Performance: FCR, Satisfaction & Escalation Rates",
        "Percentage / Score",
        &labels,
        &[
            Series {
                name: "FCR %",
                color: GREEN_BAR,
                values: staff.iter().map(|s| s.metrics.fcr_pct).collect(),
            },
            Series {
                name: "Satisfaction (x20)",
                color: BLUE_BAR,
                values: staff.iter().map(|s| s.metrics.avg_satisfaction * 20.0).collect(),
            },
            Series {
                name: "Escalation %",
                color: RED_BAR,
                values: staff.iter().map(|s| s.escalation_pct()).collect(),
            },
        ],
    )?;

    root.present()?;
    Ok(())
}

fn satisfaction_drivers(report: &OperationsReport, path: &Path) -> anyhow::Result<()> {
    let sat = &report.satisfaction;
    let root = SVGBackend::new(path, (1200, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("What Drives Student Satisfaction?", (FONT, 24))?;
    let panels = root.split_evenly((1, 2));

    horizontal_bars(
        &panels[0],
        "Satisfaction by Resolution Type",
        "Avg Satisfaction (1-5)",
        &sat
            .by_resolution
            .iter()
            .map(|r| r.resolution.label().to_string())
            .collect::<Vec<_>>(),
        &sat.by_resolution
            .iter()
            .map(|r| r.avg_satisfaction)
            .collect::<Vec<_>>(),
        &RESOLUTION_COLORS,
        |v| format!("{v:.2}"),
    )?;

    let filled: Vec<(String, f64)> = sat
        .wait_buckets
        .iter()
        .filter_map(|b| b.avg_satisfaction.map(|s| (b.label.clone(), s)))
        .collect();
    vertical_bars(
        &panels[1],
        "Satisfaction by Wait Time",
        "Avg Satisfaction",
        &filled.iter().map(|(l, _)| l.clone()).collect::<Vec<_>>(),
        &filled.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
        &BUCKET_COLORS,
        |v| format!("{v:.2}"),
    )?;

    root.present()?;
    Ok(())
}

fn quarterly_volume(report: &OperationsReport, path: &Path) -> anyhow::Result<()> {
    let quarters = &report.volume.quarters;
    let root = SVGBackend::new(path, (900, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Volume and Average Wait by Quarter", (FONT, 24))?;
    let panels = root.split_evenly((1, 2));
    let labels: Vec<String> = quarters.iter().map(|q| q.quarter.clone()).collect();

    vertical_bars(
        &panels[0],
        "Interactions",
        "Volume",
        &labels,
        &quarters.iter().map(|q| q.volume as f64).collect::<Vec<_>>(),
        &DEPT_COLORS,
        |v| format!("{v:.0}"),
    )?;
    vertical_bars(
        &panels[1],
        "Average Wait",
        "Minutes",
        &labels,
        &quarters.iter().map(|q| q.avg_wait).collect::<Vec<_>>(),
        &[ORANGE_BAR],
        |v| format!("{v:.1}m"),
    )?;

    root.present()?;
    Ok(())
}

// ── Building blocks ────────────────────────────────────────────────

fn horizontal_bars(
    area: &Area<'_>,
    title: &str,
    x_desc: &str,
    labels: &[String],
    values: &[f64],
    colors: &[RGBColor],
    value_label: impl Fn(f64) -> String,
) -> anyhow::Result<()> {
    let n = labels.len() as i32;
    let max = axis_max(values);
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 16))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(170)
        .build_cartesian_2d(0f64..max, (0..n).into_segmented())?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(labels.len())
        .y_label_formatter(&|v| segment_label(v, labels))
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        let i = i as i32;
        let mut bar = Rectangle::new(
            [(0.0, SegmentValue::Exact(i)), (*v, SegmentValue::Exact(i + 1))],
            pick_color(colors, i).filled(),
        );
        bar.set_margin(5, 5, 0, 0);
        bar
    }))?;
    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        Text::new(
            value_label(*v),
            (*v + max * 0.01, SegmentValue::CenterOf(i as i32)),
            (FONT, 12),
        )
    }))?;
    Ok(())
}

fn vertical_bars(
    area: &Area<'_>,
    title: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
    colors: &[RGBColor],
    value_label: impl Fn(f64) -> String,
) -> anyhow::Result<()> {
    let n = labels.len() as i32;
    let max = axis_max(values);
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 16))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| segment_label(v, labels))
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        let i = i as i32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
            pick_color(colors, i).filled(),
        );
        bar.set_margin(0, 0, 8, 8);
        bar
    }))?;
    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        Text::new(
            value_label(*v),
            (SegmentValue::CenterOf(i as i32), *v + max * 0.03),
            (FONT, 12),
        )
    }))?;
    Ok(())
}

/// Each label owns `series.len() + 1` segments: one per series plus a gap.
fn grouped_bars(
    area: &Area<'_>,
    title: &str,
    y_desc: &str,
    labels: &[String],
    series: &[Series<'_>],
) -> anyhow::Result<()> {
    let stride = series.len() as i32 + 1;
    let n = labels.len() as i32 * stride;
    let all: Vec<f64> = series.iter().flat_map(|s| s.values.iter().copied()).collect();
    let max = axis_max(&all);
    let label_offset = (series.len() as i32 - 1) / 2;

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 16))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..max)?;
    let group_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) if i.rem_euclid(stride) == label_offset => {
            usize::try_from(i / stride)
                .ok()
                .and_then(|g| labels.get(g))
                .cloned()
                .unwrap_or_default()
        }
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n as usize)
        .x_label_formatter(&group_label)
        .y_desc(y_desc)
        .draw()?;

    for (s_idx, s) in series.iter().enumerate() {
        let color = s.color;
        chart
            .draw_series(s.values.iter().enumerate().map(|(g, v)| {
                let x = g as i32 * stride + s_idx as i32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(x), 0.0), (SegmentValue::Exact(x + 1), *v)],
                    color.filled(),
                );
                bar.set_margin(0, 0, 1, 1);
                bar
            }))?
            .label(s.name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn segment_label(v: &SegmentValue<i32>, labels: &[String]) -> String {
    match v {
        SegmentValue::CenterOf(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Upper axis bound with headroom for value labels; never zero.
fn axis_max(values: &[f64]) -> f64 {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.2
    } else {
        1.0
    }
}

fn pick_color(colors: &[RGBColor], i: i32) -> RGBColor {
    usize::try_from(i)
        .ok()
        .and_then(|i| colors.get(i % colors.len().max(1)))
        .copied()
        .unwrap_or(BLUE_BAR)
}

/// White-to-navy ramp for the heatmap, `t` in [0, 1].
fn blues(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
    RGBColor(lerp(0xF7, 0x08), lerp(0xFB, 0x30), lerp(0xFF, 0x6B))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_palette_cycles_in_order() {
        assert_eq!(pick_color(&CHANNEL_COLORS, 0), RGBColor(0x15, 0x65, 0xC0));
        assert_eq!(pick_color(&CHANNEL_COLORS, 3), RGBColor(0xBB, 0xDE, 0xFB));
        assert_eq!(pick_color(&CHANNEL_COLORS, 4), CHANNEL_COLORS[0]);
        assert_eq!(pick_color(&[], 1), BLUE_BAR);
    }

    #[test]
    fn axis_max_leaves_headroom() {
        assert!((axis_max(&[2.0, 10.0, f64::NAN]) - 12.0).abs() < 1e-12);
        assert_eq!(axis_max(&[]), 1.0);
    }

    #[test]
    fn segment_labels_only_at_centers() {
        let labels = vec!["Email".to_string(), "Phone".to_string()];
        assert_eq!(segment_label(&SegmentValue::CenterOf(1), &labels), "Phone");
        assert_eq!(segment_label(&SegmentValue::CenterOf(2), &labels), "");
        assert_eq!(segment_label(&SegmentValue::Exact(0), &labels), "");
    }
}

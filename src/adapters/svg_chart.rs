//! SVG line chart rendering for factor reports.

use crate::domain::error::FactorError;
use crate::domain::report::LineChart;
use crate::ports::chart_port::ChartPort;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 600.0;
const PAD_LEFT: f64 = 80.0;
const PAD_RIGHT: f64 = 150.0;
const PAD_TOP: f64 = 50.0;
const PAD_BOTTOM: f64 = 100.0;
const Y_TICKS: usize = 5;

const PALETTE: [&str; 11] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#000000",
];

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render `chart` as a standalone SVG document. Returns an empty string when
/// the chart has no dates.
pub fn generate_line_chart_svg(chart: &LineChart) -> String {
    if chart.dates.is_empty() {
        return String::new();
    }

    let (mut min_v, mut max_v) = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min_v.is_finite() {
        min_v = 0.0;
        max_v = 1.0;
    }
    if max_v - min_v <= 0.0 {
        min_v -= 0.5;
        max_v += 0.5;
    }

    let plot_width = WIDTH - PAD_LEFT - PAD_RIGHT;
    let plot_height = HEIGHT - PAD_TOP - PAD_BOTTOM;
    let scale_x = if chart.dates.len() > 1 {
        plot_width / (chart.dates.len() - 1) as f64
    } else {
        0.0
    };
    let scale_y = plot_height / (max_v - min_v);
    let x_at = |i: usize| PAD_LEFT + i as f64 * scale_x;
    let y_at = |v: f64| HEIGHT - PAD_BOTTOM - (v - min_v) * scale_y;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="11">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);

    // Grid and y ticks
    for k in 0..=Y_TICKS {
        let v = min_v + (max_v - min_v) * k as f64 / Y_TICKS as f64;
        let y = y_at(v);
        let _ = writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd"/>"##,
            PAD_LEFT,
            WIDTH - PAD_RIGHT
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{:.3}</text>"#,
            PAD_LEFT - 6.0,
            y + 4.0,
            v
        );
    }

    // Grid and rotated x ticks
    for (i, date) in chart.tick_dates() {
        let x = x_at(i);
        let _ = writeln!(
            svg,
            r##"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="#dddddd"/>"##,
            PAD_TOP,
            HEIGHT - PAD_BOTTOM
        );
        let ty = HEIGHT - PAD_BOTTOM + 14.0;
        let _ = writeln!(
            svg,
            r#"<text x="{x:.1}" y="{ty:.1}" text-anchor="end" transform="rotate(-45 {x:.1} {ty:.1})">{}</text>"#,
            date
        );
    }

    // Axes
    let _ = writeln!(
        svg,
        r#"<line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="black"/>"#,
        l = PAD_LEFT,
        t = PAD_TOP,
        b = HEIGHT - PAD_BOTTOM
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="black"/>"#,
        l = PAD_LEFT,
        r = WIDTH - PAD_RIGHT,
        b = HEIGHT - PAD_BOTTOM
    );

    // Series; a non-finite value breaks the line.
    for (idx, series) in chart.series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        let mut segments: Vec<Vec<String>> = vec![Vec::new()];
        for (i, &v) in series.values.iter().enumerate() {
            if v.is_finite() {
                if let Some(current) = segments.last_mut() {
                    current.push(format!("{:.1},{:.1}", x_at(i), y_at(v)));
                }
            } else if segments.last().is_some_and(|s| !s.is_empty()) {
                segments.push(Vec::new());
            }
        }
        for points in segments.iter().filter(|s| !s.is_empty()) {
            let _ = writeln!(
                svg,
                r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
                color,
                points.join(" ")
            );
        }
    }

    // Legend
    let legend_x = WIDTH - PAD_RIGHT + 15.0;
    for (idx, series) in chart.series.iter().enumerate() {
        let y = PAD_TOP + 10.0 + idx as f64 * 18.0;
        let color = PALETTE[idx % PALETTE.len()];
        let _ = writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{}" stroke-width="2"/>"#,
            legend_x,
            legend_x + 20.0,
            color
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}">{}</text>"#,
            legend_x + 26.0,
            y + 4.0,
            escape(&series.name)
        );
    }

    // Title and axis labels
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">{}</text>"#,
        PAD_LEFT + plot_width / 2.0,
        PAD_TOP - 20.0,
        escape(&chart.title)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
        PAD_LEFT + plot_width / 2.0,
        HEIGHT - 10.0,
        escape(&chart.x_label)
    );
    let _ = writeln!(
        svg,
        r#"<text x="20" y="{y:.1}" text-anchor="middle" transform="rotate(-90 20 {y:.1})">{}</text>"#,
        escape(&chart.y_label),
        y = PAD_TOP + plot_height / 2.0
    );

    svg.push_str("</svg>\n");
    svg
}

/// Writes each chart to `<output_dir>/<title>.svg`.
pub struct SvgChartAdapter {
    output_dir: PathBuf,
}

impl SvgChartAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn chart_path(&self, chart: &LineChart) -> PathBuf {
        self.output_dir.join(format!("{}.svg", chart.title))
    }
}

impl ChartPort for SvgChartAdapter {
    fn render(&self, chart: &LineChart) -> Result<(), FactorError> {
        let svg = generate_line_chart_svg(chart);
        if svg.is_empty() {
            debug!(chart = %chart.title, "no dates, chart skipped");
            return Ok(());
        }
        fs::create_dir_all(&self.output_dir)?;
        let path = self.chart_path(chart);
        fs::write(&path, svg)?;
        debug!(path = %path.display(), "chart written");
        Ok(())
    }
}

//! Factor backtest report generation.
//!
//! For every factor in the bundle: decide the group sign convention from the
//! mean IC, chart the compounded group returns, add the long-short hedge
//! column to the PnL table and chart its compounded PnL.

use crate::domain::error::FactorError;
use crate::domain::group_table::{BacktestBundle, GroupTable, IcSeries};
use crate::ports::chart_port::ChartPort;
use chrono::NaiveDate;
use tracing::{debug, info};

pub const DEFAULT_GROUP_COUNT: usize = 10;
pub const DEFAULT_TICK_INTERVAL: usize = 30;
pub const HEDGE_LABEL: &str = "hedge";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub group_count: usize,
    pub tick_interval: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            group_count: DEFAULT_GROUP_COUNT,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl ReportConfig {
    /// Label of the best-scoring group.
    pub fn top_label(&self) -> String {
        "1".to_string()
    }

    /// Label of the worst-scoring group.
    pub fn bottom_label(&self) -> String {
        self.group_count.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// A date-axis line chart, handed to a [`ChartPort`] for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub dates: Vec<NaiveDate>,
    pub series: Vec<ChartSeries>,
    pub tick_interval: usize,
}

impl LineChart {
    fn from_table(title: String, y_label: &str, table: &GroupTable, tick_interval: usize) -> Self {
        Self {
            title,
            x_label: "date".to_string(),
            y_label: y_label.to_string(),
            dates: table.dates().to_vec(),
            series: table
                .iter_columns()
                .map(|(label, values)| ChartSeries {
                    name: format!("group_{}", label),
                    values: values.to_vec(),
                })
                .collect(),
            tick_interval,
        }
    }

    /// Dates that carry an x tick label.
    pub fn tick_dates(&self) -> impl Iterator<Item = (usize, NaiveDate)> + '_ {
        let step = self.tick_interval.max(1);
        self.dates.iter().copied().enumerate().step_by(step)
    }
}

/// Everything derived for one factor before rendering.
#[derive(Debug, Clone)]
pub struct FactorReport {
    pub factor: String,
    pub mean_ic: f64,
    pub reversed: bool,
    pub pro: GroupTable,
    pub pnl: GroupTable,
    pub pro_chart: LineChart,
    pub pnl_chart: LineChart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorSummary {
    pub factor: String,
    pub mean_ic: f64,
    pub reversed: bool,
}

pub struct ReportOutcome {
    pub bundle: BacktestBundle,
    pub summaries: Vec<FactorSummary>,
}

/// Compute the report tables and charts of one factor.
pub fn build_factor_report(
    factor: &str,
    pro: &GroupTable,
    pnl: &GroupTable,
    ic: &IcSeries,
    config: &ReportConfig,
) -> Result<FactorReport, FactorError> {
    let mean_ic = ic.rounded_mean();
    let reversed = mean_ic > 0.0;

    let mut pro = pro.clone();
    let mut pnl = pnl.clone();
    if reversed {
        pro.reverse_labels();
        pnl.reverse_labels();
    }

    let pro_chart = LineChart::from_table(
        format!("{}_pro", factor),
        "pro",
        &pro.cumulative_product(),
        config.tick_interval,
    );

    let hedge = hedge_series(factor, &pnl, config)?;
    pnl.set_column(HEDGE_LABEL, hedge)?;

    let pnl_chart = LineChart::from_table(
        format!("{}_pnl", factor),
        "pnl",
        &pnl.cumulative_product(),
        config.tick_interval,
    );

    Ok(FactorReport {
        factor: factor.to_string(),
        mean_ic,
        reversed,
        pro,
        pnl,
        pro_chart,
        pnl_chart,
    })
}

/// PnL[top] - PnL[bottom] per period.
fn hedge_series(factor: &str, pnl: &GroupTable, config: &ReportConfig) -> Result<Vec<f64>, FactorError> {
    let column = |label: String| {
        pnl.column(&label)
            .ok_or_else(|| FactorError::MissingGroup {
                factor: factor.to_string(),
                label,
            })
    };
    let top = column(config.top_label())?;
    let bottom = column(config.bottom_label())?;
    Ok(top.iter().zip(bottom).map(|(t, b)| t - b).collect())
}

/// Check every factor has its tables and hedge groups before anything is
/// rendered.
pub fn validate_bundle(bundle: &BacktestBundle, config: &ReportConfig) -> Result<(), FactorError> {
    for factor in bundle.factors() {
        let missing = |table: &str| FactorError::MissingTable {
            factor: factor.to_string(),
            table: table.to_string(),
        };
        bundle.pro.get(factor).ok_or_else(|| missing("pro"))?;
        let pnl = bundle.pnl.get(factor).ok_or_else(|| missing("pnl"))?;

        for label in [config.top_label(), config.bottom_label()] {
            if pnl.column(&label).is_none() {
                return Err(FactorError::MissingGroup {
                    factor: factor.to_string(),
                    label,
                });
            }
        }
    }
    Ok(())
}

pub struct ReportGenerator<'a> {
    chart_port: &'a dyn ChartPort,
    config: ReportConfig,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(chart_port: &'a dyn ChartPort, config: ReportConfig) -> Self {
        Self { chart_port, config }
    }

    /// Render both charts for every factor, then hand the bundle back
    /// untouched.
    pub fn generate(&self, bundle: BacktestBundle) -> Result<ReportOutcome, FactorError> {
        validate_bundle(&bundle, &self.config)?;

        let mut summaries = Vec::with_capacity(bundle.ic.len());
        for (factor, ic) in &bundle.ic {
            let missing = |table: &str| FactorError::MissingTable {
                factor: factor.clone(),
                table: table.to_string(),
            };
            let pro = bundle.pro.get(factor).ok_or_else(|| missing("pro"))?;
            let pnl = bundle.pnl.get(factor).ok_or_else(|| missing("pnl"))?;

            let report = build_factor_report(factor, pro, pnl, ic, &self.config)?;
            info!(
                factor = %factor,
                mean_ic = report.mean_ic,
                reversed = report.reversed,
                periods = pro.len(),
                "rendering factor report"
            );

            self.chart_port.render(&report.pro_chart)?;
            debug!(chart = %report.pro_chart.title, "chart rendered");
            self.chart_port.render(&report.pnl_chart)?;
            debug!(chart = %report.pnl_chart.title, "chart rendered");

            summaries.push(FactorSummary {
                factor: report.factor,
                mean_ic: report.mean_ic,
                reversed: report.reversed,
            });
        }

        Ok(ReportOutcome { bundle, summaries })
    }
}

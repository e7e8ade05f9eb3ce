#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use stockfactor::domain::error::FactorError;
use stockfactor::domain::group_table::{BacktestBundle, GroupTable, IcSeries};
use stockfactor::domain::report::LineChart;
use stockfactor::ports::chart_port::ChartPort;
use stockfactor::ports::data_port::DataPort;

pub use stockfactor::domain::daily_record::DailyRecord;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<DailyRecord>>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            error: None,
        }
    }

    pub fn with_records(mut self, code: &str, records: Vec<DailyRecord>) -> Self {
        self.data.insert(code.to_string(), records);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn load_records(&self) -> Result<Vec<DailyRecord>, FactorError> {
        if let Some(reason) = &self.error {
            return Err(FactorError::Io(std::io::Error::other(reason.clone())));
        }
        Ok(self.data.values().flatten().cloned().collect())
    }
}

/// Records every chart instead of drawing it.
#[derive(Default)]
pub struct RecordingChartPort {
    pub charts: RefCell<Vec<LineChart>>,
}

impl ChartPort for RecordingChartPort {
    fn render(&self, chart: &LineChart) -> Result<(), FactorError> {
        self.charts.borrow_mut().push(chart.clone());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_record(code: &str, date: &str, close: f64) -> DailyRecord {
    DailyRecord {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        code: code.to_string(),
        open: close - 0.5,
        close,
        low: close - 1.0,
        high: close + 1.0,
        volume: 10_000.0,
        money: 10_000.0 * close,
        turnover_ratio: 0.8,
    }
}

pub fn generate_records(code: &str, start_date: &str, closes: &[f64]) -> Vec<DailyRecord> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| DailyRecord {
            date: start + chrono::Duration::days(i as i64),
            code: code.to_string(),
            open: close - 0.5,
            close,
            low: close - 1.0,
            high: close + 1.0,
            volume: 10_000.0 + i as f64,
            money: 10_000.0 * close,
            turnover_ratio: 0.8,
        })
        .collect()
}

/// Render records as a headerless daily CSV file body.
pub fn to_daily_csv(records: &[DailyRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "{},{},{},{},{},{},{},{},{}\n",
                r.date, r.code, r.open, r.close, r.low, r.high, r.volume, r.money, r.turnover_ratio
            )
        })
        .collect()
}

pub fn write_daily_dir(dir: &Path, records_by_code: &[(&str, Vec<DailyRecord>)]) {
    fs::create_dir_all(dir).unwrap();
    for (code, records) in records_by_code {
        fs::write(dir.join(format!("{}.csv", code)), to_daily_csv(records)).unwrap();
    }
}

pub fn dates(n: usize) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| date(2023, 1, 2) + chrono::Duration::days(i as i64))
        .collect()
}

/// `group_count` groups where group g returns `g / 1000` each period.
pub fn group_table(periods: usize, group_count: usize) -> GroupTable {
    let labels = (1..=group_count).map(|g| g.to_string()).collect();
    let columns = (1..=group_count)
        .map(|g| vec![g as f64 / 1000.0; periods])
        .collect();
    GroupTable::new(dates(periods), labels, columns).unwrap()
}

pub fn bundle_with(factors: &[(&str, f64)], periods: usize) -> BacktestBundle {
    let mut bundle = BacktestBundle::default();
    for &(factor, ic) in factors {
        bundle.pro.insert(factor.to_string(), group_table(periods, 10));
        bundle.pnl.insert(factor.to_string(), group_table(periods, 10));
        bundle.ic.insert(
            factor.to_string(),
            IcSeries {
                dates: dates(periods),
                values: vec![ic; periods],
            },
        );
    }
    bundle
}

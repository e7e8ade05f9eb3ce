//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_bundle_adapter::CsvBundleAdapter;
use crate::adapters::csv_factor_writer::CsvFactorWriter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart::SvgChartAdapter;
use crate::domain::error::FactorError;
use crate::domain::factor::{DEFAULT_MOMENTUM_WINDOW, FactorKind};
use crate::domain::pipeline;
use crate::domain::report::{
    DEFAULT_GROUP_COUNT, DEFAULT_TICK_INTERVAL, ReportConfig, ReportGenerator,
};
use crate::ports::bundle_port::BundlePort;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_DATA_DAILY_PATH: &str = "data/data_daily";
pub const DEFAULT_FACTOR_PATH: &str = "data/factor";
pub const DEFAULT_REPORT_PATH: &str = "data/report";

#[derive(Parser, Debug)]
#[command(
    name = "stockfactor",
    about = "Daily stock factor computation and backtest charts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute factors and write one CSV per date
    Compute {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        factor_dir: Option<PathBuf>,
        /// Factor to compute (repeatable); defaults to all six
        #[arg(short, long = "factor")]
        factors: Vec<String>,
        /// Momentum lookback in trading days
        #[arg(short, long)]
        window: Option<usize>,
    },
    /// Render group return and hedge PnL charts from a backtest bundle
    Report {
        #[arg(short, long)]
        bundle: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of quantile groups
        #[arg(long)]
        groups: Option<usize>,
    },
    /// List factor output names
    Factors {
        #[arg(short, long)]
        window: Option<usize>,
    },
}

/// Command line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ComputeOverrides {
    pub data_dir: Option<PathBuf>,
    pub factor_dir: Option<PathBuf>,
    pub factors: Vec<String>,
    pub window: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputeSettings {
    pub data_daily_path: PathBuf,
    pub factor_path: PathBuf,
    pub factors: Vec<FactorKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub output_path: PathBuf,
    pub report: ReportConfig,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Compute {
            config,
            data_dir,
            factor_dir,
            factors,
            window,
        } => run_compute(
            config.as_deref(),
            &ComputeOverrides {
                data_dir,
                factor_dir,
                factors,
                window,
            },
        ),
        Command::Report {
            bundle,
            config,
            output,
            groups,
        } => run_report(&bundle, config.as_deref(), output, groups),
        Command::Factors { window } => run_list_factors(window),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

/// Load the INI file if one was given; otherwise every setting defaults.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, FactorError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path).map_err(|e| FactorError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

fn positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
    minimum: i64,
) -> Result<usize, FactorError> {
    let invalid = |reason: String| FactorError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason,
    };
    let value = config
        .get_int(section, key, default as i64)
        .map_err(invalid)?;
    if value < minimum {
        return Err(invalid(format!("must be at least {}, got {}", minimum, value)));
    }
    Ok(value as usize)
}

fn resolve_window(config: &dyn ConfigPort, window: Option<usize>) -> Result<usize, FactorError> {
    match window {
        Some(0) => Err(FactorError::ConfigInvalid {
            section: "factors".into(),
            key: "momentum_window".into(),
            reason: "must be at least 1, got 0".into(),
        }),
        Some(w) => Ok(w),
        None => positive(config, "factors", "momentum_window", DEFAULT_MOMENTUM_WINDOW, 1),
    }
}

/// Parse factor names; a bare `momentum` takes the configured window.
pub fn parse_factor_names(names: &[String], window: usize) -> Result<Vec<FactorKind>, FactorError> {
    names
        .iter()
        .map(|name| {
            if name.trim().eq_ignore_ascii_case("momentum") {
                Ok(FactorKind::Momentum(window))
            } else {
                name.parse()
            }
        })
        .collect()
}

pub fn build_compute_settings(
    config: &dyn ConfigPort,
    overrides: &ComputeOverrides,
) -> Result<ComputeSettings, FactorError> {
    let window = resolve_window(config, overrides.window)?;

    let names = if overrides.factors.is_empty() {
        config.get_list("factors", "names").unwrap_or_default()
    } else {
        overrides.factors.clone()
    };
    let factors = if names.is_empty() {
        FactorKind::default_set(window)
    } else {
        parse_factor_names(&names, window)?
    };

    let path = |explicit: &Option<PathBuf>, key: &str, default: &str| {
        explicit
            .clone()
            .or_else(|| config.get_string("paths", key).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(default))
    };

    Ok(ComputeSettings {
        data_daily_path: path(&overrides.data_dir, "data_daily_path", DEFAULT_DATA_DAILY_PATH),
        factor_path: path(&overrides.factor_dir, "factor_path", DEFAULT_FACTOR_PATH),
        factors,
    })
}

pub fn build_report_settings(
    config: &dyn ConfigPort,
    output: Option<PathBuf>,
    groups: Option<usize>,
) -> Result<ReportSettings, FactorError> {
    let group_count = match groups {
        Some(g) if g < 2 => {
            return Err(FactorError::ConfigInvalid {
                section: "report".into(),
                key: "group_count".into(),
                reason: format!("must be at least 2, got {}", g),
            });
        }
        Some(g) => g,
        None => positive(config, "report", "group_count", DEFAULT_GROUP_COUNT, 2)?,
    };
    let tick_interval = positive(config, "report", "tick_interval", DEFAULT_TICK_INTERVAL, 1)?;

    let output_path = output
        .or_else(|| config.get_string("report", "output_path").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));

    Ok(ReportSettings {
        output_path,
        report: ReportConfig {
            group_count,
            tick_interval,
        },
    })
}

pub fn run_compute(
    config_path: Option<&Path>,
    overrides: &ComputeOverrides,
) -> Result<(), FactorError> {
    let config = load_config(config_path)?;
    let settings = build_compute_settings(&config, overrides)?;

    info!(
        data = %settings.data_daily_path.display(),
        output = %settings.factor_path.display(),
        factors = settings.factors.len(),
        "computing factors"
    );

    let data_port = CsvAdapter::new(settings.data_daily_path.clone());
    let writer = CsvFactorWriter::new(settings.factor_path.clone());
    let summaries = pipeline::run_factors(&data_port, &writer, &settings.factors)?;

    let files: usize = summaries.iter().map(|s| s.files).sum();
    info!(factors = summaries.len(), files, "done");
    Ok(())
}

pub fn run_report(
    bundle_path: &Path,
    config_path: Option<&Path>,
    output: Option<PathBuf>,
    groups: Option<usize>,
) -> Result<(), FactorError> {
    let config = load_config(config_path)?;
    let settings = build_report_settings(&config, output, groups)?;

    let bundle = CsvBundleAdapter::new(bundle_path.to_path_buf()).load_bundle()?;
    let charts = SvgChartAdapter::new(settings.output_path.clone());
    let outcome = ReportGenerator::new(&charts, settings.report).generate(bundle)?;

    info!(
        factors = outcome.summaries.len(),
        output = %settings.output_path.display(),
        "charts written"
    );
    Ok(())
}

pub fn run_list_factors(window: Option<usize>) -> Result<(), FactorError> {
    let window = resolve_window(&FileConfigAdapter::empty(), window)?;
    for kind in FactorKind::default_set(window) {
        println!("{}", kind);
    }
    Ok(())
}

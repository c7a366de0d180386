//! Command-line arguments and default period/file name derivation.

use std::path::PathBuf;

use chrono::{Months, NaiveDate};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use payslip_io_xlsx::{C_FILE_IN_DEFAULT, C_FILE_OUT_EXT, C_FILE_OUT_PREFIX};

/// Turn a salary template workbook into a per-period payslip workbook
#[derive(Parser, Debug)]
#[command(
    name = "payslip",
    about = "Render a salary template workbook as two-row payslip blocks",
    version
)]
pub struct Args {
    /// Period label written in the date column (`YYYYMM`); defaults to last month
    #[arg(value_name = "PERIOD")]
    pub period: Option<String>,

    /// Template workbook (.xls, .xlsx, .xlsm, .xlsb, .ods)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output workbook; defaults to `工资条{PERIOD}.xlsx`
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Column mapping configuration (YAML)
    #[arg(short, long, value_name = "CONFIG", default_value = "application.yml")]
    pub config: PathBuf,

    /// Log verbosity; `RUST_LOG` still refines per-module levels
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevelArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Off => LevelFilter::Off,
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}

/// Fully resolved run inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRunPlan {
    pub period: String,
    pub path_file_in: PathBuf,
    pub path_file_out: PathBuf,
    pub path_config: PathBuf,
}

impl Args {
    /// Fill in defaults relative to `today`.
    pub fn into_plan(self, today: NaiveDate) -> SpecRunPlan {
        let period = self
            .period
            .unwrap_or_else(|| derive_default_period(today));
        let path_file_in = self
            .input
            .unwrap_or_else(|| PathBuf::from(C_FILE_IN_DEFAULT));
        let path_file_out = self
            .output
            .unwrap_or_else(|| derive_default_file_out(&period));
        SpecRunPlan {
            period,
            path_file_in,
            path_file_out,
            path_config: self.config,
        }
    }
}

/// Month before `today` as `YYYYMM`.
pub fn derive_default_period(today: NaiveDate) -> String {
    today
        .checked_sub_months(Months::new(1))
        .unwrap_or(today)
        .format("%Y%m")
        .to_string()
}

/// `工资条{period}.xlsx`.
pub fn derive_default_file_out(period: &str) -> PathBuf {
    PathBuf::from(format!("{C_FILE_OUT_PREFIX}{period}.{C_FILE_OUT_EXT}"))
}

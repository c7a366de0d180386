//! `payslip` host: argument parsing, config loading and logging around the
//! `payslip_io_xlsx` kernel.

mod args;
mod config;

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{error, info};
use payslip_io_xlsx::{read_rows, write_sheet_with_style};

use crate::args::{Args, SpecRunPlan};
use crate::config::load_payslip_config;

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let plan = args.into_plan(Local::now().date_naive());
    match run(&plan) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Outcome of one transform run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumRunOutcome {
    /// Output written with this many records.
    Written(usize),
    /// No data rows qualified; no output produced.
    Skipped,
}

fn run(plan: &SpecRunPlan) -> Result<()> {
    info!("Full Command: payslip 202401 工资模板.xls 工资条202401.xlsx");
    match transform(plan)? {
        EnumRunOutcome::Written(n_records) => {
            info!("rendered {n_records} payslip blocks for period {}", plan.period);
        }
        EnumRunOutcome::Skipped => {
            info!(
                "no data rows in {}; nothing to render, {} not written",
                plan.path_file_in.display(),
                plan.path_file_out.display()
            );
        }
    }
    Ok(())
}

fn transform(plan: &SpecRunPlan) -> Result<EnumRunOutcome> {
    let config = load_payslip_config(&plan.path_config)?;
    let l_records = read_rows(&plan.path_file_in, &config.mapping.cols)
        .with_context(|| format!("failed to read {}", plan.path_file_in.display()))?;
    if l_records.is_empty() {
        return Ok(EnumRunOutcome::Skipped);
    }

    write_sheet_with_style(&plan.path_file_out, &l_records, &plan.period, &config.style)
        .with_context(|| format!("failed to write {}", plan.path_file_out.display()))?;
    Ok(EnumRunOutcome::Written(l_records.len()))
}

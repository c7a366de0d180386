//! Column mapping configuration loaded from YAML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use payslip_io_xlsx::{SpecColumnMapping, SpecSlipStyle, derive_default_slip_style};
use serde::Deserialize;

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecPayslipConfig {
    pub mapping: SpecMappingSection,
    /// Slip style; defaults apply when absent.
    #[serde(default = "derive_default_slip_style")]
    pub style: SpecSlipStyle,
}

/// `mapping:` section; `cols` order is the output column order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SpecMappingSection {
    #[serde(default)]
    pub cols: Vec<SpecColumnMapping>,
}

/// Read and parse the configuration at `path`.
pub fn load_payslip_config(path: &Path) -> Result<SpecPayslipConfig> {
    let c_text = fs::read_to_string(path)
        .with_context(|| format!("failed to read mapping config {}", path.display()))?;
    parse_payslip_config(&c_text)
        .with_context(|| format!("invalid mapping config {}", path.display()))
}

pub fn parse_payslip_config(c_text: &str) -> Result<SpecPayslipConfig> {
    serde_saphyr::from_str(c_text).map_err(|err| anyhow!("{err}"))
}

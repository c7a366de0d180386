//! Shared payslip specification models and error type.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conf::{C_FONT_NAME_DEFAULT, N_FONT_SIZE_DEFAULT};

////////////////////////////////////////////////////////////////////////////////
// #region ColumnMappingSpecification

/// One declarative `from -> to` column mapping.
///
/// `from` is the header text searched for in row 0 of the input sheet; a
/// missing or blank `from` yields a column that always renders empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpecColumnMapping {
    /// Source header text.
    #[serde(default)]
    pub from: Option<String>,
    /// Output label.
    pub to: String,
}

impl SpecColumnMapping {
    /// Create a mapping from a source header text to an output label.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: to.into(),
        }
    }

    /// Create a mapping with no source column.
    pub fn unsourced(to: impl Into<String>) -> Self {
        Self {
            from: None,
            to: to.into(),
        }
    }
}

/// Mapping annotated with its resolved source column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecResolvedColumnMapping {
    /// Source header text.
    pub from: Option<String>,
    /// Output label.
    pub to: String,
    /// Zero-based source column, `None` when unresolved.
    pub col_idx: Option<usize>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RecordSpecification

/// One normalized input row keyed by output label.
///
/// Labels keep mapping order. Inserting an existing label keeps its original
/// position and replaces the value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecRecord {
    dict_values: IndexMap<String, String>,
}

impl SpecRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `label` to `value`.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.dict_values.insert(label.into(), value.into());
    }

    /// Value for `label`.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.dict_values.get(label).map(String::as_str)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.dict_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict_values.is_empty()
    }

    /// `(label, value)` pairs in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dict_values
            .iter()
            .map(|(label, value)| (label.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for SpecRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = SpecRecord::new();
        for (label, value) in iter {
            record.insert(label, value);
        }
        record
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification consumed by the workbook writer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,

    /// Top border override.
    pub top: Option<i64>,
    /// Bottom border override.
    pub bottom: Option<i64>,
    /// Left border override.
    pub left: Option<i64>,
    /// Right border override.
    pub right: Option<i64>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            top: other.top.or(self.top),
            bottom: other.bottom.or(self.bottom),
            left: other.left.or(self.left),
            right: other.right.or(self.right),
        }
    }
}

/// Block border rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumSlipBorder {
    /// Double top on header rows and double bottom on value rows.
    Full,
    /// Thin everywhere except a double bottom on value rows (default).
    #[default]
    Partial,
}

/// Horizontal alignment of slip cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumSlipAlign {
    #[default]
    Center,
}

impl EnumSlipAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Center => "center",
        }
    }
}

/// Named style configuration for the rendered slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecSlipStyle {
    /// Border rule.
    pub border: EnumSlipBorder,
    /// Horizontal alignment; vertical alignment is always centered.
    pub align: EnumSlipAlign,
    /// Font family name.
    pub font_name: String,
    /// Font size in points.
    pub font_size: i64,
}

impl Default for SpecSlipStyle {
    fn default() -> Self {
        Self {
            border: EnumSlipBorder::Partial,
            align: EnumSlipAlign::Center,
            font_name: C_FONT_NAME_DEFAULT.to_string(),
            font_size: N_FONT_SIZE_DEFAULT,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RenderedGridSpecification

/// Style role of one rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumGridCellStyle {
    /// Label row of a slip block.
    Header,
    /// Value row of a slip block.
    Value,
}

/// One rendered output cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecGridCell {
    pub text: String,
    pub style: EnumGridCellStyle,
}

/// Output grid: two rows per record, date column first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecRenderedGrid {
    /// Rows in output order.
    pub rows: Vec<Vec<SpecGridCell>>,
    /// Number of fixed-width columns (`len(record) + 1`).
    pub width: usize,
}

impl SpecRenderedGrid {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell texts of row `row_idx`.
    pub fn row_texts(&self, row_idx: usize) -> Vec<&str> {
        self.rows
            .get(row_idx)
            .map(|row| row.iter().map(|cell| cell.text.as_str()).collect())
            .unwrap_or_default()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-read diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecReadReport {
    /// Name of the sheet that was read.
    pub sheet_name: String,
    /// Header texts from row 0 (`None` for empty cells).
    pub header: Vec<Option<String>>,
    /// Mappings after resolution against `header`.
    pub mappings: Vec<SpecResolvedColumnMapping>,
    /// Last row index present in the sheet.
    pub row_idx_last: Option<usize>,
    /// Row index where reading stopped on a blank column-0 cell.
    pub row_idx_stop: Option<usize>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecReadReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Errors raised by the payslip reader and writer.
#[derive(Debug, Error)]
pub enum PayslipError {
    #[error("failed to open workbook {path}: {message}")]
    OpenWorkbook { path: PathBuf, message: String },

    #[error("workbook has no worksheet: {0}")]
    NoWorksheet(PathBuf),

    #[error("failed to read worksheet {sheet_name:?}: {message}")]
    ReadWorksheet { sheet_name: String, message: String },

    #[error("no records to render")]
    NoRecords,

    #[error("cannot write after close()")]
    WriterClosed,

    #[error("{0} index overflow: {1}")]
    IndexOverflow(&'static str, usize),

    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

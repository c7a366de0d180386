//! Payslip constants and default preset factories.

use crate::spec::{EnumSlipBorder, SpecCellFormat, SpecSlipStyle};

/// Output sheet name.
pub const C_SHEET_NAME_PAYSLIP: &str = "工资条";
/// Label written in column 0 of every header row.
pub const C_LABEL_DATE: &str = "日期";
/// Fixed width (in characters) of every output column.
pub const N_WIDTH_COLUMN: f64 = 12.0;
/// Height (in points) of every output row.
pub const N_HEIGHT_ROW: f64 = 20.0;
/// Fixed-point scale of normalized numeric cells.
pub const N_SCALE_NUMERIC: usize = 2;

/// Default font family.
pub const C_FONT_NAME_DEFAULT: &str = "宋体";
/// Default font size in points.
pub const N_FONT_SIZE_DEFAULT: i64 = 12;

/// Default input workbook name used by the host.
pub const C_FILE_IN_DEFAULT: &str = "工资模板.xls";
/// Prefix of the default output workbook name (`{prefix}{period}.xlsx`).
pub const C_FILE_OUT_PREFIX: &str = "工资条";
/// Extension of the output workbook.
pub const C_FILE_OUT_EXT: &str = "xlsx";

/// Thin border style code.
pub const N_BORDER_THIN: i64 = 1;
/// Double border style code.
pub const N_BORDER_DOUBLE: i64 = 6;

/// Build the default slip style.
pub fn derive_default_slip_style() -> SpecSlipStyle {
    SpecSlipStyle::default()
}

/// Build the `(header, value)` cell formats for one slip block.
///
/// Both rows share alignment and font; only the block-separating edges
/// differ between [`EnumSlipBorder::Partial`] and [`EnumSlipBorder::Full`].
pub fn derive_slip_formats(style: &SpecSlipStyle) -> (SpecCellFormat, SpecCellFormat) {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some(style.font_name.clone()),
        font_size: Some(style.font_size),
        align: Some(style.align.as_str().to_string()),
        valign: Some("vcenter".to_string()),
        border: Some(N_BORDER_THIN),
        ..Default::default()
    };

    let fmt_value = cfg_base_fmt_spec.with_(SpecCellFormat {
        bottom: Some(N_BORDER_DOUBLE),
        ..Default::default()
    });
    let fmt_header = match style.border {
        EnumSlipBorder::Partial => cfg_base_fmt_spec,
        EnumSlipBorder::Full => cfg_base_fmt_spec.with_(SpecCellFormat {
            top: Some(N_BORDER_DOUBLE),
            ..Default::default()
        }),
    };

    (fmt_header, fmt_value)
}

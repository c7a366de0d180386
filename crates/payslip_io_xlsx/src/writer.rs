//! Payslip renderer and workbook writer kernel.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tempfile::NamedTempFile;

use crate::conf::{
    C_LABEL_DATE, C_SHEET_NAME_PAYSLIP, N_BORDER_DOUBLE, N_BORDER_THIN, N_HEIGHT_ROW,
    N_WIDTH_COLUMN, derive_slip_formats,
};
use crate::spec::{
    EnumGridCellStyle, PayslipError, SpecCellFormat, SpecGridCell, SpecRecord, SpecRenderedGrid,
    SpecSlipStyle,
};

////////////////////////////////////////////////////////////////////////////////
// #region Rendering

/// Lay records out as back-to-back `(labels, values)` row pairs.
///
/// Column 0 holds the date label in header rows and `period_label` in value
/// rows. Returns [`PayslipError::NoRecords`] for an empty input.
pub fn render(
    records: &[SpecRecord],
    period_label: &str,
) -> Result<SpecRenderedGrid, PayslipError> {
    let Some(record_first) = records.first() else {
        return Err(PayslipError::NoRecords);
    };

    let mut l_rows = Vec::with_capacity(records.len() * 2);
    for record in records {
        let mut row_header = Vec::with_capacity(record.len() + 1);
        let mut row_value = Vec::with_capacity(record.len() + 1);
        row_header.push(derive_grid_cell(C_LABEL_DATE, EnumGridCellStyle::Header));
        row_value.push(derive_grid_cell(period_label, EnumGridCellStyle::Value));
        for (c_label, c_value) in record.iter() {
            row_header.push(derive_grid_cell(c_label, EnumGridCellStyle::Header));
            row_value.push(derive_grid_cell(c_value, EnumGridCellStyle::Value));
        }
        l_rows.push(row_header);
        l_rows.push(row_value);
    }

    Ok(SpecRenderedGrid {
        rows: l_rows,
        width: record_first.len() + 1,
    })
}

fn derive_grid_cell(text: &str, style: EnumGridCellStyle) -> SpecGridCell {
    SpecGridCell {
        text: text.to_string(),
        style,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Writer

/// Render `records` and write them to `path` with the default style.
pub fn write_sheet<P: AsRef<Path>>(
    path: P,
    records: &[SpecRecord],
    period_label: &str,
) -> Result<(), PayslipError> {
    write_sheet_with_style(path, records, period_label, &SpecSlipStyle::default())
}

/// Render `records` and write them to `path` with `style`.
///
/// Nothing is created on disk when rendering or serialization fails.
pub fn write_sheet_with_style<P: AsRef<Path>>(
    path: P,
    records: &[SpecRecord],
    period_label: &str,
    style: &SpecSlipStyle,
) -> Result<(), PayslipError> {
    let grid = render(records, period_label)?;
    let mut writer = PayslipWriter::new(path.as_ref().to_path_buf(), style);
    writer.write_grid(&grid, C_SHEET_NAME_PAYSLIP)?;
    writer.close()
}

/// Stateful workbook writer.
pub struct PayslipWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    fmt_header: SpecCellFormat,
    fmt_value: SpecCellFormat,
    if_closed: bool,
}

impl PayslipWriter {
    /// Create writer bound to output path and slip style.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: PathBuf, style: &SpecSlipStyle) -> Self {
        let (fmt_header, fmt_value) = derive_slip_formats(style);
        Self {
            path_file_out,
            workbook: Workbook::new(),
            fmt_header,
            fmt_value,
            if_closed: false,
        }
    }

    /// Return output file path.
    pub fn file_out(&self) -> &Path {
        &self.path_file_out
    }

    /// Write `grid` to a new sheet named `sheet_name`.
    pub fn write_grid(
        &mut self,
        grid: &SpecRenderedGrid,
        sheet_name: &str,
    ) -> Result<(), PayslipError> {
        if self.if_closed {
            return Err(PayslipError::WriterClosed);
        }

        let fmt_header = derive_rust_xlsx_format(&self.fmt_header);
        let fmt_value = derive_rust_xlsx_format(&self.fmt_value);

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for n_idx_col in 0..grid.width {
            worksheet.set_column_width(cast_col_num(n_idx_col)?, N_WIDTH_COLUMN)?;
        }

        for (n_idx_row, row) in grid.rows.iter().enumerate() {
            let n_row = cast_row_num(n_idx_row)?;
            worksheet.set_row_height(n_row, N_HEIGHT_ROW)?;
            for (n_idx_col, cell) in row.iter().enumerate() {
                let format = match cell.style {
                    EnumGridCellStyle::Header => &fmt_header,
                    EnumGridCellStyle::Value => &fmt_value,
                };
                let n_col = cast_col_num(n_idx_col)?;
                write_text_cell(worksheet, n_row, n_col, &cell.text, format)?;
            }
        }

        Ok(())
    }

    /// Flush workbook to disk. Idempotent.
    ///
    /// The workbook is serialized to memory, written to a temporary file next
    /// to the target and renamed into place, so the target either keeps its
    /// previous state or holds the complete workbook.
    pub fn close(&mut self) -> Result<(), PayslipError> {
        if self.if_closed {
            return Ok(());
        }

        let v_buf = self.workbook.save_to_buffer()?;
        let path_dir_out = match self.path_file_out.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let err_io = |source: std::io::Error| PayslipError::Io {
            path: self.path_file_out.clone(),
            source,
        };

        let mut file_tmp = NamedTempFile::new_in(&path_dir_out).map_err(err_io)?;
        file_tmp.write_all(&v_buf).map_err(err_io)?;
        file_tmp.as_file().sync_all().map_err(err_io)?;
        file_tmp
            .persist(&self.path_file_out)
            .map_err(|err| err_io(err.error))?;

        self.if_closed = true;
        info!(
            "file write to : {}",
            std::path::absolute(&self.path_file_out)
                .unwrap_or_else(|_| self.path_file_out.clone())
                .display()
        );
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatConversion

fn write_text_cell(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    text: &str,
    format: &Format,
) -> Result<(), PayslipError> {
    if text.is_empty() {
        worksheet.write_blank(n_row, n_col, format)?;
    } else {
        worksheet.write_string_with_format(n_row, n_col, text, format)?;
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if let Some(val) = spec.top {
        format = format.set_border_top(derive_format_border(val));
    }
    if let Some(val) = spec.bottom {
        format = format.set_border_bottom(derive_format_border(val));
    }
    if let Some(val) = spec.left {
        format = format.set_border_left(derive_format_border(val));
    }
    if let Some(val) = spec.right {
        format = format.set_border_right(derive_format_border(val));
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        N_BORDER_THIN => FormatBorder::Thin,
        N_BORDER_DOUBLE => FormatBorder::Double,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "center" => Some(FormatAlign::Center),
        "vcenter" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, PayslipError> {
    u32::try_from(value).map_err(|_| PayslipError::IndexOverflow("row", value))
}

fn cast_col_num(value: usize) -> Result<u16, PayslipError> {
    u16::try_from(value).map_err(|_| PayslipError::IndexOverflow("column", value))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

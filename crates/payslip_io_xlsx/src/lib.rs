//! `payslip_io_xlsx` v1:
//! Rust-side payslip transform kernel.
//!
//! Data flows one way: template sheet -> resolved mappings -> records ->
//! rendered grid -> workbook file.
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/errors
//! - `util`   : pure helper functions
//! - `reader` : template reader and record extraction
//! - `writer` : slip renderer and workbook writer
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_FILE_IN_DEFAULT, C_FILE_OUT_EXT, C_FILE_OUT_PREFIX, C_LABEL_DATE, C_SHEET_NAME_PAYSLIP,
    derive_default_slip_style, derive_slip_formats,
};
pub use reader::{read_range, read_rows, read_rows_with_report};
pub use spec::{
    EnumGridCellStyle, EnumSlipAlign, EnumSlipBorder, PayslipError, SpecCellFormat,
    SpecColumnMapping, SpecGridCell, SpecReadReport, SpecRecord, SpecRenderedGrid,
    SpecResolvedColumnMapping, SpecSlipStyle,
};
pub use util::{format_decimal_half_up, resolve_column_mappings};
pub use writer::{PayslipWriter, render, write_sheet, write_sheet_with_style};

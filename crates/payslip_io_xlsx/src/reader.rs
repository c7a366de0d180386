//! Template workbook reader: header resolution and record extraction.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::Timelike;
use log::{debug, info, warn};

use crate::conf::N_SCALE_NUMERIC;
use crate::spec::{
    PayslipError, SpecColumnMapping, SpecReadReport, SpecRecord, SpecResolvedColumnMapping,
};
use crate::util::{
    format_decimal_half_up, is_blank, resolve_column_mappings, select_unresolved_labels,
};

/// Read the first sheet of `path` into records, one per data row.
///
/// An empty result means nothing qualified for rendering.
pub fn read_rows<P: AsRef<Path>>(
    path: P,
    mappings: &[SpecColumnMapping],
) -> Result<Vec<SpecRecord>, PayslipError> {
    read_rows_with_report(path, mappings).map(|(l_records, _)| l_records)
}

/// Same as [`read_rows`], also returning header/resolution diagnostics.
pub fn read_rows_with_report<P: AsRef<Path>>(
    path: P,
    mappings: &[SpecColumnMapping],
) -> Result<(Vec<SpecRecord>, SpecReadReport), PayslipError> {
    let path_file_in = path.as_ref();
    info!("start transform from file {}.", path_file_in.display());

    let mut workbook =
        open_workbook_auto(path_file_in).map_err(|err| PayslipError::OpenWorkbook {
            path: path_file_in.to_path_buf(),
            message: err.to_string(),
        })?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| PayslipError::NoWorksheet(path_file_in.to_path_buf()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|err| PayslipError::ReadWorksheet {
            sheet_name: sheet_name.clone(),
            message: err.to_string(),
        })?;

    let mut report = SpecReadReport {
        sheet_name,
        ..Default::default()
    };
    let l_records = read_range(&range, mappings, &mut report);
    Ok((l_records, report))
}

/// Resolve `mappings` against row 0 of `range` and extract the data rows.
pub fn read_range(
    range: &Range<Data>,
    mappings: &[SpecColumnMapping],
    report: &mut SpecReadReport,
) -> Vec<SpecRecord> {
    report.row_idx_last = range.end().map(|(n_row, _)| n_row as usize);
    info!("sheet rows: {}", report.row_idx_last.unwrap_or(0));

    report.header = derive_header_row(range);
    debug!("title row is: {:?}", report.header);

    report.mappings = resolve_column_mappings(mappings, &report.header);
    for c_label in select_unresolved_labels(&report.mappings) {
        warn!("column {c_label:?} has no source column; it will render empty");
        report.warn(format!("unresolved mapping: {c_label}"));
    }

    let (l_records, row_idx_stop) = extract_records(&report.mappings, range);
    report.row_idx_stop = row_idx_stop;
    l_records
}

/// Extract one record per data row, stopping at the first blank column-0 cell.
///
/// Rows after the stop row are never read, even when populated. Returns the
/// records and the stop row index, if the sheet had one.
pub fn extract_records(
    mappings: &[SpecResolvedColumnMapping],
    range: &Range<Data>,
) -> (Vec<SpecRecord>, Option<usize>) {
    let Some((n_row_last, _)) = range.end() else {
        return (vec![], None);
    };

    let mut l_records = Vec::new();
    for n_row in 1..=n_row_last {
        let if_is_record = range
            .get_value((n_row, 0))
            .is_some_and(|cell| !is_blank(&derive_cell_text(cell)));
        if !if_is_record {
            info!("Break read rows, current row index is: {n_row}");
            return (l_records, Some(n_row as usize));
        }

        let record = mappings
            .iter()
            .map(|mapping| {
                let c_value = mapping
                    .col_idx
                    .and_then(|n_col| u32::try_from(n_col).ok())
                    .and_then(|n_col| range.get_value((n_row, n_col)))
                    .map(derive_cell_text)
                    .unwrap_or_default();
                (mapping.to.clone(), c_value)
            })
            .collect::<SpecRecord>();
        l_records.push(record);
    }

    (l_records, None)
}

/// Header texts from row 0, rendered like record cells; empty cells become
/// `None`.
pub fn derive_header_row(range: &Range<Data>) -> Vec<Option<String>> {
    let (Some((n_row_first, _)), Some((_, n_col_last))) = (range.start(), range.end()) else {
        return vec![];
    };
    if n_row_first > 0 {
        return vec![];
    }

    (0..=n_col_last)
        .map(|n_col| match range.get_value((0, n_col)) {
            None | Some(Data::Empty) => None,
            Some(cell) => Some(derive_cell_text(cell)),
        })
        .collect()
}

/// Normalize one cell to its record text.
///
/// Numbers are fixed-point with two decimals (half-up); everything else keeps
/// its display text.
pub fn derive_cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(val) => format_decimal_half_up(*val, N_SCALE_NUMERIC),
        Data::Int(val) => format_decimal_half_up(*val as f64, N_SCALE_NUMERIC),
        Data::String(val) => val.clone(),
        Data::Bool(val) => if *val { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(err) => err.to_string(),
        Data::DateTime(val) => match val.as_datetime() {
            Some(dt) if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 => {
                dt.format("%Y-%m-%d").to_string()
            }
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => val.as_f64().to_string(),
        },
        Data::DateTimeIso(val) => val.clone(),
        Data::DurationIso(val) => val.clone(),
    }
}

#[cfg(test)]
mod tests {
    use calamine::CellErrorType;
    use rust_xlsxwriter::Workbook;

    use super::*;

    fn build_range(l_rows: Vec<Vec<Data>>) -> Range<Data> {
        let n_width = l_rows.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let mut range = Range::new((0, 0), (l_rows.len() as u32 - 1, n_width as u32 - 1));
        for (n_row, row) in l_rows.into_iter().enumerate() {
            for (n_col, cell) in row.into_iter().enumerate() {
                range.set_value((n_row as u32, n_col as u32), cell);
            }
        }
        range
    }

    fn s(val: &str) -> Data {
        Data::String(val.to_string())
    }

    #[test]
    fn test_read_range_resolves_and_normalizes() {
        let range = build_range(vec![
            vec![s("Name"), s("Base"), s("Extra")],
            vec![s("Alice"), Data::Float(5000.005)],
        ]);
        let mappings = vec![
            SpecColumnMapping::new("Name", "姓名"),
            SpecColumnMapping::new("Base", "基本工资"),
        ];
        let mut report = SpecReadReport::default();

        let l_records = read_range(&range, &mappings, &mut report);

        let l_idx: Vec<Option<usize>> = report.mappings.iter().map(|m| m.col_idx).collect();
        assert_eq!(l_idx, vec![Some(0), Some(1)]);
        assert_eq!(l_records.len(), 1);
        assert_eq!(
            l_records[0].iter().collect::<Vec<_>>(),
            vec![("姓名", "Alice"), ("基本工资", "5000.01")]
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_extract_records_stops_at_first_blank_sentinel() {
        let range = build_range(vec![
            vec![s("Name"), s("Base")],
            vec![s("Alice"), Data::Float(1.0)],
            vec![s("Bob"), Data::Float(2.0)],
            vec![s("   "), Data::Float(3.0)],
            vec![s("Carol"), Data::Float(4.0)],
        ]);
        let mappings = vec![
            SpecColumnMapping::new("Name", "name"),
            SpecColumnMapping::new("Base", "base"),
        ];
        let mut report = SpecReadReport::default();

        let l_records = read_range(&range, &mappings, &mut report);

        let l_names: Vec<&str> = l_records.iter().filter_map(|r| r.get("name")).collect();
        assert_eq!(l_names, vec!["Alice", "Bob"]);
        assert_eq!(report.row_idx_stop, Some(3));
        assert_eq!(report.row_idx_last, Some(4));
    }

    #[test]
    fn test_extract_records_stops_at_missing_sentinel_cell() {
        let range = build_range(vec![
            vec![s("Name"), s("Base")],
            vec![s("Alice"), Data::Float(1.0)],
            vec![Data::Empty, Data::Float(2.0)],
            vec![s("Carol"), Data::Float(3.0)],
        ]);
        let mappings = vec![SpecColumnMapping::new("Name", "name")];
        let mut report = SpecReadReport::default();

        let l_records = read_range(&range, &mappings, &mut report);

        assert_eq!(l_records.len(), 1);
        assert_eq!(report.row_idx_stop, Some(2));
    }

    #[test]
    fn test_record_width_matches_mappings_when_unresolved() {
        let range = build_range(vec![vec![s("Name")], vec![s("Alice")], vec![s("Bob")]]);
        let mappings = vec![
            SpecColumnMapping::new("Name", "姓名"),
            SpecColumnMapping::new("Missing", "缺失"),
            SpecColumnMapping::unsourced("备注"),
        ];
        let mut report = SpecReadReport::default();

        let l_records = read_range(&range, &mappings, &mut report);

        assert_eq!(l_records.len(), 2);
        for record in &l_records {
            assert_eq!(record.len(), mappings.len());
            assert_eq!(record.get("缺失"), Some(""));
            assert_eq!(record.get("备注"), Some(""));
        }
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_duplicate_labels_keep_first_position_and_last_value() {
        let range = build_range(vec![
            vec![s("Name"), s("A"), s("B")],
            vec![s("Alice"), s("first"), s("second")],
        ]);
        let mappings = vec![
            SpecColumnMapping::new("A", "dup"),
            SpecColumnMapping::new("Name", "name"),
            SpecColumnMapping::new("B", "dup"),
        ];
        let mut report = SpecReadReport::default();

        let l_records = read_range(&range, &mappings, &mut report);

        assert_eq!(
            l_records[0].iter().collect::<Vec<_>>(),
            vec![("dup", "second"), ("name", "Alice")]
        );
    }

    #[test]
    fn test_header_only_sheet_yields_no_records() {
        let range = build_range(vec![vec![s("Name"), s("Base")]]);
        let mappings = vec![SpecColumnMapping::new("Name", "name")];
        let mut report = SpecReadReport::default();

        assert!(read_range(&range, &mappings, &mut report).is_empty());
        assert_eq!(report.row_idx_stop, None);
    }

    #[test]
    fn test_empty_sheet_leaves_mappings_unresolved() {
        let range: Range<Data> = Range::empty();
        let mappings = vec![SpecColumnMapping::new("Name", "name")];
        let mut report = SpecReadReport::default();

        assert!(read_range(&range, &mappings, &mut report).is_empty());
        assert!(report.header.is_empty());
        assert_eq!(report.mappings[0].col_idx, None);
    }

    #[test]
    fn test_derive_cell_text() {
        assert_eq!(derive_cell_text(&Data::Float(1234.565)), "1234.57");
        assert_eq!(derive_cell_text(&Data::Int(42)), "42.00");
        assert_eq!(derive_cell_text(&s("  x ")), "  x ");
        assert_eq!(derive_cell_text(&Data::Bool(true)), "TRUE");
        assert_eq!(derive_cell_text(&Data::Empty), "");
        assert_eq!(
            derive_cell_text(&Data::Error(CellErrorType::Div0)),
            "#DIV/0!"
        );
        assert_eq!(
            derive_cell_text(&Data::DateTimeIso("2024-01-31".to_string())),
            "2024-01-31"
        );
    }

    #[test]
    fn test_derive_header_row_keeps_gaps() {
        let range = build_range(vec![vec![s("Name"), Data::Empty, Data::Float(2024.0)]]);

        assert_eq!(
            derive_header_row(&range),
            vec![Some("Name".to_string()), None, Some("2024.00".to_string())]
        );
    }

    #[test]
    fn test_numeric_header_matches_its_record_text() {
        let range = build_range(vec![
            vec![s("Name"), Data::Float(2024.0)],
            vec![s("Alice"), Data::Float(12.5)],
        ]);
        let mappings = vec![
            SpecColumnMapping::new("2024.00", "year"),
            SpecColumnMapping::new("2024", "short"),
        ];
        let mut report = SpecReadReport::default();

        let l_records = read_range(&range, &mappings, &mut report);

        assert_eq!(report.mappings[0].col_idx, Some(1));
        assert_eq!(report.mappings[1].col_idx, None);
        assert_eq!(l_records[0].get("year"), Some("12.50"));
    }

    #[test]
    fn test_extract_records_returns_stop_row() {
        let range = build_range(vec![
            vec![s("Name")],
            vec![s("Alice")],
            vec![Data::Empty],
            vec![s("Carol")],
        ]);
        let mappings = vec![SpecResolvedColumnMapping {
            from: Some("Name".to_string()),
            to: "name".to_string(),
            col_idx: Some(0),
        }];

        let (l_records, row_idx_stop) = extract_records(&mappings, &range);

        assert_eq!(l_records.len(), 1);
        assert_eq!(row_idx_stop, Some(2));

        let range_full = build_range(vec![vec![s("Name")], vec![s("Alice")]]);
        assert_eq!(extract_records(&mappings, &range_full).1, None);
    }

    #[test]
    fn test_read_rows_from_workbook_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("template.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Name").expect("write");
        worksheet.write_string(0, 1, "Extra").expect("write");
        worksheet.write_string(0, 2, "Base").expect("write");
        worksheet.write_string(1, 0, "Alice").expect("write");
        worksheet.write_number(1, 2, 1234.5).expect("write");
        worksheet.write_string(2, 0, "Bob").expect("write");
        worksheet.write_number(2, 1, 7.0).expect("write");
        worksheet.write_number(2, 2, 1234.565).expect("write");
        workbook.save(&path).expect("save");

        let mappings = vec![
            SpecColumnMapping::new("Name", "姓名"),
            SpecColumnMapping::new("Base", "基本工资"),
            SpecColumnMapping::new("Extra", "其他"),
        ];
        let (l_records, report) = read_rows_with_report(&path, &mappings).expect("read");

        assert_eq!(l_records.len(), 2);
        assert_eq!(l_records[0].get("基本工资"), Some("1234.50"));
        assert_eq!(l_records[0].get("其他"), Some(""));
        assert_eq!(l_records[1].get("基本工资"), Some("1234.57"));
        assert_eq!(l_records[1].get("其他"), Some("7.00"));
        assert_eq!(report.mappings[1].col_idx, Some(2));
    }

    #[test]
    fn test_read_rows_missing_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_rows(dir.path().join("missing.xlsx"), &[]).unwrap_err();

        assert!(matches!(err, PayslipError::OpenWorkbook { .. }));
    }
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use chrono::{NaiveDate, TimeDelta};

use crate::config::SheetLayout;
use crate::error::{Result, SyncError};
use crate::model::row::SourceRow;

pub const COL_STATUS: &str = "Status";
pub const COL_COMPANY: &str = "FIRMA";
pub const COL_PROJECT: &str = "Projektname";
pub const COL_OFFER: &str = "Offer Nummer";
pub const COL_SCOPE: &str = "Leistungsumfang";
pub const COL_REVENUE: &str = "Umsatz";
pub const COL_OFFER_COUNTRY: &str = "Angebotsland";
pub const COL_INSTALL_COUNTRY: &str = "Aufstellungsland";
pub const COL_MEMBER: &str = "PL";
pub const COL_DUE: &str = "SOLL-Kontakt:";

/// Header names every offer list must carry.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_STATUS,
    COL_COMPANY,
    COL_PROJECT,
    COL_OFFER,
    COL_SCOPE,
    COL_REVENUE,
    COL_OFFER_COUNTRY,
    COL_INSTALL_COUNTRY,
    COL_MEMBER,
    COL_DUE,
];

/// Find the single workbook with `extension` in `folder`.
///
/// Excel lock files (`~$name.xlsm`) are ignored. Zero or several matches
/// are errors; the caller never gets an arbitrary pick.
pub fn find_spreadsheet(folder: &Path, extension: &str) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(extension) && !n.starts_with("~$"))
        })
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(SyncError::NoSpreadsheet {
            folder: folder.to_path_buf(),
            extension: extension.to_string(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(SyncError::AmbiguousSpreadsheet {
            extension: extension.to_string(),
            candidates,
        }),
    }
}

/// Read the offer list sheet of the workbook at `path`.
pub fn load_rows(path: &Path, layout: &SheetLayout) -> Result<Vec<SourceRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range(&layout.sheet_name)
        .ok_or_else(|| SyncError::MissingSheet(layout.sheet_name.clone()))??;
    rows_from_range(&range, layout.header_row)
}

/// Project a sheet range onto the required columns, treating absolute row
/// `header_row` as the header line.
pub fn rows_from_range(range: &Range<DataType>, header_row: u32) -> Result<Vec<SourceRow>> {
    let start_row = range.start().map(|(row, _)| row).unwrap_or(0);
    let mut rows = range.rows().enumerate().map(|(i, r)| (start_row + i as u32, r));

    // A repeated header name keeps its first column.
    let mut header: HashMap<String, usize> = HashMap::new();
    if let Some((_, cells)) = rows.by_ref().find(|(abs, _)| *abs == header_row) {
        for (idx, cell) in cells.iter().enumerate() {
            if let Some(name) = cell_text(Some(cell)) {
                header.entry(name).or_insert(idx);
            }
        }
    }

    let mut columns = HashMap::new();
    for name in REQUIRED_COLUMNS {
        let idx = header
            .get(name)
            .ok_or_else(|| SyncError::MissingColumn(name.to_string()))?;
        columns.insert(name, *idx);
    }
    let col = |name: &str| columns[name];

    let mut out = Vec::new();
    for (abs, cells) in rows {
        let sheet_row = abs + 1;
        let row = SourceRow {
            sheet_row,
            offer_number: cell_text(cells.get(col(COL_OFFER))),
            company: cell_text(cells.get(col(COL_COMPANY))),
            project_name: cell_text(cells.get(col(COL_PROJECT))),
            status_code: cell_text(cells.get(col(COL_STATUS))),
            scope_of_work: cell_text(cells.get(col(COL_SCOPE))),
            revenue: cell_number(cells.get(col(COL_REVENUE)), sheet_row, COL_REVENUE)?,
            offer_country: cell_text(cells.get(col(COL_OFFER_COUNTRY))),
            installation_country: cell_text(cells.get(col(COL_INSTALL_COUNTRY))),
            member_code: cell_text(cells.get(col(COL_MEMBER))),
            due_date: cell_due(cells.get(col(COL_DUE))),
        };
        if row == (SourceRow { sheet_row, ..SourceRow::default() }) {
            continue;
        }
        out.push(row);
    }
    Ok(out)
}

/// Render an integral float without the trailing `.0`, so offer numbers
/// stored as numbers read back as `4711`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn cell_text(cell: Option<&DataType>) -> Option<String> {
    match cell? {
        DataType::Empty | DataType::Error(_) => None,
        DataType::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        DataType::Float(f) => Some(format_number(*f)),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Bool(b) => Some(b.to_string()),
        DataType::DateTime(serial) => excel_serial_to_iso(*serial),
        other => Some(other.to_string()),
    }
}

fn cell_number(cell: Option<&DataType>, row: u32, column: &str) -> Result<Option<f64>> {
    let invalid = |value: String| SyncError::InvalidNumber {
        row,
        column: column.to_string(),
        value,
    };
    match cell {
        None | Some(DataType::Empty) | Some(DataType::Error(_)) => Ok(None),
        Some(DataType::Float(f)) => Ok(Some(*f)),
        Some(DataType::Int(i)) => Ok(Some(*i as f64)),
        Some(DataType::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| invalid(trimmed.to_string()))
        }
        Some(other) => Err(invalid(other.to_string())),
    }
}

fn cell_due(cell: Option<&DataType>) -> Option<String> {
    match cell? {
        DataType::Float(serial) => excel_serial_to_iso(*serial),
        DataType::Int(serial) => excel_serial_to_iso(*serial as f64),
        other => cell_text(Some(other)),
    }
}

/// Excel 1900 date system serial -> `YYYY-MM-DDTHH:MM:SS`.
pub fn excel_serial_to_iso(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let at = epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)?;
    Some(at.format("%Y-%m-%dT%H:%M:%S").to_string())
}

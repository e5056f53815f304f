//! # Answer Table Export
//!
//! Writes one row per company corpus, with the question set as the header
//! row, to either an Excel workbook or a CSV file depending on the
//! destination's extension. Existing files are replaced.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::Error as CrateError;

/// Default destination of the answer table
pub const DEFAULT_OUTPUT: &str = "company_info.xlsx";

/// Most characters Excel accepts in one cell
pub const XLSX_MAX_CELL_CHARS: usize = 32_767;

/// Error type for table export
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("Unsupported table format for {0} (expected .xlsx or .csv)")]
    UnsupportedFormat(String),

    #[error("Row {row} has {found} cells but there are {expected} columns")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
}

impl From<TableError> for CrateError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::Io(e) => CrateError::Io(e),
            _ => CrateError::Table(err.to_string()),
        }
    }
}

/// File format of the answer table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Xlsx,
    Csv,
}

impl TableFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("xlsx") => Ok(TableFormat::Xlsx),
            Some("csv") => Ok(TableFormat::Csv),
            _ => Err(TableError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Write `rows` under `headers` to `destination`, replacing any existing file.
pub fn write_table(
    rows: &[Vec<String>],
    headers: &[String],
    destination: &Path,
) -> Result<(), TableError> {
    let format = TableFormat::from_path(destination)?;

    for (index, row) in rows.iter().enumerate() {
        if row.len() != headers.len() {
            return Err(TableError::RowWidth {
                row: index,
                found: row.len(),
                expected: headers.len(),
            });
        }
    }

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        TableFormat::Xlsx => write_xlsx(rows, headers, destination)?,
        TableFormat::Csv => write_csv(rows, headers, destination)?,
    }

    info!("Answers saved to {}", destination.display());
    Ok(())
}

fn write_xlsx(rows: &[Vec<String>], headers: &[String], destination: &Path) -> Result<(), TableError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column(col)?, fit_cell(header, 0, col), &header_format)?;
    }
    for (index, row) in rows.iter().enumerate() {
        let row_number = u32::try_from(index + 1)
            .map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, cell) in row.iter().enumerate() {
            worksheet.write_string(row_number, column(col)?, fit_cell(cell, row_number, col))?;
        }
    }

    workbook.save(destination)?;
    Ok(())
}

/// Cut `cell` to what an xlsx cell can hold.
fn fit_cell(cell: &str, row: u32, col: usize) -> &str {
    match cell.char_indices().nth(XLSX_MAX_CELL_CHARS) {
        Some((end, _)) => {
            warn!(
                row,
                column = col,
                "Truncating {} characters to the xlsx cell limit of {}",
                cell.chars().count(),
                XLSX_MAX_CELL_CHARS
            );
            &cell[..end]
        }
        None => cell,
    }
}

fn column(index: usize) -> Result<u16, XlsxError> {
    u16::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn write_csv(rows: &[Vec<String>], headers: &[String], destination: &Path) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_path(destination)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Reader, Xlsx};

    fn headers() -> Vec<String> {
        vec!["Where is HQ?".to_string(), "Who leads it?".to_string()]
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TableFormat::from_path(Path::new("out.xlsx")).unwrap(), TableFormat::Xlsx);
        assert_eq!(TableFormat::from_path(Path::new("OUT.CSV")).unwrap(), TableFormat::Csv);
        assert!(matches!(
            TableFormat::from_path(Path::new("out.json")),
            Err(TableError::UnsupportedFormat(_))
        ));
        assert!(TableFormat::from_path(Path::new("out")).is_err());
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.csv");

        write_table(
            &[row(&["Detroit", "Mary Barra"]), row(&["Munich, \"DE\"", "No valid response."])],
            &headers(),
            &path,
        )
        .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read_headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(read_headers, headers());

        let records: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1][0], "Munich, \"DE\"");
    }

    #[test]
    fn test_rewrite_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.csv");

        write_table(&[row(&["a", "b"]), row(&["c", "d"])], &headers(), &path).unwrap();
        write_table(&[row(&["e", "f"])], &headers(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.contains("e,f"));
        assert!(!written.contains("a,b"));
    }

    fn read_xlsx(path: &Path) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_xlsx_is_written_and_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("company_info.xlsx");

        write_table(
            &[row(&["Detroit", "Mary Barra"]), row(&["Ludwigshafen", "Markus Kamieth"])],
            &headers(),
            &path,
        )
        .unwrap();
        write_table(&[row(&["Munich", "Roland Busch"])], &headers(), &path).unwrap();

        let sheet = read_xlsx(&path);
        assert_eq!(
            sheet,
            vec![headers(), row(&["Munich", "Roland Busch"])]
        );
    }

    #[test]
    fn test_xlsx_truncates_oversized_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("company_info.xlsx");
        let long_answer = "x".repeat(40_000);
        let multibyte = "é".repeat(XLSX_MAX_CELL_CHARS + 1);

        write_table(
            &[row(&[&long_answer, "short"]), row(&["ok", &multibyte])],
            &headers(),
            &path,
        )
        .unwrap();

        let sheet = read_xlsx(&path);
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet[1][0].chars().count(), XLSX_MAX_CELL_CHARS);
        assert_eq!(sheet[1][1], "short");
        assert_eq!(sheet[2][1].chars().count(), XLSX_MAX_CELL_CHARS);
    }

    #[test]
    fn test_csv_keeps_long_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.csv");
        let long_answer = "x".repeat(40_000);

        write_table(&[row(&[&long_answer, "short"])], &headers(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record[0].len(), 40_000);
    }

    #[test]
    fn test_row_width_must_match_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.csv");

        let result = write_table(&[row(&["only one"])], &headers(), &path);
        assert!(matches!(
            result,
            Err(TableError::RowWidth { row: 0, found: 1, expected: 2 })
        ));
        assert!(!path.exists());
    }
}

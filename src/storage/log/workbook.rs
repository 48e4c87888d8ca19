//! Submission log workbook encoding
//!
//! The log is one worksheet: a header row followed by one row per logged
//! programme. Columns are matched by header text, so a workbook edited by
//! hand keeps any extra columns it gained.

use crate::submission::{LOG_HEADERS, LogRow};
use crate::utils::error::{PortalError, Result};
use calamine::{Data, Reader, open_workbook_auto};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Worksheet name used when writing
pub const SHEET_NAME: &str = "Submissions";

/// In-memory copy of the log worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Default for LogSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSheet {
    /// A sheet with the standard headers and no rows
    pub fn new() -> Self {
        Self {
            headers: LOG_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Load the first worksheet of an existing workbook
    pub fn load(path: &Path) -> Result<Self> {
        let mut workbook = open_workbook_auto(path).map_err(|e| {
            PortalError::SubmissionLog(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
            return Ok(Self::new());
        };

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            PortalError::SubmissionLog(format!(
                "Failed to read sheet {} of {}: {}",
                sheet_name,
                path.display(),
                e
            ))
        })?;

        let mut grid = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());

        let Some(headers) = grid.next() else {
            return Ok(Self::new());
        };
        let rows = grid
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();

        let mut sheet = Self { headers, rows };
        sheet.ensure_standard_headers();
        Ok(sheet)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row below the existing ones
    pub fn push(&mut self, row: &LogRow) {
        let mut cells = vec![String::new(); self.headers.len()];
        for (header, value) in LOG_HEADERS.iter().zip(row.cells()) {
            if let Some(column) = self.column(header) {
                cells[column] = value.to_string();
            }
        }
        self.rows.push(cells);
    }

    /// Rows as log records; columns other than the standard ones are ignored
    pub fn log_rows(&self) -> Vec<LogRow> {
        let columns = LOG_HEADERS.map(|header| self.column(header));
        self.rows
            .iter()
            .map(|row| {
                LogRow::from_cells(columns.map(|column| {
                    column
                        .and_then(|c| row.get(c))
                        .cloned()
                        .unwrap_or_default()
                }))
            })
            .collect()
    }

    /// Serialize to xlsx bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

        for (col, header) in self.headers.iter().enumerate() {
            let col = column_number(col)?;
            worksheet
                .write_string_with_format(0, col, header, &header_format)
                .map_err(xlsx_error)?;
            worksheet.set_column_width(col, 28).map_err(xlsx_error)?;
        }

        for (index, row) in self.rows.iter().enumerate() {
            let row_number = u32::try_from(index + 1).map_err(|_| {
                PortalError::SubmissionLog("Submission log has too many rows".to_string())
            })?;
            for (col, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                worksheet
                    .write_string(row_number, column_number(col)?, value)
                    .map_err(xlsx_error)?;
            }
        }

        workbook.save_to_buffer().map_err(xlsx_error)
    }

    /// Rewrite the workbook at `path` in full
    ///
    /// The bytes go to a sibling temporary file that then replaces `path`, so
    /// a failed write leaves the previous log intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.encode()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                PortalError::SubmissionLog(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);

        std::fs::write(tmp_path, &bytes).map_err(|e| {
            PortalError::SubmissionLog(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        std::fs::rename(tmp_path, path).map_err(|e| {
            PortalError::SubmissionLog(format!("Failed to replace {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    fn column(&self, header: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(header))
    }

    fn ensure_standard_headers(&mut self) {
        for header in LOG_HEADERS {
            if self.column(header).is_none() {
                self.headers.push(header.to_string());
            }
        }
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(s) => s.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

fn column_number(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| PortalError::SubmissionLog("Submission log has too many columns".to_string()))
}

fn xlsx_error(e: rust_xlsxwriter::XlsxError) -> PortalError {
    PortalError::SubmissionLog(format!("Failed to encode submission log: {}", e))
}

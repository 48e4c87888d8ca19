//! Submission data model

use crate::storage::files::detect_content_type;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Number of programme slots in one batch
pub const PROGRAMME_SLOTS: usize = 4;

/// Column headers of the submission log, in order
pub const LOG_HEADERS: [&str; 7] = [
    "Timestamp",
    "Department",
    "Programme",
    "Excel File",
    "AY 2022-2023",
    "AY 2023-2024",
    "AY 2024-2025",
];

/// Academic year a supporting document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcademicYear {
    #[serde(rename = "2022-2023")]
    Ay2022To2023,
    #[serde(rename = "2023-2024")]
    Ay2023To2024,
    #[serde(rename = "2024-2025")]
    Ay2024To2025,
}

impl AcademicYear {
    /// All academic years in document-slot order
    pub const ALL: [AcademicYear; 3] = [
        AcademicYear::Ay2022To2023,
        AcademicYear::Ay2023To2024,
        AcademicYear::Ay2024To2025,
    ];

    /// Label used in stored names, e.g. `2022-2023`
    pub fn label(self) -> &'static str {
        match self {
            AcademicYear::Ay2022To2023 => "2022-2023",
            AcademicYear::Ay2023To2024 => "2023-2024",
            AcademicYear::Ay2024To2025 => "2024-2025",
        }
    }

    /// Position of this year's document slot
    pub fn slot(self) -> usize {
        match self {
            AcademicYear::Ay2022To2023 => 0,
            AcademicYear::Ay2023To2024 => 1,
            AcademicYear::Ay2024To2025 => 2,
        }
    }

    /// Form field suffix, e.g. `2022_2023`
    pub fn field_suffix(self) -> &'static str {
        match self {
            AcademicYear::Ay2022To2023 => "2022_2023",
            AcademicYear::Ay2023To2024 => "2023_2024",
            AcademicYear::Ay2024To2025 => "2024_2025",
        }
    }

    /// Parse a form field suffix
    pub fn from_field_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ay| ay.field_suffix() == suffix)
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a stored file is, as it appears in its derived name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Excel,
    Document(AcademicYear),
}

impl FileKind {
    pub fn label(self) -> &'static str {
        match self {
            FileKind::Excel => "Excel",
            FileKind::Document(ay) => ay.label(),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file as received from the caller
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original file name as sent by the client
    pub file_name: String,
    /// Declared media type, if the client sent one
    pub content_type: Option<String>,
    /// Raw content
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            content: content.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Lower-cased extension of the original name
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Declared media type, or one guessed from the extension
    pub fn media_type(&self) -> String {
        match self.content_type.as_deref() {
            Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
            _ => detect_content_type(&self.file_name),
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// Content is elided; batches can hold hundreds of megabytes.
impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.content.len())
            .finish()
    }
}

/// One programme slot of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgrammeSubmission {
    /// 1-based slot index
    pub index: usize,
    pub name: String,
    pub spreadsheet: Option<UploadedFile>,
    /// One document per academic year, in [`AcademicYear::ALL`] order
    pub documents: [Option<UploadedFile>; 3],
}

impl ProgrammeSubmission {
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn document(&self, year: AcademicYear) -> Option<&UploadedFile> {
        self.documents[year.slot()].as_ref()
    }

    pub fn set_document(&mut self, year: AcademicYear, file: UploadedFile) {
        self.documents[year.slot()] = Some(file);
    }
}

/// A department and its four programme slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionBatch {
    pub department: String,
    pub programmes: [ProgrammeSubmission; PROGRAMME_SLOTS],
}

impl SubmissionBatch {
    pub fn new(department: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            programmes: std::array::from_fn(|i| ProgrammeSubmission::empty(i + 1)),
        }
    }

    /// Mutable access by 1-based programme index
    pub fn programme_mut(&mut self, index: usize) -> Option<&mut ProgrammeSubmission> {
        index
            .checked_sub(1)
            .and_then(|slot| self.programmes.get_mut(slot))
    }
}

/// One row of the submission log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRow {
    pub timestamp: String,
    pub department: String,
    pub programme: String,
    pub excel_file: String,
    pub ay_2022_2023: String,
    pub ay_2023_2024: String,
    pub ay_2024_2025: String,
}

impl LogRow {
    /// Cell values in [`LOG_HEADERS`] order
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.timestamp,
            &self.department,
            &self.programme,
            &self.excel_file,
            &self.ay_2022_2023,
            &self.ay_2023_2024,
            &self.ay_2024_2025,
        ]
    }

    /// Build a row from cell values in [`LOG_HEADERS`] order
    pub fn from_cells(cells: [String; 7]) -> Self {
        let [
            timestamp,
            department,
            programme,
            excel_file,
            ay_2022_2023,
            ay_2023_2024,
            ay_2024_2025,
        ] = cells;
        Self {
            timestamp,
            department,
            programme,
            excel_file,
            ay_2022_2023,
            ay_2023_2024,
            ay_2024_2025,
        }
    }
}

/// Severity of a notice; a batch-fatal error is the HTTP error body instead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Success,
}

/// A message shown to the caller after a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programme: Option<usize>,
    pub message: String,
}

impl Notice {
    pub fn warning(programme: usize, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            programme: Some(programme),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            programme: None,
            message: message.into(),
        }
    }
}

/// Lifecycle of one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    AwaitingDepartment,
    ProcessingProgrammes,
    RejectedNoDepartment,
    Completed,
}

impl BatchState {
    /// Leave `AwaitingDepartment` depending on whether a department was given
    pub fn on_department(self, present: bool) -> Self {
        match (self, present) {
            (BatchState::AwaitingDepartment, true) => BatchState::ProcessingProgrammes,
            (BatchState::AwaitingDepartment, false) => BatchState::RejectedNoDepartment,
            (other, _) => other,
        }
    }

    /// Finish processing
    pub fn on_programmes_done(self) -> Self {
        match self {
            BatchState::ProcessingProgrammes => BatchState::Completed,
            other => other,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BatchState::RejectedNoDepartment | BatchState::Completed
        )
    }
}

/// Outcome of a completed batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub state: BatchState,
    /// Timestamp written into every row of this batch
    pub timestamp: String,
    pub department: String,
    pub notices: Vec<Notice>,
    /// Rows appended to the submission log, in order
    pub rows: Vec<LogRow>,
    /// Identifiers returned by the file storage, in store order
    pub stored_files: Vec<String>,
    /// Identifier of the uploaded log snapshot, if one was taken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
    /// Set when the batch finished; clients show their celebration effect
    pub celebrate: bool,
}

impl BatchReport {
    pub fn warnings(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|n| n.level == NoticeLevel::Warning)
    }
}

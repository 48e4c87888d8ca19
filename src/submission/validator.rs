//! Submission validation
//!
//! A missing department rejects the whole batch. Anything wrong with a single
//! programme only skips that programme.

use super::types::{AcademicYear, FileKind, ProgrammeSubmission, UploadedFile};
use crate::utils::error::{PortalError, Result};
use std::fmt;

/// Accepted spreadsheet extensions
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

/// Accepted supporting-document extensions
pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Message returned when the department is missing
pub const MISSING_DEPARTMENT: &str = "Please enter the Department Name.";

/// Check the department and return it trimmed
pub fn validate_department(department: &str) -> Result<&str> {
    let department = department.trim();
    if department.is_empty() {
        return Err(PortalError::validation(MISSING_DEPARTMENT));
    }
    Ok(department)
}

/// A form slot of a programme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Name,
    Spreadsheet,
    Document(AcademicYear),
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Name => f.write_str("programme name"),
            Slot::Spreadsheet => f.write_str("Excel sheet"),
            Slot::Document(ay) => write!(f, "{} AY supporting document", ay),
        }
    }
}

/// Why a slot does not count as filled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotIssue {
    Missing(Slot),
    Empty { slot: Slot, file_name: String },
    UnsupportedType { slot: Slot, file_name: String },
}

impl SlotIssue {
    pub fn slot(&self) -> Slot {
        match self {
            SlotIssue::Missing(slot) => *slot,
            SlotIssue::Empty { slot, .. } | SlotIssue::UnsupportedType { slot, .. } => *slot,
        }
    }
}

impl fmt::Display for SlotIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotIssue::Missing(slot) => write!(f, "missing {}", slot),
            SlotIssue::Empty { slot, file_name } => {
                write!(f, "{} '{}' is empty", slot, file_name)
            }
            SlotIssue::UnsupportedType { slot, file_name } => {
                write!(f, "{} '{}' has an unsupported file type", slot, file_name)
            }
        }
    }
}

/// A programme that passed validation, borrowed from its submission
#[derive(Debug, Clone, Copy)]
pub struct CompleteProgramme<'a> {
    pub index: usize,
    /// Trimmed programme name
    pub name: &'a str,
    pub spreadsheet: &'a UploadedFile,
    pub documents: [&'a UploadedFile; 3],
}

impl<'a> CompleteProgramme<'a> {
    /// Every file with its kind, spreadsheet first then documents by year
    pub fn files(&self) -> [(FileKind, &'a UploadedFile); 4] {
        [
            (FileKind::Excel, self.spreadsheet),
            (FileKind::Document(AcademicYear::Ay2022To2023), self.documents[0]),
            (FileKind::Document(AcademicYear::Ay2023To2024), self.documents[1]),
            (FileKind::Document(AcademicYear::Ay2024To2025), self.documents[2]),
        ]
    }
}

/// Result of checking one programme
#[derive(Debug, Clone)]
pub enum ProgrammeCheck<'a> {
    Complete(CompleteProgramme<'a>),
    Incomplete { index: usize, issues: Vec<SlotIssue> },
}

impl ProgrammeCheck<'_> {
    pub fn is_complete(&self) -> bool {
        matches!(self, ProgrammeCheck::Complete(_))
    }

    /// Warning text for an incomplete programme
    pub fn warning_message(&self) -> Option<String> {
        match self {
            ProgrammeCheck::Complete(_) => None,
            ProgrammeCheck::Incomplete { index, issues } => {
                let details: Vec<String> = issues.iter().map(ToString::to_string).collect();
                Some(format!(
                    "Incomplete data for Programme {}. Skipping ({}).",
                    index,
                    details.join("; ")
                ))
            }
        }
    }
}

/// Check that a programme has a name, an accepted spreadsheet and all three
/// accepted documents
pub fn check_programme(programme: &ProgrammeSubmission) -> ProgrammeCheck<'_> {
    let mut issues = Vec::new();

    let name = programme.name.trim();
    if name.is_empty() {
        issues.push(SlotIssue::Missing(Slot::Name));
    }

    let spreadsheet = check_file(
        Slot::Spreadsheet,
        programme.spreadsheet.as_ref(),
        &SPREADSHEET_EXTENSIONS,
        &mut issues,
    );

    let documents = AcademicYear::ALL.map(|ay| {
        check_file(
            Slot::Document(ay),
            programme.document(ay),
            &DOCUMENT_EXTENSIONS,
            &mut issues,
        )
    });

    match (spreadsheet, documents) {
        (Some(spreadsheet), [Some(d0), Some(d1), Some(d2)]) if issues.is_empty() => {
            ProgrammeCheck::Complete(CompleteProgramme {
                index: programme.index,
                name,
                spreadsheet,
                documents: [d0, d1, d2],
            })
        }
        _ => ProgrammeCheck::Incomplete {
            index: programme.index,
            issues,
        },
    }
}

fn check_file<'a>(
    slot: Slot,
    file: Option<&'a UploadedFile>,
    accepted: &[&str],
    issues: &mut Vec<SlotIssue>,
) -> Option<&'a UploadedFile> {
    let Some(file) = file else {
        issues.push(SlotIssue::Missing(slot));
        return None;
    };

    let extension_ok = file
        .extension()
        .is_some_and(|ext| accepted.contains(&ext.as_str()));
    if !extension_ok {
        issues.push(SlotIssue::UnsupportedType {
            slot,
            file_name: file.file_name.clone(),
        });
        return None;
    }

    if file.is_empty() {
        issues.push(SlotIssue::Empty {
            slot,
            file_name: file.file_name.clone(),
        });
        return None;
    }

    Some(file)
}

//! Programme submission processing
//!
//! A batch carries one department and four programme slots. Each complete
//! programme has its spreadsheet and three academic-year documents stored
//! under derived names, then gains one row in the submission log.

mod naming;
mod processor;
mod types;
mod validator;


pub use naming::{name_prefix, snapshot_file_name, stored_file_name, underscored};
pub use processor::{ProcessorSettings, SubmissionProcessor};
pub use types::{
    AcademicYear, BatchReport, BatchState, FileKind, LOG_HEADERS, LogRow, Notice, NoticeLevel,
    PROGRAMME_SLOTS, ProgrammeSubmission, SubmissionBatch, UploadedFile,
};
pub use validator::{
    CompleteProgramme, DOCUMENT_EXTENSIONS, ProgrammeCheck, SPREADSHEET_EXTENSIONS, Slot,
    SlotIssue, check_programme, validate_department,
};

//! Stored file naming
//!
//! Names are a pure function of their inputs. Two identical submissions map
//! to the same name; whether the second overwrites or duplicates the first is
//! up to the storage backend.

use super::types::FileKind;
use chrono::NaiveDateTime;

/// Replace spaces with underscores
pub fn underscored(value: &str) -> String {
    value.replace(' ', "_")
}

/// `P{index}_{programme}_{department}`
pub fn name_prefix(index: usize, programme: &str, department: &str) -> String {
    format!(
        "P{}_{}_{}",
        index,
        underscored(programme),
        underscored(department)
    )
}

/// `P{index}_{programme}_{department}_{kind}_{original}`
///
/// Only the final component of `original_name` is kept, so client-side paths
/// such as `C:\Users\me\plan.pdf` reduce to `plan.pdf`.
pub fn stored_file_name(
    index: usize,
    programme: &str,
    department: &str,
    kind: FileKind,
    original_name: &str,
) -> String {
    format!(
        "{}_{}_{}",
        name_prefix(index, programme, department),
        kind.label(),
        base_name(original_name)
    )
}

/// Dated object name for a whole-log snapshot
pub fn snapshot_file_name(at: &NaiveDateTime) -> String {
    format!("submissions_summary_{}.xlsx", at.format("%Y-%m-%d_%H-%M-%S"))
}

fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

//! Batch submission orchestration

use super::naming::{snapshot_file_name, stored_file_name};
use super::types::{BatchReport, BatchState, LogRow, Notice, SubmissionBatch};
use super::validator::{CompleteProgramme, ProgrammeCheck, check_programme, validate_department};
use crate::config::Config;
use crate::storage::files::FileStore;
use crate::storage::log::LogAppender;
use crate::utils::error::Result;
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tracing::{debug, info, warn};

const XLSX_MEDIA_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Behaviour switches for the processor
#[derive(Debug, Clone, Default)]
pub struct ProcessorSettings {
    /// Upload a dated copy of the whole log after each completed batch
    pub snapshot_after_batch: bool,
}

impl ProcessorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            snapshot_after_batch: config.submission_log().snapshot_enabled(config.storage()),
        }
    }
}

/// Validates batches, stores their files and appends log rows
///
/// Batches run strictly in sequence: every store and every log rewrite is
/// awaited before the next one starts. Failures propagate immediately and
/// nothing already written is undone.
pub struct SubmissionProcessor {
    files: Arc<dyn FileStore>,
    log: Arc<dyn LogAppender>,
    settings: ProcessorSettings,
}

impl SubmissionProcessor {
    pub fn new(
        files: Arc<dyn FileStore>,
        log: Arc<dyn LogAppender>,
        settings: ProcessorSettings,
    ) -> Self {
        Self {
            files,
            log,
            settings,
        }
    }

    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    /// Process a batch stamped with the current local time
    pub async fn process(&self, batch: &SubmissionBatch) -> Result<BatchReport> {
        self.process_at(batch, Local::now().naive_local()).await
    }

    /// Process a batch stamped with `at`
    pub async fn process_at(
        &self,
        batch: &SubmissionBatch,
        at: NaiveDateTime,
    ) -> Result<BatchReport> {
        let state = BatchState::AwaitingDepartment;
        let department = match validate_department(&batch.department) {
            Ok(department) => department,
            Err(e) => {
                warn!(state = ?state.on_department(false), "Submission rejected: {}", e);
                return Err(e);
            }
        };
        let state = state.on_department(true);

        let timestamp = at.format("%Y-%m-%d %H:%M:%S").to_string();
        info!(department, %timestamp, "Processing submission batch");

        let mut report = BatchReport {
            state,
            timestamp,
            department: department.to_string(),
            notices: Vec::new(),
            rows: Vec::new(),
            stored_files: Vec::new(),
            snapshot: None,
            celebrate: false,
        };

        for programme in &batch.programmes {
            match check_programme(programme) {
                ProgrammeCheck::Complete(complete) => {
                    let row = self
                        .submit_programme(
                            &complete,
                            department,
                            &report.timestamp,
                            &mut report.stored_files,
                        )
                        .await?;
                    report.rows.push(row);
                }
                incomplete => {
                    let message = incomplete.warning_message().unwrap_or_else(|| {
                        format!("Incomplete data for Programme {}. Skipping.", programme.index)
                    });
                    warn!(programme = programme.index, "{}", message);
                    report.notices.push(Notice::warning(programme.index, message));
                }
            }
        }

        if self.settings.snapshot_after_batch {
            report.snapshot = self.upload_snapshot(&at).await?;
        }

        report.state = report.state.on_programmes_done();
        report.celebrate = true;
        report.notices.push(Notice::success(
            "All complete programmes submitted and logged successfully!",
        ));

        info!(
            department,
            logged = report.rows.len(),
            skipped = report.warnings().count(),
            "Submission batch completed"
        );
        Ok(report)
    }

    async fn submit_programme(
        &self,
        programme: &CompleteProgramme<'_>,
        department: &str,
        timestamp: &str,
        stored: &mut Vec<String>,
    ) -> Result<LogRow> {
        let mut names: [String; 4] = Default::default();

        for (slot, (kind, file)) in programme.files().into_iter().enumerate() {
            let name = stored_file_name(
                programme.index,
                programme.name,
                department,
                kind,
                &file.file_name,
            );
            let id = self
                .files
                .store(&name, &file.media_type(), &file.content)
                .await?;
            debug!(programme = programme.index, %kind, %id, "Stored file");
            stored.push(id);
            names[slot] = name;
        }

        let [excel_file, ay_2022_2023, ay_2023_2024, ay_2024_2025] = names;

        let row = LogRow {
            timestamp: timestamp.to_string(),
            department: department.to_string(),
            programme: programme.name.to_string(),
            excel_file,
            ay_2022_2023,
            ay_2023_2024,
            ay_2024_2025,
        };

        self.log.append(&row).await?;
        info!(programme = programme.index, name = programme.name, "Programme logged");
        Ok(row)
    }

    /// Upload a dated copy of the whole log, if one exists yet
    async fn upload_snapshot(&self, at: &NaiveDateTime) -> Result<Option<String>> {
        let Some(bytes) = self.log.snapshot().await? else {
            return Ok(None);
        };

        let name = snapshot_file_name(at);
        let id = self.files.store(&name, XLSX_MEDIA_TYPE, &bytes).await?;
        info!(%id, "Uploaded submission log snapshot");
        Ok(Some(id))
    }
}

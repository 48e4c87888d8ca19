//! Submission endpoints
//!
//! `POST /api/submissions` takes one department and up to four programmes as
//! `multipart/form-data`. `GET /api/submissions/log` downloads the log.

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::submission::{AcademicYear, PROGRAMME_SLOTS, SubmissionBatch, UploadedFile};
use crate::utils::error::{PortalError, Result};
use crate::utils::format_bytes;
use actix_multipart::{Field, Multipart};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use futures::StreamExt;
use std::path::Path;
use tracing::{debug, error, info};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Configure submission routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/submissions")
            .route("", web::post().to(submit))
            .route("/log", web::get().to(download_log)),
    );
}

/// A recognised form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Department,
    ProgrammeName(usize),
    Spreadsheet(usize),
    Document(usize, AcademicYear),
}

/// Map a form field name such as `p2_doc_2023_2024` to its slot
pub fn parse_field_name(name: &str) -> Option<FormField> {
    if name == "department" {
        return Some(FormField::Department);
    }

    let (index, rest) = name.strip_prefix('p')?.split_once('_')?;
    let index: usize = index.parse().ok()?;
    if !(1..=PROGRAMME_SLOTS).contains(&index) {
        return None;
    }

    match rest {
        "name" => Some(FormField::ProgrammeName(index)),
        "excel" => Some(FormField::Spreadsheet(index)),
        _ => rest
            .strip_prefix("doc_")
            .and_then(AcademicYear::from_field_suffix)
            .map(|ay| FormField::Document(index, ay)),
    }
}

/// Read a whole submission form into a batch
///
/// Unknown fields are drained and ignored. File parts without a file name or
/// without content count as "no file chosen". The combined size of all parts
/// is capped at `max_bytes`.
pub async fn read_batch(payload: &mut Multipart, max_bytes: usize) -> Result<SubmissionBatch> {
    let mut batch = SubmissionBatch::new("");
    let mut received = 0usize;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| PortalError::BadRequest(format!("Invalid multipart data: {}", e)))?;

        let parsed = field.name().and_then(parse_field_name);
        let Some(form_field) = parsed else {
            debug!("Ignoring form field {:?}", field.name());
            while field.next().await.is_some() {}
            continue;
        };

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());
        let data = read_field(&mut field, &mut received, max_bytes).await?;

        match form_field {
            FormField::Department => batch.department = text(data)?,
            FormField::ProgrammeName(index) => {
                if let Some(programme) = batch.programme_mut(index) {
                    programme.name = text(data)?;
                }
            }
            FormField::Spreadsheet(index) => {
                if let (Some(programme), Some(file)) =
                    (batch.programme_mut(index), upload(file_name, content_type, data))
                {
                    programme.spreadsheet = Some(file);
                }
            }
            FormField::Document(index, ay) => {
                if let (Some(programme), Some(file)) =
                    (batch.programme_mut(index), upload(file_name, content_type, data))
                {
                    programme.set_document(ay, file);
                }
            }
        }
    }

    Ok(batch)
}

async fn read_field(field: &mut Field, received: &mut usize, max_bytes: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk
            .map_err(|e| PortalError::BadRequest(format!("Error reading form field: {}", e)))?;
        *received += bytes.len();
        if *received > max_bytes {
            return Err(PortalError::BadRequest(format!(
                "Upload exceeds the {} limit",
                format_bytes(max_bytes as u64)
            )));
        }
        data.extend_from_slice(&bytes);
    }
    Ok(data)
}

fn text(data: Vec<u8>) -> Result<String> {
    String::from_utf8(data)
        .map_err(|_| PortalError::BadRequest("Form text fields must be UTF-8".to_string()))
}

fn upload(
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
) -> Option<UploadedFile> {
    let file_name = file_name.filter(|name| !name.is_empty())?;
    if data.is_empty() {
        return None;
    }

    let file = UploadedFile::new(file_name, data);
    Some(match content_type {
        Some(content_type) => file.with_content_type(content_type),
        None => file,
    })
}

/// Process one submission batch
///
/// Batches are serialized so concurrent requests cannot interleave their log
/// rewrites. Once the form is read the batch runs on its own task, so it
/// finishes even if the client goes away.
pub async fn submit(state: web::Data<AppState>, mut payload: Multipart) -> Result<HttpResponse> {
    let batch = read_batch(&mut payload, state.config.server().max_body_size).await?;
    info!("Submission received for department {:?}", batch.department.trim());

    let processor = state.processor.clone();
    let batch_lock = state.batch_lock.clone();
    let task = actix_web::rt::spawn(async move {
        let _guard = batch_lock.lock().await;
        processor.process(&batch).await
    });
    let outcome = task
        .await
        .map_err(|e| PortalError::Internal(format!("Submission task failed: {}", e)))?;

    match outcome {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report))),
        Err(e) => {
            if !matches!(e, PortalError::Validation(_)) {
                error!("Submission batch failed: {}", e);
            }
            Err(e)
        }
    }
}

/// Download the submission log workbook
pub async fn download_log(state: web::Data<AppState>) -> Result<HttpResponse> {
    let bytes = state
        .log
        .snapshot()
        .await?
        .ok_or_else(|| PortalError::NotFound("No submissions have been logged yet".to_string()))?;

    let file_name = Path::new(&state.config.submission_log().path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "submissions_summary.xlsx".to_string());

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(bytes))
}

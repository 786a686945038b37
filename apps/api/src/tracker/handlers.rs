//! Axum route handlers for the application tracker.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::drafting::artifacts::{
    has_extension, is_bare_file_name, upload_file_name, write_artifact, ArtifactNames,
};
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::StoreError;
use crate::tracker::{Application, ApplicationStatus, STATUS};

const JD_EXTENSIONS: &[&str] = &["txt"];
const RESUME_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TrackedApplication {
    pub index: usize,
    #[serde(flatten)]
    pub application: Application,
}

#[derive(Debug, Serialize)]
pub struct SubmitApplicationResponse {
    pub index: usize,
    pub application: Application,
    pub summary: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<TrackedApplication>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

/// Multipart parts of an application submission; every part is required.
#[derive(Default)]
struct ApplicationForm {
    jd_file: Option<Upload>,
    resume_file: Option<Upload>,
    company_name: Option<String>,
    job_title: Option<String>,
}

impl ApplicationForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ApplicationForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "jd_file" | "resume_file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(e.body_text()))?
                        .to_vec();
                    let upload = Some(Upload { file_name, bytes });
                    if name == "jd_file" {
                        form.jd_file = upload;
                    } else {
                        form.resume_file = upload;
                    }
                }
                "company_name" | "job_title" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.body_text()))?;
                    let text = Some(text.trim().to_string()).filter(|t| !t.is_empty());
                    if name == "company_name" {
                        form.company_name = text;
                    } else {
                        form.job_title = text;
                    }
                }
                // Unknown parts are ignored.
                _ => {}
            }
        }

        Ok(form)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/applications
///
/// Stores the résumé, writes the JD copy, summary and email drafts, and appends a tracker
/// row with status Applied. Resubmitting the same company and title overwrites the
/// drafts and appends another row.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SubmitApplicationResponse>, AppError> {
    let form = ApplicationForm::read(multipart).await?;

    let company_name = form
        .company_name
        .ok_or_else(|| AppError::Validation("company_name is required".to_string()))?;
    let job_title = form
        .job_title
        .ok_or_else(|| AppError::Validation("job_title is required".to_string()))?;
    let jd = form
        .jd_file
        .ok_or_else(|| AppError::Validation("jd_file is required".to_string()))?;
    let resume = form
        .resume_file
        .ok_or_else(|| AppError::Validation("resume_file is required".to_string()))?;

    if !has_extension(&jd.file_name, JD_EXTENSIONS) {
        return Err(AppError::Validation(
            "jd_file must be a .txt file".to_string(),
        ));
    }
    let jd_text = String::from_utf8(jd.bytes)
        .map_err(|_| AppError::Validation("jd_file must be UTF-8 text".to_string()))?;

    let resume_name = upload_file_name(&resume.file_name)
        .filter(|name| has_extension(name, RESUME_EXTENSIONS))
        .ok_or_else(|| {
            AppError::Validation("resume_file must be a .pdf, .docx or .txt file".to_string())
        })?;

    // A tracker that cannot be read must fail the request before any file is written.
    state.tracker.read().await?;

    let config = &state.config;
    let names = ArtifactNames::for_application(&company_name, &job_title);

    write_artifact(&config.data_dir, &resume_name, &resume.bytes).await?;
    write_artifact(&config.outputs_dir, &names.jd, jd_text.as_bytes()).await?;

    let summary = state.drafts.summarize(&jd_text);
    let email = state.drafts.draft_email(&company_name, &job_title);
    write_artifact(&config.outputs_dir, &names.summary, summary.as_bytes()).await?;
    write_artifact(&config.outputs_dir, &names.email, email.as_bytes()).await?;

    let application = Application {
        company: company_name,
        title: job_title,
        status: ApplicationStatus::Applied,
        resume_version: resume_name,
        summary_file: names.summary,
        email_file: names.email,
    };

    let record = application.to_record();
    let index = state
        .tracker
        .modify(move |table| {
            let next = table.append(record)?;
            let index = next.len() - 1;
            Ok((Some(next), index))
        })
        .await?;

    info!(
        "Tracked application #{index}: {} – {}",
        application.company, application.title
    );

    Ok(Json(SubmitApplicationResponse {
        index,
        application,
        summary,
        email,
    }))
}

/// GET /api/v1/applications
///
/// Returns every tracker row in insertion order.
pub async fn handle_list_applications(
    State(state): State<AppState>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let table = state.tracker.read().await?;
    if table.is_empty() {
        debug!("No job applications tracked yet");
    }
    let applications = table
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| {
            Ok(TrackedApplication {
                index,
                application: Application::from_record(record)?,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(Json(ApplicationListResponse { applications }))
}

/// PATCH /api/v1/applications/:index/status
///
/// Sets the status of one tracker row. An unchanged status does not rewrite the file.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<TrackedApplication>, AppError> {
    let status = update.status;

    let application = state
        .tracker
        .modify(move |table| {
            let current = table.get(index).ok_or(StoreError::IndexOutOfRange {
                index,
                len: table.len(),
            })?;
            if current.get(STATUS) == Some(status.as_str()) {
                return Ok((None, Application::from_record(current)?));
            }

            let next = table.update_field(index, STATUS, status.as_str())?;
            let updated = Application::from_record(&next.records()[index])?;
            Ok((Some(next), updated))
        })
        .await?;

    info!(
        "Updated: {} – {} → {}",
        application.company, application.title, application.status
    );

    Ok(Json(TrackedApplication { index, application }))
}

/// GET /api/v1/artifacts/:file_name
///
/// Downloads a generated text file from the outputs directory.
pub async fn handle_download_artifact(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !is_bare_file_name(&file_name) || !has_extension(&file_name, &["txt"]) {
        return Err(AppError::Validation(format!(
            "'{file_name}' is not a downloadable artifact"
        )));
    }

    let path = state.config.outputs_dir.join(&file_name);
    let contents = match tokio::fs::read(&path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("Artifact {file_name} not found")));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to read {}", path.display()))
                .into());
        }
    };

    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, contents))
}

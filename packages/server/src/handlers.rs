use std::path::Path;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use dealdocs_core::archive::build_zip;
use dealdocs_core::config::ARCHIVE_FILE_NAME;
use dealdocs_core::mail::{collect_attachments, parse_mailbox, send_documents, MailAttachment};
use dealdocs_core::{DealValues, DocumentAssembler, RunWorkspace};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMethod {
    Download,
    Mail,
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize)]
pub struct CreateRequest {
    pub values: DealValues,
    pub output_method: OutputMethod,
    #[serde(default)]
    pub email_address: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    if state.assembler.templates_dir().is_dir() {
        Ok("OK")
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Files of one run, read into memory before its workspace is removed.
#[derive(Debug)]
enum Package {
    Archive(Vec<u8>),
    Attachments(Vec<MailAttachment>),
    Nothing,
}

/// Render the deal's documents and deliver them as requested.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateRequest>,
) -> Result<Response, ApiError> {
    let CreateRequest {
        values,
        output_method,
        email_address,
    } = request;

    let assembler = state.assembler.clone();
    let outputs_dir = state.config.outputs_dir.clone();
    let package = tokio::task::spawn_blocking(move || {
        render_package(&assembler, &values, &outputs_dir, output_method)
    })
    .await??;

    match package {
        Package::Archive(bytes) => Ok(download(bytes)),
        Package::Attachments(attachments) => mail(&state, email_address, attachments).await,
        Package::Nothing => Ok((StatusCode::INTERNAL_SERVER_ERROR, "No method").into_response()),
    }
}

/// Render into a fresh run workspace and read back what `method` delivers.
///
/// The workspace lives and dies inside this call, on the blocking pool, so
/// it is removed even when the request future is dropped mid-render.
fn render_package(
    assembler: &DocumentAssembler,
    values: &DealValues,
    outputs_dir: &Path,
    method: OutputMethod,
) -> dealdocs_core::Result<Package> {
    let workspace = RunWorkspace::create_in(outputs_dir)?;
    let result = fill_workspace(assembler, values, workspace.path(), method);

    if let Err(e) = workspace.close() {
        tracing::warn!(error = %e, "failed to remove run workspace");
    }
    result
}

fn fill_workspace(
    assembler: &DocumentAssembler,
    values: &DealValues,
    dir: &Path,
    method: OutputMethod,
) -> dealdocs_core::Result<Package> {
    let report = assembler.assemble(values, dir)?;
    tracing::debug!(documents = report.len(), method = ?method, "documents ready");

    Ok(match method {
        OutputMethod::Download => Package::Archive(build_zip(dir)?),
        OutputMethod::Mail => Package::Attachments(collect_attachments(dir)?),
        OutputMethod::Unknown => Package::Nothing,
    })
}

fn download(bytes: Vec<u8>) -> Response {
    (
        StatusCode::CREATED,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{ARCHIVE_FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

async fn mail(
    state: &AppState,
    email_address: Option<String>,
    attachments: Vec<MailAttachment>,
) -> Result<Response, ApiError> {
    let Some(mailer) = state.mailer.clone() else {
        return Err(ApiError::ServiceUnavailable(
            "mail delivery is not configured".into(),
        ));
    };
    let Some(email) = email_address.filter(|e| !e.trim().is_empty()) else {
        return Err(ApiError::BadRequest("email_address is required".into()));
    };
    parse_mailbox(&email)?;

    let outcome = send_documents(mailer.as_ref(), &email, attachments).await;
    if outcome.is_success() {
        Ok((StatusCode::CREATED, format!("Docs sent to email : {email}")).into_response())
    } else {
        Ok((StatusCode::BAD_GATEWAY, Json(outcome)).into_response())
    }
}

// src/web/handlers.rs
//! Handler bodies for the analyze, CSV export, and health endpoints.

use crate::error::PipelineError;
use crate::extractor::DocumentKind;
use crate::pipeline::{AnalyzeOptions, Pipeline};
use crate::presenter::render_csv;
use crate::web::types::{
    AnalysisData, CsvExport, CsvResponse, CsvStore, DataResponse, ResumeUploadForm,
    StandardErrorResponse, TextResponse,
};
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;
use std::path::Path;
use tracing::{error, info};

pub async fn analyze_resume_handler(
    mut upload: Form<ResumeUploadForm<'_>>,
    pipeline: &State<Pipeline>,
    csv_store: &State<CsvStore>,
) -> Result<Json<DataResponse<AnalysisData>>, Json<StandardErrorResponse>> {
    let filename = upload
        .resume
        .raw_name()
        .and_then(|n| n.as_str())
        .unwrap_or("resume")
        .to_string();

    info!("Received resume upload: {}", filename);

    // Reject unsupported formats before touching the payload.
    let kind = DocumentKind::from_path(Path::new(&filename))
        .map_err(|e| Json(StandardErrorResponse::from(&e)))?;

    let size = upload.resume.len();
    let limit = pipeline.config().max_upload_bytes;
    if size > limit {
        let err = PipelineError::FileTooLarge { size, limit };
        return Err(Json(StandardErrorResponse::from(&err)));
    }

    let extension = match kind {
        DocumentKind::Pdf => "pdf",
        DocumentKind::Docx => "docx",
        DocumentKind::Txt => "txt",
    };
    let temp_path = std::env::temp_dir().join(format!(
        "resume_upload_{}.{}",
        uuid::Uuid::new_v4(),
        extension
    ));

    if let Err(e) = upload.resume.persist_to(&temp_path).await {
        error!("Failed to stage uploaded file: {}", e);
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(Json(StandardErrorResponse::new(
            "Failed to process the uploaded file".to_string(),
            "FILE_SAVE_ERROR".to_string(),
            vec!["Try uploading the file again".to_string()],
        )));
    }

    let options = AnalyzeOptions {
        location: upload.location.clone().unwrap_or_default(),
        top: upload.top,
        source: upload.source.clone(),
    };

    let result = pipeline.analyze_file(&temp_path, &options).await;

    // The staged upload is gone after this point on every path.
    let _ = tokio::fs::remove_file(&temp_path).await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Resume analysis failed: {}", e);
            return Err(Json(StandardErrorResponse::from(&e)));
        }
    };

    match render_csv(&outcome) {
        Ok(bytes) => {
            *csv_store.export.write().await = Some(CsvExport::new(bytes));
        }
        Err(e) => {
            // The ranking still stands; only the export is unavailable.
            error!("Failed to render CSV export: {:#}", e);
            *csv_store.export.write().await = None;
        }
    }

    let message = if outcome.no_results {
        "Resume analyzed successfully, but no jobs found for the current query".to_string()
    } else {
        format!(
            "Resume analyzed and {} jobs ranked successfully",
            outcome.jobs.len()
        )
    };

    Ok(Json(DataResponse::success(
        message,
        AnalysisData::from_outcome(&outcome),
    )))
}

pub async fn export_csv_handler(
    csv_store: &State<CsvStore>,
) -> Result<CsvResponse, Json<StandardErrorResponse>> {
    let export = csv_store.export.read().await;
    match export.as_ref() {
        Some(export) => Ok(CsvResponse {
            data: export.data.clone(),
            filename: export.filename.clone(),
        }),
        None => Err(Json(StandardErrorResponse::new(
            "No ranking has been computed yet".to_string(),
            "NO_EXPORT_AVAILABLE".to_string(),
            vec!["Upload a resume first, then download the CSV".to_string()],
        ))),
    }
}

pub async fn health_handler() -> Json<TextResponse> {
    Json(TextResponse::success("OK".to_string()))
}

// src/web/mod.rs
//! Rocket web boundary: multipart resume upload, CSV export of the last
//! ranking, and a health probe. Thin over the shared [`Pipeline`].

pub mod handlers;
pub mod types;

pub use types::*;

use crate::pipeline::Pipeline;
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/analyze", data = "<upload>")]
pub async fn analyze_resume(
    upload: Form<ResumeUploadForm<'_>>,
    pipeline: &State<Pipeline>,
    csv_store: &State<CsvStore>,
) -> Result<Json<DataResponse<AnalysisData>>, Json<StandardErrorResponse>> {
    handlers::analyze_resume_handler(upload, pipeline, csv_store).await
}

#[get("/export.csv")]
pub async fn export_csv(
    csv_store: &State<CsvStore>,
) -> Result<CsvResponse, Json<StandardErrorResponse>> {
    handlers::export_csv_handler(csv_store).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Send the resume as multipart form data in the `resume` field".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Uploaded file is too large".to_string(),
        "FILE_TOO_LARGE".to_string(),
        vec!["Reduce the resume file size before uploading".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
    ))
}

/// Start the API server around an already-built pipeline.
pub async fn start_web_server(pipeline: Pipeline, port: u16) -> Result<()> {
    // Leave headroom above the app-level size check so that oversized
    // uploads get the specific FileTooLarge message, not a bare 413.
    let upload_limit = (pipeline.config().max_upload_bytes + 1024 * 1024).bytes();
    let figment = rocket::Config::figment().merge(("port", port)).merge((
        "limits",
        Limits::default()
            .limit("file", upload_limit)
            .limit("data-form", upload_limit),
    ));

    info!("Starting job recommendation API server on port {}", port);

    let _rocket = rocket::custom(figment)
        .attach(Cors)
        .manage(pipeline)
        .manage(CsvStore::default())
        .register(
            "/api",
            catchers![bad_request, payload_too_large, internal_error],
        )
        .mount(
            "/api",
            routes![analyze_resume, export_csv, health, all_options],
        )
        .launch()
        .await?;

    Ok(())
}

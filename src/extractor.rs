// src/extractor.rs
//! Resume text extraction for the supported document formats.
//!
//! The format is decided from the extension alone, before any I/O, so an
//! unsupported upload is rejected without touching the file contents.
//! PDF text is pulled page by page with lopdf; DOCX goes through a pandoc
//! conversion to plain text; TXT is decoded as UTF-8 with a lossy fallback.

use crate::error::{PipelineError, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

const PANDOC_TIMEOUT_SECS: u64 = 60;

/// Closed set of supported resume formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Classify a path by its extension. Pure; performs no I/O.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            "" => Err(PipelineError::UnsupportedFormat(format!(
                "{} has no extension",
                path.display()
            ))),
            other => Err(PipelineError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

/// Extract the resume text from a file on disk.
///
/// Fails with `FileTooLarge` above `max_bytes` and with `ExtractionFailed`
/// when the document yields no readable text.
pub async fn extract_resume_text(path: &Path, max_bytes: u64) -> Result<String> {
    let kind = DocumentKind::from_path(path)?;

    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        PipelineError::ExtractionFailed(format!("cannot read {}: {}", path.display(), e))
    })?;
    if metadata.len() > max_bytes {
        return Err(PipelineError::FileTooLarge {
            size: metadata.len(),
            limit: max_bytes,
        });
    }

    debug!("Extracting {:?} resume from {}", kind, path.display());

    let text = match kind {
        DocumentKind::Pdf => extract_pdf(path).await?,
        DocumentKind::Docx => extract_docx(path).await?,
        DocumentKind::Txt => {
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                PipelineError::ExtractionFailed(format!("cannot read {}: {}", path.display(), e))
            })?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
    };

    if text.trim().is_empty() {
        return Err(PipelineError::ExtractionFailed(
            "document contains no readable text".to_string(),
        ));
    }

    info!("Extracted {} characters from {}", text.len(), path.display());
    Ok(text.trim().to_string())
}

async fn extract_pdf(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let document = lopdf::Document::load(&path)
            .map_err(|e| PipelineError::ExtractionFailed(format!("PDF parse error: {}", e)))?;

        let mut text = String::new();
        for (page_no, _) in document.get_pages() {
            let page_text = document
                .extract_text(&[page_no])
                .map_err(|e| PipelineError::ExtractionFailed(format!("PDF parse error: {}", e)))?;
            if !page_text.trim().is_empty() {
                text.push_str(page_text.trim());
                text.push('\n');
            }
        }

        if text.trim().is_empty() {
            return Err(PipelineError::ExtractionFailed(
                "PDF has no extractable text (scanned image?)".to_string(),
            ));
        }
        Ok(text)
    })
    .await
    .map_err(|e| PipelineError::ExtractionFailed(format!("extraction task failed: {}", e)))?
}

async fn extract_docx(path: &Path) -> Result<String> {
    let mut cmd = Command::new("pandoc");
    cmd.arg(path).args(["-f", "docx", "-t", "plain"]);

    let output = tokio::time::timeout(
        std::time::Duration::from_secs(PANDOC_TIMEOUT_SECS),
        cmd.output(),
    )
    .await
    .map_err(|_| {
        PipelineError::ExtractionFailed(format!(
            "DOCX conversion timed out after {}s",
            PANDOC_TIMEOUT_SECS
        ))
    })?
    .map_err(|e| PipelineError::ExtractionFailed(format!("cannot run pandoc: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PipelineError::ExtractionFailed(format!(
            "pandoc failed (exit {}): {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

//! Single-document analysis handlers.

use axum::{http::StatusCode, Json};
use serde::Deserialize;

use texcite_core::{analyze_document, DocumentAnalysis};

/// Largest document accepted for inline analysis, in bytes.
pub const MAX_DOCUMENT_BYTES: usize = 1024 * 1024;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

pub async fn analyze(
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<DocumentAnalysis>, (StatusCode, String)> {
    if req.text.len() > MAX_DOCUMENT_BYTES {
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("Document exceeds {} bytes", MAX_DOCUMENT_BYTES),
        ));
    }

    Ok(Json(analyze_document(&req.text)))
}

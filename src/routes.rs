use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::error;

use crate::compose::CertificateRequest;
use crate::error::PipelineError;
use crate::pipeline::GeneratedDocument;
use crate::state::AppState;
use crate::{mail, pipeline, storage};

/// POST /generate-pdf: render a certificate and return its download URL.
/// The QR code inside the document encodes that same URL.
pub async fn generate_pdf(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CertificateRequest>,
) -> impl IntoResponse {
    if request.has_empty_field() {
        return (StatusCode::BAD_REQUEST, "All fields are required.").into_response();
    }

    let filename = storage::unique_document_name();
    let pdf_url = format!("{}/output/{}", state.config.public_base_url, filename);

    match run_pipeline(&state, request, filename, pdf_url.clone()).await {
        Ok(_) => Json(serde_json::json!({
            "message": "PDF generated successfully",
            "pdfDownloadUrl": pdf_url,
        }))
        .into_response(),
        Err(err) => {
            error!(%err, "certificate pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while generating the PDF.",
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(flatten)]
    pub certificate: CertificateRequest,
}

/// POST /send-email: render a certificate and deliver it as an attachment.
/// In this variant the QR code encodes the service root rather than a
/// per-document URL.
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendEmailRequest>,
) -> impl IntoResponse {
    if request.email.trim().is_empty()
        || request.customer_name.trim().is_empty()
        || request.certificate.has_empty_field()
    {
        return (StatusCode::BAD_REQUEST, "All fields are required.").into_response();
    }

    let filename = storage::unique_document_name();
    let verify_url = state.config.public_base_url.clone();

    let document =
        match run_pipeline(&state, request.certificate, filename, verify_url).await {
            Ok(document) => document,
            Err(err) => {
                error!(%err, "certificate pipeline failed");
                return internal_error();
            }
        };

    let sent = mail::dispatch(
        &state.config.smtp,
        state.mailer.as_ref(),
        &state.config.assets_folder,
        &request.email,
        &request.customer_name,
        &document,
    )
    .await;

    match sent {
        Ok(()) => Json(serde_json::json!({
            "message": "Email sent successfully with PDF attachment!",
        }))
        .into_response(),
        Err(err) => {
            error!(%err, "certificate delivery failed");
            internal_error()
        }
    }
}

/// The synchronous render runs under `spawn_blocking` so it only suspends
/// its own request, never the runtime.
async fn run_pipeline(
    state: &Arc<AppState>,
    request: CertificateRequest,
    filename: String,
    verify_url: String,
) -> Result<GeneratedDocument, PipelineError> {
    let config = state.config.clone();
    let renderer = state.renderer.clone();

    tokio::task::spawn_blocking(move || {
        pipeline::generate(
            &config.assets_folder,
            &config.output_folder,
            renderer.as_ref(),
            &request,
            &filename,
            &verify_url,
        )
    })
    .await
    .map_err(PipelineError::render)?
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An error occurred while processing your request.",
    )
        .into_response()
}

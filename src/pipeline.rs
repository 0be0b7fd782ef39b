use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::assets::AssetBundle;
use crate::compose::{compose, CertificateRequest};
use crate::error::PipelineError;
use crate::qr::VerificationCode;
use crate::render::{render_markup, DocumentRenderer};

/// The rendered artifact: where it landed and when it was created.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub path: PathBuf,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

/// Runs one full render: load assets, generate the verification code,
/// compose the page, render it, persist the PDF. The caller picks the
/// output filename and the URL the QR code encodes (the per-document
/// download URL, or the service root for the email variant).
///
/// Synchronous by design; callers on the runtime wrap it in
/// `spawn_blocking`. Nothing is written to disk until the render has
/// fully succeeded.
pub fn generate(
    assets_folder: &Path,
    output_folder: &Path,
    renderer: &dyn DocumentRenderer,
    request: &CertificateRequest,
    filename: &str,
    verification_url: &str,
) -> Result<GeneratedDocument, PipelineError> {
    let assets = AssetBundle::load(assets_folder)?;
    let code = VerificationCode::for_url(verification_url)?;
    let page = compose(request, &assets, &code)?;

    let bytes = render_markup(renderer, page.markup())?;

    let path = output_folder.join(filename);
    std::fs::write(&path, &bytes).map_err(PipelineError::render)?;

    let document = GeneratedDocument {
        path,
        filename: filename.to_string(),
        created_at: Utc::now(),
    };
    info!(
        filename,
        size = bytes.len(),
        verification_url = code.url(),
        created_at = %document.created_at,
        "certificate rendered"
    );

    Ok(document)
}

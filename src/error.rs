use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds of the certificate pipeline. Every variant aborts the
/// remaining stages for the current request; none is retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A fixed image resource is missing or unreadable. Raised before any
    /// rendering starts, so no partial document is ever written.
    #[error("asset unreadable: {path}")]
    AssetUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The verification URL could not be encoded into a QR image.
    #[error("verification code generation failed: {0}")]
    CodeGeneration(String),

    /// Context acquisition, content load, or PDF export failed. The
    /// rendering context is still released before this surfaces.
    #[error("render engine failure: {0}")]
    RenderEngine(String),

    /// Transport-level mail failure (bad recipient, auth rejection,
    /// connection fault). The rendered document stays on disk.
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

impl PipelineError {
    pub fn render<E: std::fmt::Display>(err: E) -> Self {
        Self::RenderEngine(err.to_string())
    }

    pub fn delivery<E: std::fmt::Display>(err: E) -> Self {
        Self::Delivery(err.to_string())
    }
}

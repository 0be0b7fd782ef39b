use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::PipelineError;

/// The five fixed image resources every certificate embeds, each already
/// encoded as a `data:` URI ready for inlining into the page markup.
///
/// The signature image is loaded with the rest of the bundle but the layout
/// only shows the stamp next to the signature caption; that asymmetry comes
/// from the issued certificate design and is kept as-is.
#[derive(Debug)]
pub struct AssetBundle {
    pub left_logo: String,
    pub right_logo: String,
    pub signature: String,
    pub stamp: String,
    pub pattern: String,
}

impl AssetBundle {
    /// Reads all five resources from `dir`. Fails with `AssetUnreadable` on
    /// the first missing or unreadable member, before any rendering starts.
    pub fn load(dir: &Path) -> Result<Self, PipelineError> {
        Ok(Self {
            left_logo: read_data_uri(dir, "left-logo.png")?,
            right_logo: read_data_uri(dir, "right-logo.png")?,
            signature: read_data_uri(dir, "signature.png")?,
            stamp: read_data_uri(dir, "stamp.png")?,
            pattern: read_data_uri(dir, "pattern.png")?,
        })
    }
}

pub fn read_data_uri(dir: &Path, name: &str) -> Result<String, PipelineError> {
    let path = dir.join(name);
    let bytes = std::fs::read(&path)
        .map_err(|source| PipelineError::AssetUnreadable { path, source })?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
}

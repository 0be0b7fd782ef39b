use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

/// Unique output filename: millisecond timestamp plus a short random
/// suffix, so two requests landing in the same clock tick still get
/// distinct paths.
pub fn unique_document_name() -> String {
    format!(
        "certificate_{}_{}.pdf",
        Utc::now().timestamp_millis(),
        &Uuid::new_v4().simple().to_string()[..8]
    )
}

pub fn ensure_dirs(assets_folder: &Path, output_folder: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(assets_folder)?;
    std::fs::create_dir_all(output_folder)?;
    Ok(())
}

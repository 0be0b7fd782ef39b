use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{ImageFormat, Luma};
use qrcode::QrCode;

use crate::error::PipelineError;

// Rendered large enough that the 100px display slot in the certificate
// footer still scans reliably after print scaling.
const MIN_DIMENSIONS: u32 = 300;

/// A scannable QR image encoding a verification URL, held as a PNG data URI
/// for inlining into the page markup.
#[derive(Debug)]
pub struct VerificationCode {
    url: String,
    data_uri: String,
}

impl VerificationCode {
    pub fn for_url(url: &str) -> Result<Self, PipelineError> {
        let code = QrCode::new(url.as_bytes())
            .map_err(|e| PipelineError::CodeGeneration(e.to_string()))?;
        let img = code
            .render::<Luma<u8>>()
            .min_dimensions(MIN_DIMENSIONS, MIN_DIMENSIONS)
            .build();

        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| PipelineError::CodeGeneration(e.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            data_uri: format!("data:image/png;base64,{}", BASE64.encode(&png)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_url_as_png_data_uri() {
        let code = VerificationCode::for_url("http://localhost:6000").unwrap();
        assert!(code.data_uri().starts_with("data:image/png;base64,"));
        assert_eq!(code.url(), "http://localhost:6000");
    }

    #[test]
    fn decodes_back_to_exact_url() {
        let url = "http://localhost:6000/output/certificate_1700000000000_ab12cd34.pdf";
        let code = VerificationCode::for_url(url).unwrap();

        let b64 = code
            .data_uri()
            .strip_prefix("data:image/png;base64,")
            .unwrap();
        let png = BASE64.decode(b64).unwrap();
        let gray = image::load_from_memory(&png).unwrap().to_luma8();

        let mut prepared = rqrr::PreparedImage::prepare(gray);
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);
        let (_, content) = grids[0].decode().unwrap();
        assert_eq!(content, url);
    }

    #[test]
    fn oversized_payload_is_code_generation_error() {
        // QR version 40 tops out well below this.
        let url = "x".repeat(8000);
        let err = VerificationCode::for_url(&url).unwrap_err();
        assert!(matches!(err, PipelineError::CodeGeneration(_)));
    }
}

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tera::Context;

use crate::assets::AssetBundle;
use crate::error::PipelineError;
use crate::qr::VerificationCode;
use crate::templates::get_tera;

/// One certificate request as received over the wire. Every field is
/// rendered verbatim into the page; the fees value additionally gets the
/// fixed currency suffix in the template.
///
/// Fields default to empty so an absent field reaches the route layer's
/// required-field check instead of being rejected at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateRequest {
    pub membership_number: String,
    pub national_number: String,
    pub company_name: String,
    pub owner_name: String,
    pub address: String,
    pub branches: String,
    pub capital: String,
    pub category: String,
    pub sector: String,
    pub business_type: String,
    pub fees_paid: String,
    pub receipt_number: String,
    pub issue_date: String,
    pub valid_until: String,
}

impl CertificateRequest {
    /// Required-field check done by the route layer before the pipeline runs.
    pub fn has_empty_field(&self) -> bool {
        [
            &self.membership_number,
            &self.national_number,
            &self.company_name,
            &self.owner_name,
            &self.address,
            &self.branches,
            &self.capital,
            &self.category,
            &self.sector,
            &self.business_type,
            &self.fees_paid,
            &self.receipt_number,
            &self.issue_date,
            &self.valid_until,
        ]
        .iter()
        .any(|f| f.trim().is_empty())
    }
}

/// The fully resolved one-page A4 RTL layout: request fields, inlined
/// assets and QR code merged into final markup. Purely derived, one per
/// request.
pub struct PageDescription {
    markup: String,
}

impl PageDescription {
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// Merges request data, assets and the verification code into the page
/// markup. No I/O: assets are not re-read and the code is not regenerated.
pub fn compose(
    request: &CertificateRequest,
    assets: &AssetBundle,
    code: &VerificationCode,
) -> Result<PageDescription, PipelineError> {
    let mut ctx = Context::new();
    ctx.insert("membership_number", &request.membership_number);
    ctx.insert("national_number", &request.national_number);
    ctx.insert("company_name", &request.company_name);
    ctx.insert("owner_name", &request.owner_name);
    ctx.insert("address", &request.address);
    ctx.insert("branches", &request.branches);
    ctx.insert("capital", &request.capital);
    ctx.insert("category", &request.category);
    ctx.insert("sector", &request.sector);
    ctx.insert("business_type", &request.business_type);
    ctx.insert("fees_paid", &request.fees_paid);
    ctx.insert("receipt_number", &request.receipt_number);
    ctx.insert("issue_date", &request.issue_date);
    ctx.insert("valid_until", &request.valid_until);
    ctx.insert("year", &Utc::now().year());

    ctx.insert("left_logo", &assets.left_logo);
    ctx.insert("right_logo", &assets.right_logo);
    ctx.insert("stamp", &assets.stamp);
    ctx.insert("pattern", &assets.pattern);
    // In scope but unused by the layout: only the stamp appears next to
    // the signature caption.
    ctx.insert("signature", &assets.signature);
    ctx.insert("qr_code", &code.data_uri());

    let markup = get_tera()
        .render("certificate.html", &ctx)
        .map_err(|e| PipelineError::RenderEngine(e.to_string()))?;

    Ok(PageDescription { markup })
}

#[cfg(test)]
pub(crate) fn sample_request() -> CertificateRequest {
    CertificateRequest {
        membership_number: "12345".into(),
        national_number: "200012345".into(),
        company_name: "شركة الاختبار".into(),
        owner_name: "مالك تجريبي".into(),
        address: "عمان - وسط البلد".into(),
        branches: "لا يوجد".into(),
        capital: "10000".into(),
        category: "ثانية".into(),
        sector: "تجارة عامة".into(),
        business_type: "بيع مواد غذائية".into(),
        fees_paid: "50".into(),
        receipt_number: "R-889".into(),
        issue_date: "2024-01-01".into(),
        valid_until: "2024-12-31".into(),
    }
}

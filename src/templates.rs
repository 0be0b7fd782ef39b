use std::sync::OnceLock;
use tera::Tera;

static TERA: OnceLock<Tera> = OnceLock::new();

/// Both templates are compiled into the binary so that composition never
/// touches the filesystem at request time.
pub fn get_tera() -> &'static Tera {
    TERA.get_or_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_templates([
            ("certificate.html", include_str!("../templates/certificate.html")),
            ("email.html", include_str!("../templates/email.html")),
        ])
        .expect("built-in templates must parse");
        tera
    })
}

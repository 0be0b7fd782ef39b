use std::path::PathBuf;

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// Plain connection upgraded with STARTTLS (port 587 style).
    StartTls,
    /// TLS from the first byte (port 465 style).
    Wrapper,
    /// No transport security; local relays and tests only.
    None,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub tls: SmtpTls,
}

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// External base URL used to build verification and download links.
    pub public_base_url: String,
    pub assets_folder: PathBuf,
    pub output_folder: PathBuf,
    pub smtp: SmtpConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "6000".to_string())
            .parse()
            .unwrap_or(6000);

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let assets_folder = base_dir.join(
            std::env::var("ASSETS_FOLDER").unwrap_or_else(|_| "assets".to_string()),
        );
        let output_folder = base_dir.join(
            std::env::var("OUTPUT_FOLDER").unwrap_or_else(|_| "output".to_string()),
        );

        let smtp_host =
            std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let smtp_port: u16 = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .unwrap_or(587);
        let smtp_username =
            std::env::var("SMTP_USERNAME").map_err(|_| "SMTP_USERNAME must be set")?;
        let smtp_password =
            std::env::var("SMTP_PASSWORD").map_err(|_| "SMTP_PASSWORD must be set")?;
        let smtp_from = std::env::var("SMTP_FROM").unwrap_or_else(|_| smtp_username.clone());
        let smtp_tls = match std::env::var("SMTP_TLS").as_deref() {
            Ok("tls") => SmtpTls::Wrapper,
            Ok("none") => SmtpTls::None,
            _ => SmtpTls::StartTls,
        };

        Ok(Self {
            host,
            port,
            public_base_url,
            assets_folder,
            output_folder,
            smtp: SmtpConfig {
                host: smtp_host,
                port: smtp_port,
                username: smtp_username,
                password: smtp_password,
                from: smtp_from,
                tls: smtp_tls,
            },
        })
    }
}

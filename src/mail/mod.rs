use std::path::Path;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tera::Context;
use tracing::info;

use crate::config::{SmtpConfig, SmtpTls};
use crate::error::PipelineError;
use crate::pipeline::GeneratedDocument;
use crate::templates::get_tera;

const SUBJECT: &str = "Your Certificate from Amman Chamber of Commerce";
// The attachment name is fixed regardless of the on-disk filename.
const ATTACHMENT_NAME: &str = "certificate.pdf";
const INLINE_LOGO_CID: &str = "brand-logo";

/// Mail submission capability. The production implementation speaks SMTP;
/// tests swap in a recording fake.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn submit(&self, message: Message) -> Result<(), PipelineError>;
}

/// SMTP transport configured once at startup from the immutable config.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn from_config(
        smtp: &SmtpConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let builder = match smtp.tls {
            SmtpTls::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
            }
            SmtpTls::Wrapper => AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?,
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host),
        };

        let transport = builder
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn submit(&self, message: Message) -> Result<(), PipelineError> {
        self.transport
            .send(message)
            .await
            .map_err(PipelineError::delivery)?;
        Ok(())
    }
}

/// Composes the notification message and submits it once. Any fault —
/// malformed recipient, unreadable attachment, transport rejection —
/// surfaces as `Delivery`; the rendered document stays on disk either way.
pub async fn dispatch(
    smtp: &SmtpConfig,
    transport: &dyn MailTransport,
    assets_folder: &Path,
    recipient: &str,
    customer_name: &str,
    document: &GeneratedDocument,
) -> Result<(), PipelineError> {
    let to: Mailbox = recipient
        .parse()
        .map_err(|_| PipelineError::Delivery(format!("invalid recipient address: {recipient}")))?;
    let from: Mailbox = smtp
        .from
        .parse()
        .map_err(|_| PipelineError::Delivery(format!("invalid sender address: {}", smtp.from)))?;

    let pdf = tokio::fs::read(&document.path)
        .await
        .map_err(PipelineError::delivery)?;
    let logo = tokio::fs::read(assets_folder.join("logo.png"))
        .await
        .map_err(PipelineError::delivery)?;

    let mut ctx = Context::new();
    ctx.insert("customer_name", customer_name);
    ctx.insert("year", &Utc::now().year());
    let body = get_tera()
        .render("email.html", &ctx)
        .map_err(PipelineError::delivery)?;

    let png = ContentType::parse("image/png").map_err(PipelineError::delivery)?;
    let pdf_type = ContentType::parse("application/pdf").map_err(PipelineError::delivery)?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(SUBJECT)
        .multipart(
            MultiPart::mixed()
                .multipart(
                    MultiPart::related()
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_HTML)
                                .body(body),
                        )
                        .singlepart(
                            Attachment::new_inline(INLINE_LOGO_CID.to_string()).body(logo, png),
                        ),
                )
                .singlepart(Attachment::new(ATTACHMENT_NAME.to_string()).body(pdf, pdf_type)),
        )
        .map_err(PipelineError::delivery)?;

    transport.submit(message).await?;
    info!(recipient, filename = %document.filename, "certificate delivered");
    Ok(())
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::sync::Mutex;

    pub(crate) fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: "issuer@example.com".into(),
            password: "app-secret".into(),
            from: "issuer@example.com".into(),
            tls: SmtpTls::StartTls,
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingTransport {
        pub(crate) sent: Mutex<Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn submit(&self, message: Message) -> Result<(), PipelineError> {
            self.sent.lock().unwrap().push(message.formatted());
            Ok(())
        }
    }

    pub(crate) struct RejectingTransport;

    #[async_trait]
    impl MailTransport for RejectingTransport {
        async fn submit(&self, _message: Message) -> Result<(), PipelineError> {
            Err(PipelineError::Delivery("550 mailbox unavailable".into()))
        }
    }
}

use std::sync::Arc;

use crate::config::Config;
use crate::mail::MailTransport;
use crate::render::DocumentRenderer;

pub struct AppState {
    pub config: Arc<Config>,
    pub renderer: Arc<dyn DocumentRenderer>,
    pub mailer: Arc<dyn MailTransport>,
}

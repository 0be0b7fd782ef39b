use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};

use super::{DocumentRenderer, RenderSession};
use crate::error::PipelineError;

// A4 in inches, matching Chromium's printToPDF units.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

/// Production renderer backed by headless Chromium. Each session launches
/// its own isolated browser process, so concurrent requests never share a
/// rendering context.
pub struct ChromeRenderer;

impl ChromeRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChromeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for ChromeRenderer {
    fn open_session(&self) -> Result<Box<dyn RenderSession>, PipelineError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .map_err(PipelineError::render)?;
        let browser = Browser::new(options).map_err(PipelineError::render)?;
        let tab = browser.new_tab().map_err(PipelineError::render)?;

        Ok(Box::new(ChromeSession {
            browser: Some(browser),
            tab: Some(tab),
        }))
    }
}

struct ChromeSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
}

impl ChromeSession {
    fn tab(&self) -> Result<&Arc<Tab>, PipelineError> {
        self.tab
            .as_ref()
            .ok_or_else(|| PipelineError::RenderEngine("rendering context already closed".into()))
    }
}

impl RenderSession for ChromeSession {
    fn load_markup(&mut self, markup: &str) -> Result<(), PipelineError> {
        // All images are already inlined as data URIs, so the whole page
        // can itself travel as a data URL; no server round-trip needed.
        let url = format!(
            "data:text/html;charset=utf-8;base64,{}",
            BASE64.encode(markup)
        );
        self.tab()?.navigate_to(&url).map_err(PipelineError::render)?;
        Ok(())
    }

    fn wait_until_loaded(&mut self) -> Result<(), PipelineError> {
        // Equivalent of domcontentloaded: the page has no network fetches
        // left, so waiting for navigation is enough.
        self.tab()?
            .wait_until_navigated()
            .map_err(PipelineError::render)?;
        Ok(())
    }

    fn export_pdf(&mut self) -> Result<Vec<u8>, PipelineError> {
        let options = PrintToPdfOptions {
            print_background: Some(true),
            prefer_css_page_size: Some(true),
            paper_width: Some(A4_WIDTH_IN),
            paper_height: Some(A4_HEIGHT_IN),
            margin_top: Some(0.0),
            margin_bottom: Some(0.0),
            margin_left: Some(0.0),
            margin_right: Some(0.0),
            ..Default::default()
        };
        self.tab()?
            .print_to_pdf(Some(options))
            .map_err(PipelineError::render)
    }

    fn close(&mut self) {
        self.tab = None;
        // Dropping the browser tears down the Chromium child process.
        self.browser = None;
    }
}

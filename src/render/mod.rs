mod chrome;

pub use chrome::ChromeRenderer;

use crate::error::PipelineError;

/// One live rendering context: an isolated environment that can load markup
/// and export it as a fixed-size paginated PDF.
pub trait RenderSession: Send {
    /// Loads the page markup into the context's single tab.
    fn load_markup(&mut self, markup: &str) -> Result<(), PipelineError>;

    /// Waits for the DOM to be fully parsed. All images are inlined, so
    /// there is nothing to wait for at the network level.
    fn wait_until_loaded(&mut self) -> Result<(), PipelineError>;

    /// Exports the loaded page as an A4 PDF with background graphics.
    fn export_pdf(&mut self) -> Result<Vec<u8>, PipelineError>;

    /// Tears the context down. Called on every path, success or failure.
    fn close(&mut self);
}

/// Something that can hand out rendering contexts. The production
/// implementation launches headless Chromium; tests substitute fakes.
pub trait DocumentRenderer: Send + Sync {
    fn open_session(&self) -> Result<Box<dyn RenderSession>, PipelineError>;
}

/// Drives one render: acquire, load, wait, export, release. The session is
/// closed no matter which step fails.
pub fn render_markup(
    renderer: &dyn DocumentRenderer,
    markup: &str,
) -> Result<Vec<u8>, PipelineError> {
    let mut session = renderer.open_session()?;

    let result = session
        .load_markup(markup)
        .and_then(|_| session.wait_until_loaded())
        .and_then(|_| session.export_pdf());

    session.close();
    result
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// Which renderer step, if any, should fail.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub enum FailAt {
        Nowhere,
        Acquire,
        Load,
        Wait,
        Export,
    }

    pub struct FakeRenderer {
        pub fail_at: FailAt,
        pub closed: Arc<AtomicBool>,
        pub last_markup: Arc<Mutex<Option<String>>>,
    }

    impl FakeRenderer {
        pub fn new(fail_at: FailAt) -> Self {
            Self {
                fail_at,
                closed: Arc::new(AtomicBool::new(false)),
                last_markup: Arc::new(Mutex::new(None)),
            }
        }

        pub fn was_closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }
    }

    struct FakeSession {
        fail_at: FailAt,
        closed: Arc<AtomicBool>,
        last_markup: Arc<Mutex<Option<String>>>,
    }

    impl DocumentRenderer for FakeRenderer {
        fn open_session(&self) -> Result<Box<dyn RenderSession>, PipelineError> {
            if self.fail_at == FailAt::Acquire {
                return Err(PipelineError::RenderEngine("launch refused".into()));
            }
            Ok(Box::new(FakeSession {
                fail_at: self.fail_at,
                closed: self.closed.clone(),
                last_markup: self.last_markup.clone(),
            }))
        }
    }

    impl RenderSession for FakeSession {
        fn load_markup(&mut self, markup: &str) -> Result<(), PipelineError> {
            *self.last_markup.lock().unwrap() = Some(markup.to_string());
            if self.fail_at == FailAt::Load {
                return Err(PipelineError::RenderEngine("load failed".into()));
            }
            Ok(())
        }

        fn wait_until_loaded(&mut self) -> Result<(), PipelineError> {
            if self.fail_at == FailAt::Wait {
                return Err(PipelineError::RenderEngine("dom never settled".into()));
            }
            Ok(())
        }

        fn export_pdf(&mut self) -> Result<Vec<u8>, PipelineError> {
            if self.fail_at == FailAt::Export {
                return Err(PipelineError::RenderEngine("export failed".into()));
            }
            Ok(b"%PDF-1.7 fake".to_vec())
        }

        fn close(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }
}

//! Editor session: the one owner of all editor state.
//!
//! # Responsibility
//! - Own the text buffer, its store, the scroll coordinator and every view
//!   that follows the scroll scalar.
//! - Route host events (text edits, wheel/touch, resize, frames, file
//!   import/export) to the component that handles them.
//!
//! # Invariants
//! - Scroll changes reach the animator, text transform and logo before the
//!   input handler returns, so the next frame reads the new scalar.
//! - Every text change is persisted before the call returns.
//! - Import failures leave the buffer untouched.
//!
//! # See also
//! - `crate::scroll::coordinator` for the lock and sign conventions.

use crate::config::CrawlConfig;
use crate::repo::text_repo::{RepoError, TextRepository};
use crate::scroll::coordinator::{ScrollCoordinator, ScrollObserver, WheelOutcome};
use crate::scroll::views::{crawl_lines, LogoVisibility, TextPanelTransform};
use crate::starfield::animator::{FrameOutcome, StarfieldAnimator};
use crate::starfield::render::RenderTarget;
use crate::text::buffer::TextBuffer;
use crate::text::file_io::{self, ExportedFile, ImportError};
use chrono::{DateTime, Local, TimeZone};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Text shown when nothing usable is stored.
pub const DEFAULT_TEXT: &str = "# A Long Time Ago\n\n\
Type into the editor and your words\n\
drift off into the stars\n\
like an opening crawl.\n\n\
Go ahead, edit me!";

#[derive(Debug)]
pub enum SessionError {
    Store(RepoError),
    Import(ImportError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "could not save text: {err}"),
            Self::Import(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Import(err) => Some(err),
        }
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<ImportError> for SessionError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

pub struct EditorSession<S: TextRepository> {
    config: CrawlConfig,
    store: S,
    buffer: TextBuffer,
    coordinator: ScrollCoordinator,
    animator: StarfieldAnimator,
    transform: TextPanelTransform,
    logo: LogoVisibility,
}

impl<S: TextRepository> EditorSession<S> {
    /// Opens a session, restoring the stored text or falling back to
    /// `DEFAULT_TEXT` when the store is empty or unreadable.
    ///
    /// A config that fails `CrawlConfig::validate` is replaced by the
    /// defaults.
    pub fn open(store: S, config: CrawlConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!(
                    "event=session_open module=session status=fallback source=default_config error={}",
                    err
                );
                CrawlConfig::default()
            }
        };
        let text = match store.load() {
            Ok(Some(text)) => text,
            Ok(None) => {
                info!("event=session_open module=session status=ok source=default");
                DEFAULT_TEXT.to_string()
            }
            Err(err) => {
                warn!(
                    "event=session_open module=session status=fallback source=default error={}",
                    err
                );
                DEFAULT_TEXT.to_string()
            }
        };

        let coordinator = ScrollCoordinator::new(&config.scroll);
        let initial_scalar = coordinator.scalar();
        Self {
            animator: StarfieldAnimator::new(config.starfield.clone()),
            transform: TextPanelTransform::new(&config.scroll),
            logo: LogoVisibility::new(config.scroll.logo_threshold, initial_scalar),
            buffer: TextBuffer::new(text),
            coordinator,
            store,
            config,
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Crawl rows for the text panel.
    pub fn lines(&self) -> Vec<String> {
        crawl_lines(self.buffer.text())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -- text -------------------------------------------------------------

    /// Replaces the buffer after an edit and persists it.
    ///
    /// The buffer is updated even when saving fails; the error is returned
    /// so the host can tell the user.
    pub fn set_text(&mut self, text: impl Into<String>, cursor: usize) -> Result<(), SessionError> {
        self.buffer.replace(text);
        self.buffer.set_cursor(cursor);
        self.persist()
    }

    /// Empties the buffer and removes the stored entry.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.buffer.clear();
        self.store.clear().map_err(|err| {
            error!("event=text_clear module=session status=error error={err}");
            SessionError::from(err)
        })?;
        info!("event=text_clear module=session status=ok");
        Ok(())
    }

    /// Imports an in-memory file, replacing the buffer on success.
    pub fn import_file(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), SessionError> {
        let text = file_io::import_text(file_name, bytes, &self.config.import)?;
        self.set_text(text, 0)
    }

    /// Imports a file from disk, replacing the buffer on success.
    pub fn import_path(&mut self, path: &Path) -> Result<(), SessionError> {
        let text = file_io::import_path(path, &self.config.import)?;
        self.set_text(text, 0)
    }

    /// Packages the buffer as a timestamp-named plain-text file.
    pub fn export_file<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ExportedFile
    where
        Tz::Offset: Display,
    {
        file_io::export_text(self.buffer.text(), now)
    }

    /// `export_file` stamped with the local wall clock.
    pub fn export_now(&self) -> ExportedFile {
        self.export_file(&Local::now())
    }

    fn persist(&mut self) -> Result<(), SessionError> {
        self.store.save(self.buffer.text()).map_err(|err| {
            error!("event=text_save module=session status=error error={err}");
            SessionError::from(err)
        })
    }

    // -- scroll -----------------------------------------------------------

    pub fn on_wheel(&mut self, delta_y: f64) -> WheelOutcome {
        let outcome = self.coordinator.on_wheel(delta_y);
        self.broadcast_if_changed(outcome)
    }

    pub fn on_touch_drag(&mut self, start_y: f64, current_y: f64) -> WheelOutcome {
        let outcome = self.coordinator.on_touch_drag(start_y, current_y);
        self.broadcast_if_changed(outcome)
    }

    pub fn on_touch_end(&mut self) {
        self.coordinator.on_touch_end();
    }

    /// Re-evaluates the content-edge lock from fresh layout measurements.
    pub fn evaluate_lock(
        &mut self,
        scroll_top: f64,
        container_height: f64,
        content_height: f64,
    ) -> bool {
        self.coordinator
            .evaluate_lock(scroll_top, container_height, content_height)
    }

    pub fn scroll_scalar(&self) -> f64 {
        self.coordinator.scalar()
    }

    pub fn is_locked(&self) -> bool {
        self.coordinator.is_locked()
    }

    pub fn transform(&self) -> &TextPanelTransform {
        &self.transform
    }

    pub fn logo_visible(&self) -> bool {
        self.logo.is_visible()
    }

    fn broadcast_if_changed(&mut self, outcome: WheelOutcome) -> WheelOutcome {
        if outcome.changed() {
            let mut observers: [&mut dyn ScrollObserver; 3] =
                [&mut self.animator, &mut self.transform, &mut self.logo];
            self.coordinator.notify(&mut observers);
        }
        outcome
    }

    // -- starfield ----------------------------------------------------------

    /// Sizes the starfield immediately; used once when the view mounts.
    pub fn mount(&mut self, width: f32, height: f32) {
        self.animator.mount(width, height);
    }

    /// Queues a debounced canvas resize.
    pub fn request_resize(&mut self, now_ms: f64, width: f32, height: f32) {
        self.animator.request_resize(now_ms, width, height);
    }

    pub fn on_frame<T: RenderTarget + ?Sized>(
        &mut self,
        timestamp_ms: f64,
        target: Option<&mut T>,
    ) -> FrameOutcome {
        self.animator.on_frame(timestamp_ms, target)
    }

    pub fn animator(&self) -> &StarfieldAnimator {
        &self.animator
    }

    /// Stops the animation loop and drops pending timers.
    pub fn teardown(&mut self) {
        self.animator.teardown();
        self.coordinator.on_touch_end();
    }
}

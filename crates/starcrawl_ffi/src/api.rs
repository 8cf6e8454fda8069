//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one opaque editor session plus a few process-level helpers.
//! - Flatten core outcomes into plain envelopes the Dart side can render.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every session call locks the session for its whole duration, so a
//!   wheel update is visible to the next `on_frame` call.

use log::{info, warn};
use starcrawl_core::db::open_db;
use starcrawl_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CrawlConfig, DrawCommand, DrawList, EditorSession, FrameOutcome, SqliteTextRepository,
    TextPanelTransform, WheelOutcome,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

const DB_FILE_NAME: &str = "starcrawl.sqlite3";
const DB_PATH_ENV: &str = "STARCRAWL_DB_PATH";
static DEFAULT_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str(), false) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Human-readable message; shown to the user when `ok` is false.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Scroll state after one wheel or touch sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollResponse {
    /// Whether the sample moved the scalar.
    pub applied: bool,
    /// Whether the host must cancel native scrolling for this event.
    pub prevent_default: bool,
    pub scalar: f64,
    pub locked: bool,
    pub logo_visible: bool,
    /// CSS `transform` for the text panel.
    pub transform_css: String,
    /// CSS `perspective` for the panel's container.
    pub perspective_css: String,
    /// CSS `transform-origin` for the text panel.
    pub transform_origin: String,
}

/// One star sprite to paint over the black backdrop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarSprite {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
}

/// Result of one animation-frame callback.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResponse {
    /// `drawn|skipped|unavailable|stopped`.
    pub outcome: String,
    /// False once the session is torn down; the host stops scheduling.
    pub wants_next_frame: bool,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Empty unless `outcome == "drawn"`.
    pub stars: Vec<StarSprite>,
}

/// File payload for the host's download/save dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

struct SessionState {
    editor: EditorSession<SqliteTextRepository>,
    draw_list: DrawList,
}

/// Opaque editor session handle.
#[flutter_rust_bridge::frb(opaque)]
pub struct CrawlSession {
    state: Mutex<SessionState>,
}

impl CrawlSession {
    /// Opens the store and restores the last saved text.
    ///
    /// Input semantics:
    /// - `db_path`: explicit store file; falls back to `STARCRAWL_DB_PATH`,
    ///   then a file in the temp directory.
    /// - `config_json`: optional partial `CrawlConfig` JSON document.
    ///
    /// # FFI contract
    /// - Returns an error message instead of panicking when the store or
    ///   config cannot be loaded.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open(db_path: Option<String>, config_json: Option<String>) -> Result<Self, String> {
        let config = match config_json.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                CrawlConfig::from_json_str(raw).map_err(|err| err.to_string())?
            }
            _ => CrawlConfig::default(),
        };
        let path = resolve_db_path(db_path);
        let conn = open_db(&path).map_err(|err| format!("store open failed: {err}"))?;
        info!(
            "event=session_open module=ffi status=ok db_path={}",
            path.display()
        );
        Ok(Self {
            state: Mutex::new(SessionState {
                editor: EditorSession::open(SqliteTextRepository::new(conn), config),
                draw_list: DrawList::new(),
            }),
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn text(&self) -> String {
        self.lock().editor.text().to_owned()
    }

    /// Crawl rows, blank rows as a single space.
    #[flutter_rust_bridge::frb(sync)]
    pub fn lines(&self) -> Vec<String> {
        self.lock().editor.lines()
    }

    /// Stores an edit. The buffer keeps the edit even when saving fails.
    #[flutter_rust_bridge::frb(sync)]
    pub fn set_text(&self, text: String, cursor: u32) -> ActionResponse {
        match self.lock().editor.set_text(text, cursor as usize) {
            Ok(()) => ActionResponse::success("saved"),
            Err(err) => ActionResponse::failure(err.to_string()),
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn clear(&self) -> ActionResponse {
        match self.lock().editor.clear() {
            Ok(()) => ActionResponse::success("cleared"),
            Err(err) => ActionResponse::failure(err.to_string()),
        }
    }

    /// Handles one wheel event; honor `prevent_default` in the host.
    #[flutter_rust_bridge::frb(sync)]
    pub fn on_wheel(&self, delta_y: f64) -> ScrollResponse {
        let mut state = self.lock();
        let outcome = state.editor.on_wheel(delta_y);
        scroll_response(&state.editor, outcome)
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn on_touch_drag(&self, start_y: f64, current_y: f64) -> ScrollResponse {
        let mut state = self.lock();
        let outcome = state.editor.on_touch_drag(start_y, current_y);
        scroll_response(&state.editor, outcome)
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn on_touch_end(&self) {
        self.lock().editor.on_touch_end();
    }

    /// Re-evaluates the scroll lock from the text container's measurements.
    #[flutter_rust_bridge::frb(sync)]
    pub fn evaluate_lock(&self, scroll_top: f64, container_height: f64, content_height: f64) -> bool {
        self.lock()
            .editor
            .evaluate_lock(scroll_top, container_height, content_height)
    }

    /// Sizes the starfield right away; call once the canvas is laid out.
    #[flutter_rust_bridge::frb(sync)]
    pub fn mount(&self, width: f32, height: f32) {
        self.lock().editor.mount(width, height);
    }

    /// Queues a debounced resize, applied by a later `on_frame`.
    #[flutter_rust_bridge::frb(sync)]
    pub fn request_resize(&self, now_ms: f64, width: f32, height: f32) {
        self.lock().editor.request_resize(now_ms, width, height);
    }

    /// Runs one animation-frame callback.
    ///
    /// `has_canvas` is false when the host has no drawing context; the frame
    /// is then reported as `unavailable` and nothing is drawn.
    #[flutter_rust_bridge::frb(sync)]
    pub fn on_frame(&self, timestamp_ms: f64, has_canvas: bool) -> FrameResponse {
        let mut guard = self.lock();
        let SessionState { editor, draw_list } = &mut *guard;
        draw_list.begin_frame();
        let target = if has_canvas { Some(&mut *draw_list) } else { None };
        let outcome = editor.on_frame(timestamp_ms, target);
        frame_response(outcome, draw_list)
    }

    /// Validates and imports a picked file; the text is unchanged on failure.
    #[flutter_rust_bridge::frb(sync)]
    pub fn import_file(&self, file_name: String, bytes: Vec<u8>) -> ActionResponse {
        match self.lock().editor.import_file(&file_name, &bytes) {
            Ok(()) => ActionResponse::success(format!("imported {file_name}")),
            Err(err) => {
                warn!("event=import_file module=ffi status=rejected error={err}");
                ActionResponse::failure(err.to_string())
            }
        }
    }

    /// Packages the current text as `YYYYMMDD_HHMMSS.txt`.
    #[flutter_rust_bridge::frb(sync)]
    pub fn export_file(&self) -> ExportResponse {
        let file = self.lock().editor.export_now();
        ExportResponse {
            file_name: file.file_name,
            mime_type: file.mime_type.to_owned(),
            bytes: file.bytes,
        }
    }

    /// Stops the animation loop; later frames report `stopped`.
    #[flutter_rust_bridge::frb(sync)]
    pub fn teardown(&self) {
        self.lock().editor.teardown();
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn scroll_response(
    editor: &EditorSession<SqliteTextRepository>,
    outcome: WheelOutcome,
) -> ScrollResponse {
    ScrollResponse {
        applied: outcome.changed(),
        prevent_default: outcome.prevent_default(),
        scalar: editor.scroll_scalar(),
        locked: editor.is_locked(),
        logo_visible: editor.logo_visible(),
        transform_css: editor.transform().css(),
        perspective_css: editor.transform().css_perspective(),
        transform_origin: TextPanelTransform::TRANSFORM_ORIGIN.to_string(),
    }
}

fn frame_response(outcome: FrameOutcome, draw_list: &DrawList) -> FrameResponse {
    let label = match outcome {
        FrameOutcome::Drawn { .. } => "drawn",
        FrameOutcome::Skipped => "skipped",
        FrameOutcome::Unavailable => "unavailable",
        FrameOutcome::Stopped => "stopped",
    };
    let mut response = FrameResponse {
        outcome: label.to_string(),
        wants_next_frame: outcome.wants_next_frame(),
        canvas_width: 0.0,
        canvas_height: 0.0,
        stars: Vec::with_capacity(draw_list.circle_count()),
    };
    for command in draw_list.commands() {
        match *command {
            DrawCommand::Clear { width, height } => {
                response.canvas_width = width;
                response.canvas_height = height;
            }
            // The backdrop is always solid black.
            DrawCommand::FillRect { .. } => {}
            DrawCommand::FillCircle {
                x,
                y,
                radius,
                color,
            } => response.stars.push(StarSprite {
                x,
                y,
                radius,
                opacity: color.a,
            }),
        }
    }
    response
}

fn resolve_db_path(explicit: Option<String>) -> PathBuf {
    if let Some(raw) = explicit {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    DEFAULT_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

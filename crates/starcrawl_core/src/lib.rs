//! Core domain logic for starcrawl.
//! This crate is the single source of truth for editor, scroll and starfield state.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scroll;
pub mod session;
pub mod starfield;
pub mod text;

pub use config::{ConfigError, CrawlConfig, ImportConfig, ScrollConfig, StarfieldConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::star::{DepthLayer, Star};
pub use repo::text_repo::{
    RepoError, RepoResult, SqliteTextRepository, TextRepository, EDITOR_TEXT_KEY,
};
pub use scroll::coordinator::{
    evaluate_lock, ScrollCoordinator, ScrollObserver, ScrollState, WheelOutcome,
};
pub use scroll::views::{crawl_lines, LogoVisibility, TextPanelTransform};
pub use session::{EditorSession, SessionError, DEFAULT_TEXT};
pub use starfield::animator::{FrameOutcome, StarfieldAnimator};
pub use starfield::field::{CanvasSize, ParticleField};
pub use starfield::frame::{FrameGate, ResizeDebouncer};
pub use starfield::render::{DrawCommand, DrawList, RenderTarget, Rgba};
pub use text::buffer::TextBuffer;
pub use text::file_io::{
    export_file_name, export_text, import_path, import_text, ExportedFile, ImportError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

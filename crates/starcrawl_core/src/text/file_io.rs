//! Plain-text file import and export.
//!
//! # Responsibility
//! - Convert the buffer into a downloadable `text/plain` file.
//! - Validate and decode user-selected files before they replace the buffer.
//!
//! # Invariants
//! - Import never returns partial content: either the whole decoded text
//!   or an `ImportError` whose message is fit for a blocking notification.
//! - Export file names are `YYYYMMDD_HHMMSS.txt` in local time.

use crate::config::ImportConfig;
use chrono::{DateTime, TimeZone};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const EXPORT_MIME_TYPE: &str = "text/plain";

/// File ready to hand to the host's download mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// User-visible import failure.
#[derive(Debug)]
pub enum ImportError {
    /// File exceeds the configured size ceiling.
    TooLarge { size: u64, limit: u64 },
    /// Extension is not one of the accepted plain-text types.
    UnsupportedType(String),
    /// Host failed to read the file.
    ReadFailed(std::io::Error),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLarge { size, limit } => write!(
                f,
                "File is too large ({} KiB). The limit is {} KiB.",
                size.div_ceil(1024),
                limit / 1024
            ),
            Self::UnsupportedType(name) => {
                write!(f, "Unsupported file type: `{name}`. Choose a .txt or .md file.")
            }
            Self::ReadFailed(err) => write!(f, "Could not read the file: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ReadFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(value: std::io::Error) -> Self {
        Self::ReadFailed(value)
    }
}

/// `YYYYMMDD_HHMMSS.txt` for the given instant.
pub fn export_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("{}.txt", now.format("%Y%m%d_%H%M%S"))
}

/// Packages `text` as a UTF-8 `text/plain` file named after `now`.
pub fn export_text<Tz: TimeZone>(text: &str, now: &DateTime<Tz>) -> ExportedFile
where
    Tz::Offset: Display,
{
    let file = ExportedFile {
        file_name: export_file_name(now),
        mime_type: EXPORT_MIME_TYPE,
        bytes: text.as_bytes().to_vec(),
    };
    info!(
        "event=text_export module=file_io status=ok file_name={} bytes={}",
        file.file_name,
        file.bytes.len()
    );
    file
}

/// Validates and decodes an in-memory file.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, matching how
/// browsers decode text files.
pub fn import_text(
    file_name: &str,
    bytes: &[u8],
    config: &ImportConfig,
) -> Result<String, ImportError> {
    check_extension(file_name, config)?;
    check_size(bytes.len() as u64, config)?;
    let text = String::from_utf8_lossy(bytes).into_owned();
    info!(
        "event=text_import module=file_io status=ok bytes={}",
        bytes.len()
    );
    Ok(text)
}

/// Reads and decodes a file from disk, checking its size before reading.
pub fn import_path(path: &Path, config: &ImportConfig) -> Result<String, ImportError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    check_extension(&file_name, config)?;
    let metadata = std::fs::metadata(path).inspect_err(|err| {
        warn!("event=text_import module=file_io status=error error_code=stat_failed error={err}");
    })?;
    check_size(metadata.len(), config)?;
    let bytes = std::fs::read(path).inspect_err(|err| {
        warn!("event=text_import module=file_io status=error error_code=read_failed error={err}");
    })?;
    import_text(&file_name, &bytes, config)
}

fn check_extension(file_name: &str, config: &ImportConfig) -> Result<(), ImportError> {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    let accepted = extension.is_some_and(|ext| {
        config
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    });
    if accepted {
        Ok(())
    } else {
        warn!("event=text_import module=file_io status=rejected error_code=unsupported_type");
        Err(ImportError::UnsupportedType(file_name.to_string()))
    }
}

fn check_size(size: u64, config: &ImportConfig) -> Result<(), ImportError> {
    if size > config.max_file_bytes {
        warn!(
            "event=text_import module=file_io status=rejected error_code=too_large bytes={} limit={}",
            size, config.max_file_bytes
        );
        return Err(ImportError::TooLarge {
            size,
            limit: config.max_file_bytes,
        });
    }
    Ok(())
}

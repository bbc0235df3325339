//! Error types for slicer-file metadata extraction
//!
//! Only three failures ever reach the caller. Everything else (a missing optional
//! metadata entry, an unknown dialect, a preview image that cannot be read) is
//! skipped during extraction and logged instead.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! - `E1001`: The input file could not be read
//! - `E2001`: The archive or its model document is malformed
//! - `E4001`: The file extension is not a supported slicer format

use std::io;
use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, Error>;

/// Where inside an archive a fatal decode error happened
///
/// Rendered after the error message so that log lines identify the uploaded file
/// and the extraction stage without needing a backtrace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Name of the file being parsed (as supplied by the caller)
    pub file: Option<String>,

    /// Entry path inside the archive, when the failure is tied to one entry
    pub entry: Option<String>,

    /// Extraction stage that failed (e.g. "open archive", "model document")
    pub stage: Option<String>,

    /// A helpful hint for resolving the error
    pub hint: Option<String>,
}

impl ErrorContext {
    /// Create a new empty error context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file name
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the archive entry path
    pub fn entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Set the extraction stage
    pub fn stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Set the hint
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        if let Some(ref file) = self.file {
            parts.push(format!("File: {}", file));
        }

        if let Some(ref entry) = self.entry {
            parts.push(format!("Entry: {}", entry));
        }

        if let Some(ref stage) = self.stage {
            parts.push(format!("Stage: {}", stage));
        }

        if let Some(ref hint) = self.hint {
            parts.push(format!("Hint: {}", hint));
        }

        if !parts.is_empty() {
            write!(f, "\n{}", parts.join("\n"))
        } else {
            Ok(())
        }
    }
}

/// Underlying decoder failure wrapped by [`Error::ArchiveParse`]
#[derive(Error, Debug)]
pub enum DecodeError {
    /// ZIP container could not be opened or an entry could not be inflated
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML document is malformed
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute could not be decoded
    #[error("XML attribute error: {0}")]
    XmlAttr(String),

    /// XML text content could not be unescaped
    #[error("XML text error: {0}")]
    XmlText(String),

    /// JSON document is malformed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading an archive entry failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<quick_xml::events::attributes::AttrError> for DecodeError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        DecodeError::XmlAttr(format!("Attribute parsing failed: {}", err))
    }
}

impl From<std::str::Utf8Error> for DecodeError {
    fn from(err: std::str::Utf8Error) -> Self {
        DecodeError::XmlAttr(format!("Invalid UTF-8 in XML name or attribute: {}", err))
    }
}

/// Errors that can occur when extracting metadata from a slicer file
#[derive(Error, Debug)]
pub enum Error {
    /// The file extension is not one of the supported slicer formats
    ///
    /// **Error Code**: E4001
    ///
    /// Carries the offending lowercase extension. Supported extensions are
    /// `3mf`, `gcode`, `gco` and `g`.
    #[error("[E4001] Unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    /// The archive or one of its blocking documents is malformed
    ///
    /// **Error Code**: E2001
    ///
    /// **Common Causes**:
    /// - Corrupted or truncated ZIP file
    /// - Malformed `3D/3dmodel.model` XML
    /// - Malformed project settings or manifest when strict metadata is enabled
    ///
    /// **Suggestions**:
    /// - Verify the file is a valid 3MF (ZIP) archive
    /// - Try re-exporting the project from the slicer
    #[error("[E2001] Failed to parse 3MF archive: {source}{context}")]
    ArchiveParse {
        /// File, entry and stage where the failure happened
        context: ErrorContext,
        /// Underlying decoder error
        #[source]
        source: DecodeError,
    },

    /// The input could not be read from storage
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - File not found
    /// - Insufficient permissions
    /// - Disk read error
    #[error("[E1001] Failed to read '{file_name}': {source}")]
    FileRead {
        /// Name of the file being read
        file_name: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an `ArchiveParse` error for a given file and stage
    ///
    /// # Arguments
    /// * `file_name` - Name of the file being parsed
    /// * `stage` - Extraction stage that failed
    /// * `source` - Underlying decoder error
    pub fn archive(file_name: &str, stage: &str, source: impl Into<DecodeError>) -> Self {
        Error::ArchiveParse {
            context: ErrorContext::new().file(file_name).stage(stage),
            source: source.into(),
        }
    }

    /// Create an `ArchiveParse` error tied to one archive entry
    pub fn archive_entry(
        file_name: &str,
        stage: &str,
        entry: &str,
        source: impl Into<DecodeError>,
    ) -> Self {
        Error::ArchiveParse {
            context: ErrorContext::new().file(file_name).stage(stage).entry(entry),
            source: source.into(),
        }
    }

    /// Attach a hint to an `ArchiveParse` error; other errors are returned unchanged
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        match self {
            Error::ArchiveParse { context, source } => Error::ArchiveParse {
                context: context.hint(hint),
                source,
            },
            other => other,
        }
    }

    /// Create a `FileRead` error
    pub fn file_read(file_name: impl Into<String>, source: io::Error) -> Self {
        Error::FileRead {
            file_name: file_name.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_in_messages() {
        let unsupported = Error::UnsupportedFormat("stl".to_string());
        assert!(unsupported.to_string().contains("[E4001]"));
        assert!(unsupported.to_string().contains("'stl'"));

        let read = Error::file_read(
            "part.gcode",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(read.to_string().contains("[E1001]"));
        assert!(read.to_string().contains("part.gcode"));

        let archive = Error::archive(
            "part.3mf",
            "open archive",
            io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"),
        );
        assert!(archive.to_string().contains("[E2001]"));
    }

    #[test]
    fn test_archive_error_renders_context() {
        let err = Error::archive_entry(
            "benchy.3mf",
            "model document",
            "3D/3dmodel.model",
            DecodeError::XmlAttr("bad".to_string()),
        );
        let message = err.to_string();
        assert!(message.contains("File: benchy.3mf"));
        assert!(message.contains("Entry: 3D/3dmodel.model"));
        assert!(message.contains("Stage: model document"));
        assert!(message.contains("XML attribute error: bad"));
    }

    #[test]
    fn test_hint_only_on_archive_errors() {
        let err = Error::archive(
            "a.3mf",
            "open archive",
            io::Error::new(io::ErrorKind::InvalidData, "not a zip"),
        )
        .with_hint("check the upload");
        assert!(err.to_string().contains("Hint: check the upload"));

        let err = Error::UnsupportedFormat("stl".to_string()).with_hint("ignored");
        assert!(!err.to_string().contains("Hint"));
    }

    #[test]
    fn test_archive_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::archive(
            "a.3mf",
            "open archive",
            io::Error::new(io::ErrorKind::Other, "boom"),
        );
        let source = err.source().expect("archive error should expose its source");
        assert!(source.to_string().contains("boom"));
    }

    #[test]
    fn test_error_context_builder() {
        let ctx = ErrorContext::new()
            .file("plate.3mf")
            .entry("Metadata/slice_info.config")
            .stage("manifest")
            .hint("Re-export the project");

        assert_eq!(ctx.file, Some("plate.3mf".to_string()));
        assert_eq!(ctx.entry, Some("Metadata/slice_info.config".to_string()));
        assert_eq!(ctx.stage, Some("manifest".to_string()));
        assert_eq!(ctx.hint, Some("Re-export the project".to_string()));
        assert!(ctx.to_string().contains("Hint: Re-export the project"));
    }

    #[test]
    fn test_error_context_display_empty() {
        assert_eq!(ErrorContext::new().to_string(), "");
    }
}

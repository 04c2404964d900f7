/// Crate-level error types for shxref diagnostics.
use std::path::PathBuf;

/// Every failure is fatal to the invocation. Each variant names the file,
/// input, or reason so the host can report it without a debugger.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Script exceeds the configured size limit or the 32-bit offset range.
    #[error("file too large ({size_bytes} bytes, max {max_bytes}): {}", file.display())]
    FileTooLarge {
        /// File that exceeded the size limit.
        file: PathBuf,
        /// Maximum allowed file size in bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        size_bytes: u64,
    },

    /// Standard input held neither an array of source units nor a single unit.
    #[error("failed to parse source units from input: {reason}")]
    InputDecode {
        /// Decoder message for the array-of-units attempt.
        reason: String,
    },

    /// Underlying I/O error on stdin, stdout, or the working directory.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of an output document failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped serde error.
        #[from]
        serde_json::Error,
    ),

    /// The graph input decoded to zero source units.
    #[error("input contains no source unit data")]
    NoSourceUnits,

    /// A script listed in a source unit could not be opened.
    #[error("failed to open file {}: {source}", path.display())]
    OpenFailed {
        /// Path that failed to open.
        path: PathBuf,
        /// The wrapped I/O error.
        source: std::io::Error,
    },

    /// Tree-sitter could not produce a tree for a script.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A script opened but reading its contents failed partway.
    #[error("failed to read file {}: {source}", path.display())]
    ReadFailed {
        /// Path that failed to read.
        path: PathBuf,
        /// The wrapped I/O error.
        source: std::io::Error,
    },

    /// No relative form exists between the base directory and a file path.
    #[error("failed to make path {} relative to {}", path.display(), base.display())]
    RelativePath {
        /// Base directory the path was made relative to.
        base: PathBuf,
        /// Path that could not be relativized.
        path: PathBuf,
    },

    /// TOML deserialization of `.shxref.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// Directory traversal during `scan` failed.
    #[error("scanning for shell scripts failed: {0}")]
    Walk(
        /// The wrapped walkdir error.
        #[from]
        walkdir::Error,
    ),
}

//! Error types for playlist parsing, configuration and copying.
//!
//! The command handlers in `cli` wrap these with `anyhow` context.

use std::path::PathBuf;

/// Why a `MM:SS` duration could not be read.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("expected MM:SS, got {0:?}")]
    Separator(String),

    #[error("invalid minutes {0:?}")]
    Minutes(String),

    #[error("invalid seconds {0:?}")]
    Seconds(String),
}

/// A playlist row that does not match the export format.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("want {expected} fields, got {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("failed to parse duration {value:?}")]
    Duration {
        value: String,
        #[source]
        reason: DurationError,
    },

    #[error("failed to parse bpm {value:?}")]
    Bpm {
        value: String,
        source: std::num::ParseFloatError,
    },

    /// Negative or non-finite BPM
    #[error("invalid bpm {value:?}")]
    InvalidBpm { value: String },

    #[error("failed to parse url {value:?}")]
    Url {
        value: String,
        source: url::ParseError,
    },
}

/// Quoting mistakes the CSV reader would otherwise paper over.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("bare \" in unquoted field")]
    BareQuote,

    #[error("extraneous \" after closing quote")]
    ExtraneousQuote,

    #[error("quoted field is never closed")]
    Unterminated,
}

#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    /// Broken CSV. Nothing after it can be trusted.
    #[error("malformed csv")]
    Csv(#[from] csv::Error),

    #[error("malformed csv at line {line}")]
    Quote {
        line: u64,
        #[source]
        reason: QuoteError,
    },

    #[error("failed to parse song at line {position}")]
    Song {
        position: usize,
        source: FormatError,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid prefix option: {value:?} (available: full, pos, bpm, none)")]
    UnknownPrefix { value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("failed to copy from {src:?} to {dst:?}: failed to open source file")]
    OpenSource {
        src: PathBuf,
        dst: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to copy from {src:?} to {dst:?}: failed to create destination file")]
    CreateDestination {
        src: PathBuf,
        dst: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to copy from {src:?} to {dst:?}")]
    Transfer {
        src: PathBuf,
        dst: PathBuf,
        source: std::io::Error,
    },
}

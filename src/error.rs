use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DownloadError {
    #[error("invalid artwork id: {0}")]
    InvalidArtworkId(String),

    #[error("failed to read input file at {0}")]
    InputRead(PathBuf),

    #[error("no valid artwork URLs found in {0}")]
    NoUrls(PathBuf),

    #[error("failed to read cookie file at {0}")]
    CookieRead(PathBuf),

    #[error("cookie file is empty or contains only comments: {0}")]
    CookieEmpty(PathBuf),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("metadata request failed: {0}")]
    MetadataHttp(String),

    #[error("metadata endpoint returned status {status}: {message}")]
    MetadataStatus { status: u16, message: String },

    #[error("malformed metadata for artwork {id}: {reason}")]
    MalformedMetadata { id: String, reason: String },

    #[error("no downloadable assets resolved for artwork {0}")]
    NoAssets(String),

    #[error("cannot open output file {0}")]
    CannotOpenOutput(String),

    #[error("asset transfer failed: {0}")]
    Transport(String),

    #[error("asset endpoint returned status {status}: {message}")]
    TransportStatus { status: u16, message: String },

    #[error("failed to open completion store: {0}")]
    StoreOpen(String),

    #[error("failed to write completion record: {0}")]
    StoreWrite(String),
}

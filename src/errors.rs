use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TapedeckError {
    #[error("Tapedeck error: {0}")]
    Generic(String),
    #[error(transparent)]
    Expected(#[from] TapedeckExpectedError),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that arise from a single track and are caught at the batch
/// boundary; they never abort a run.
#[derive(Error, Debug)]
pub enum TapedeckExpectedError {
    #[error("{0}")]
    Generic(String),
    #[error("descriptor has neither a title nor a source id")]
    MissingIdentity,
    #[error("descriptor has no source id")]
    MissingSourceId,
    #[error("fetch error: {reason}")]
    Fetch { reason: String },
    #[error("convert error: {reason}")]
    Convert { reason: String },
    #[error("art source unavailable: {reason}")]
    ArtSource { reason: String },
    #[error("tag write error: {reason}")]
    TagWrite { reason: String },
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },
    #[error("Not an MP3 file: {path}")]
    NotAnMp3 { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, TapedeckError>;

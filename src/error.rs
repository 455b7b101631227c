use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AcgetError>;

#[derive(Error, Debug)]
pub enum AcgetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid JSON in settings file {path}: {source}")]
    ConfigMalformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Missing required key '{key}' in settings file")]
    ConfigIncomplete { key: &'static str },

    #[error("No releases found for the distribution group")]
    ReleaseListEmpty,

    #[error("Release response is missing the '{field}' field")]
    ReleaseFieldMissing { field: &'static str },

    #[error("App Center returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Extraction failed for {path}: {source}")]
    Extraction {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("Installer exited with status {code}")]
    InstallerFailed { code: i32 },
}

impl AcgetError {
    /// Exit code reported to the shell for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AcgetError::InstallerFailed { code } => *code,
            _ => 1,
        }
    }
}

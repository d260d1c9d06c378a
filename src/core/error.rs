use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the server manager.
/// Every module returns `Result<T, ManagerError>`.
#[derive(Debug, Error)]
pub enum ManagerError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Settings ────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings file {path:?}: {source}")]
    InvalidSettings {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    // ── Java ────────────────────────────────────────────
    #[error("Java {0} is not in the java path list")]
    JavaNotConfigured(u32),

    // ── Versions ────────────────────────────────────────
    #[error("Jar not found in the main or versions folder: {0:?}")]
    JarNotFound(PathBuf),

    #[error("Moving {from:?} to {to:?} failed")]
    MoveFailed { from: PathBuf, to: PathBuf },

    #[error("Invalid jar name '{name}': {reason}")]
    InvalidJarName { name: String, reason: String },

    #[error("More than one active jar in the main folder: {0:?}")]
    MultipleActiveJars(Vec<PathBuf>),

    #[error("No versions available to select")]
    NoVersions,

    // ── Console ─────────────────────────────────────────
    #[error("Input closed before a valid answer was given")]
    InputClosed,

    // ── Processes ───────────────────────────────────────
    #[error("{program} failed: {detail}")]
    CommandFailed { program: String, detail: String },

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type ManagerResult<T> = Result<T, ManagerError>;

impl From<std::io::Error> for ManagerError {
    fn from(source: std::io::Error) -> Self {
        ManagerError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl ManagerError {
    /// Wrap an IO error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManagerError::Io {
            path: path.into(),
            source,
        }
    }
}

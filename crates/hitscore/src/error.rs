use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown hit result code: {0}")]
    UnknownHitResult(u8),

    #[error("Unknown game mod: {0}")]
    UnknownMod(String),

    #[error("Result {0} is only produced by combo-end reclassification")]
    DerivedResult(crate::judge::HitResult),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

use thiserror::Error;

use crate::types::ImageCreateResult;

/// Errors raised while migrating or exporting a project. Every variant is fatal.
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Custom Vision API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Tag {0} is not present in the tag mapping")]
    UnknownTag(String),

    /// `results` holds every per-image status the service reported for the batch
    #[error("Failed to upload {phase} image batch of {total} images")]
    BatchFailed {
        phase: &'static str,
        total: usize,
        results: Vec<ImageCreateResult>,
    },
}

pub type Result<T> = std::result::Result<T, MigrateError>;

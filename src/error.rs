use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShowcaseError {
    #[error("Empty content source: at least one entry is required")]
    EmptyContent,

    #[error("Invalid catalog '{path}': {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load texture for '{path}': {message}")]
    Texture { path: PathBuf, message: String },

    #[error("Playback of '{source_locator}' could not start: {message}")]
    Playback { source_locator: String, message: String },

    #[error("Decoder error: {0}")]
    Decoder(String),
}

pub type Result<T> = std::result::Result<T, ShowcaseError>;

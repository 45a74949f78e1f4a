use std::path::PathBuf;

use thiserror::Error;

use crate::models::document::Document;

pub mod json;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to serialize document to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save document to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to back up previous document at '{path}': {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait Storage {
    /// Reading never fails: a missing, unreadable or malformed blob
    /// degrades to the built-in default document.
    fn load(&self) -> Document;

    fn save(&self, document: &Document) -> Result<(), StorageError>;
}

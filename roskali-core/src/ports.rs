//! Traits describing bin source and classifier capabilities.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{BinSnapshot, Classification, SourceMeta};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to source or classifier backends.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The feed returned a payload the source could not make sense of.
    #[error("Malformed feed: {0}")]
    Feed(String),
    /// The source has no registered plugin.
    #[error("Unsupported source")]
    UnsupportedSource,
    /// The classifier was handed an empty image.
    #[error("Empty image")]
    EmptyImage,
    /// Internal backend error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Trait for backends that produce bin snapshots.
///
/// A source may be a live telemetry feed or a synthetic generator; the core
/// only cares that each call yields one self-contained snapshot.
pub trait BinSource: Send + Sync {
    /// Metadata describing this source.
    fn source(&self) -> &SourceMeta;

    /// Take a fresh snapshot of the fleet.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails.
    async fn snapshot(&self) -> Result<BinSnapshot, PortError>;
}

#[async_trait]
/// Trait for backends that classify a waste image into a category.
pub trait WasteClassifier: Send + Sync {
    /// Classify raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the image is unusable or the backend
    /// fails.
    async fn classify(&self, image: &[u8]) -> Result<Classification, PortError>;
}

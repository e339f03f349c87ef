//! High-level service facade combining sources, classifier, and sequencer.

use std::sync::Arc;

use crate::model::{BinSnapshot, Classification, SourceId};
use crate::plugin::SourceRegistry;
use crate::ports::{PortError, WasteClassifier};
use crate::route::{self, RouteError, RouteOptions, RouteSequence};

#[derive(thiserror::Error, Debug)]
/// Errors surfaced by the service facade.
pub enum ServiceError {
    /// Fetching a snapshot failed.
    #[error(transparent)]
    Source(#[from] PortError),
    /// The snapshot was rejected by the sequencer's validation.
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Public entry point for snapshots, classification, and routing.
pub struct RoskaliService {
    registry: Arc<SourceRegistry>,
    classifier: Arc<dyn WasteClassifier>,
}

impl RoskaliService {
    /// Create a new service bound to the provided registry and classifier.
    #[must_use]
    pub fn new(registry: Arc<SourceRegistry>, classifier: Arc<dyn WasteClassifier>) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    /// List all available sources and their display names.
    #[must_use]
    pub fn sources(&self) -> Vec<(SourceId, String)> {
        self.registry
            .sources()
            .into_iter()
            .map(|meta| (meta.id, meta.name))
            .collect()
    }

    /// Take a fresh snapshot from the given source.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the source is unsupported or the backend
    /// call fails.
    pub async fn snapshot_for(&self, source: SourceId) -> Result<BinSnapshot, PortError> {
        let plugin = self.registry.plugin(&source)?;
        plugin.bin_source.snapshot().await
    }

    /// Take a snapshot and sequence a collection route over it.
    ///
    /// The snapshot is returned alongside the route so callers can resolve
    /// stop ids back to coordinates for display.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the source is unsupported, the backend
    /// call fails, or the snapshot does not pass route validation.
    pub async fn route_for(
        &self,
        source: SourceId,
        options: &RouteOptions,
    ) -> Result<(BinSnapshot, RouteSequence), ServiceError> {
        let snapshot = self.snapshot_for(source).await?;
        let route = route::sequence(&snapshot.bins, options)?;
        Ok((snapshot, route))
    }

    /// Classify raw waste image bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the image is unusable or the classifier
    /// backend fails.
    pub async fn classify(&self, image: &[u8]) -> Result<Classification, PortError> {
        self.classifier.classify(image).await
    }
}

//! Deterministic stand-in classifier for waste images.
//!
//! Real deployments plug a model server in behind
//! [`WasteClassifier`]; this implementation hashes the image bytes and looks
//! the category up in a fixed table, so the same image always yields the
//! same prediction. Useful for demos and for exercising the classification
//! flow without any inference dependency.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use roskali_core::{
    model::{Classification, WasteCategory},
    ports::{PortError, WasteClassifier},
};

const CATEGORIES: [WasteCategory; 6] = [
    WasteCategory::Residual,
    WasteCategory::Organic,
    WasteCategory::Paper,
    WasteCategory::Plastic,
    WasteCategory::Glass,
    WasteCategory::Metal,
];

/// Confidence floor/span so the stand-in reports plausible percentages.
const CONFIDENCE_FLOOR: f64 = 72.0;
const CONFIDENCE_SPAN: f64 = 27.9;

/// Classifier that derives a stable prediction from a content digest.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveClassifier;

impl NaiveClassifier {
    /// Create a new classifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WasteClassifier for NaiveClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Classification, PortError> {
        if image.is_empty() {
            return Err(PortError::EmptyImage);
        }

        let digest = Sha256::digest(image);

        let category_byte = digest.first().copied().unwrap_or_default();
        let category = CATEGORIES
            .get(usize::from(category_byte) % CATEGORIES.len())
            .cloned()
            .unwrap_or(WasteCategory::Residual);

        let confidence_byte = digest.get(1).copied().unwrap_or_default();
        let confidence =
            CONFIDENCE_FLOOR + CONFIDENCE_SPAN * (f64::from(confidence_byte) / 255.0);

        Ok(Classification {
            category,
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_bytes_always_classify_the_same() {
        let classifier = NaiveClassifier::new();
        let image = b"not really a jpeg, but stable bytes";

        let first = classifier.classify(image).await.expect("classified");
        let second = classifier.classify(image).await.expect("classified");

        assert_eq!(first.category, second.category);
        assert!((first.confidence - second.confidence).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn confidence_stays_in_percentage_range() {
        let classifier = NaiveClassifier::new();

        for sample in [&b"glass"[..], b"cardboard box", b"banana peel", b"tin can"] {
            let result = classifier.classify(sample).await.expect("classified");
            assert!(
                (0.0..=100.0).contains(&result.confidence),
                "confidence {} out of range",
                result.confidence
            );
        }
    }

    #[tokio::test]
    async fn empty_image_is_rejected() {
        let classifier = NaiveClassifier::new();

        let err = classifier.classify(&[]).await.expect_err("empty image");
        assert!(matches!(err, PortError::EmptyImage));
    }

    #[tokio::test]
    async fn different_bytes_can_land_in_different_categories() {
        let classifier = NaiveClassifier::new();

        let mut seen = std::collections::HashSet::new();
        for index in 0_u16..64 {
            let sample = index.to_le_bytes();
            let result = classifier.classify(&sample).await.expect("classified");
            seen.insert(format!("{}", result.category));
        }

        assert!(seen.len() > 1, "digest should spread across categories");
    }
}

//! Domain data structures for bins, snapshots, and classification results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a single waste bin within one snapshot.
pub struct BinId(pub String);

impl fmt::Display for BinId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One physical waste bin at a point in time.
///
/// Records are immutable for the duration of a sequencing call; no identity
/// persists across snapshots.
pub struct BinRecord {
    /// Identifier, unique within one snapshot.
    pub id: BinId,
    /// Latitude in degrees, valid range [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, valid range [-180, 180].
    pub longitude: f64,
    /// Fill level as a percentage, nominally [0, 100].
    pub fill_level: f64,
}

impl BinRecord {
    /// Display-side fill bucket for this bin.
    ///
    /// Note that the `High` boundary is inclusive (`>= 80`) while routing
    /// eligibility in [`crate::route`] uses a strict `>` threshold. The two
    /// disagree on a bin sitting exactly at the threshold; keep that in mind
    /// when comparing the monitor view with a computed route.
    #[must_use]
    pub fn status(&self) -> FillStatus {
        if self.fill_level < 50.0 {
            FillStatus::Low
        } else if self.fill_level < 80.0 {
            FillStatus::Medium
        } else {
            FillStatus::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Coarse fill bucket used by the monitoring view.
pub enum FillStatus {
    /// Below 50 percent.
    Low,
    /// 50 to just under 80 percent.
    Medium,
    /// 80 percent or more.
    High,
}

impl fmt::Display for FillStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FillStatus::Low => "Low",
            FillStatus::Medium => "Medium",
            FillStatus::High => "High",
        };
        write!(formatter, "{label}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A fleet reading: every bin a source knows about, at one instant.
pub struct BinSnapshot {
    /// When the reading was taken.
    pub taken_at: DateTime<Utc>,
    /// The bins, in source order.
    pub bins: Vec<BinRecord>,
}

impl BinSnapshot {
    /// Look up a bin by id within this snapshot.
    #[must_use]
    pub fn bin(&self, id: &BinId) -> Option<&BinRecord> {
        self.bins.iter().find(|bin| &bin.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Waste categories a classifier can assign to an image.
pub enum WasteCategory {
    /// Residual/gray bin waste.
    Residual,
    /// Organic waste.
    Organic,
    /// Paper and cardboard.
    Paper,
    /// Light packaging or plastics.
    Plastic,
    /// Glass.
    Glass,
    /// Metal scrap.
    Metal,
    /// Classifier-specific additional category.
    Other(String),
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WasteCategory::Residual => "Residual",
            WasteCategory::Organic => "Organic",
            WasteCategory::Paper => "Paper",
            WasteCategory::Plastic => "Plastic",
            WasteCategory::Glass => "Glass",
            WasteCategory::Metal => "Metal",
            WasteCategory::Other(name) => name.as_str(),
        };
        write!(formatter, "{label}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Result of classifying one waste image.
pub struct Classification {
    /// Predicted category.
    pub category: WasteCategory,
    /// Confidence as a percentage in [0, 100].
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a bin source known to roskali.
pub struct SourceId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a bin source and its human-friendly name.
pub struct SourceMeta {
    /// Unique identifier.
    pub id: SourceId,
    /// Display name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(id: &str, fill_level: f64) -> BinRecord {
        BinRecord {
            id: BinId(id.to_owned()),
            latitude: 50.94,
            longitude: 6.96,
            fill_level,
        }
    }

    #[test]
    fn status_buckets_match_monitor_boundaries() {
        assert_eq!(bin("B1", 0.0).status(), FillStatus::Low);
        assert_eq!(bin("B2", 49.9).status(), FillStatus::Low);
        assert_eq!(bin("B3", 50.0).status(), FillStatus::Medium);
        assert_eq!(bin("B4", 79.9).status(), FillStatus::Medium);
        assert_eq!(bin("B5", 80.0).status(), FillStatus::High);
        assert_eq!(bin("B6", 100.0).status(), FillStatus::High);
    }

    #[test]
    fn snapshot_lookup_finds_bin_by_id() {
        let snapshot = BinSnapshot {
            taken_at: Utc::now(),
            bins: vec![bin("B1", 10.0), bin("B2", 90.0)],
        };

        let found = snapshot.bin(&BinId("B2".to_owned()));
        assert!(found.is_some(), "B2 should be present");
        assert!(snapshot.bin(&BinId("B9".to_owned())).is_none());
    }
}

//! Greedy nearest-neighbor route sequencing over a bin snapshot.
//!
//! The sequencer is a pure, synchronous function: it takes the bins of one
//! snapshot plus a fill threshold, and returns the visiting order for every
//! bin above the threshold. It performs no I/O and keeps no state across
//! calls, so it can be invoked concurrently with disjoint inputs.
//!
//! Eligibility is strict (`fill_level > threshold`), which intentionally
//! differs from the inclusive `>= 80` bucketing of
//! [`FillStatus::High`](crate::model::FillStatus). See
//! [`BinRecord::status`](crate::model::BinRecord::status).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{BinId, BinRecord};

/// Mean Earth radius, spherical model.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
/// Tuning knobs for [`sequence`].
pub struct RouteOptions {
    /// Minimum fill level (exclusive) for a bin to be routed.
    pub threshold: f64,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self { threshold: 80.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Ordered, duplicate-free visiting sequence of bin identifiers.
///
/// Every id belongs to an input bin whose fill level exceeded the threshold,
/// each such bin appears exactly once, and the path is open (no return leg
/// to the start).
pub struct RouteSequence {
    ids: Vec<BinId>,
}

impl RouteSequence {
    /// Number of stops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the route has no stops ("no action needed").
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Stops in visiting order.
    #[must_use]
    pub fn ids(&self) -> &[BinId] {
        &self.ids
    }

    /// Iterator over stops in visiting order.
    pub fn iter(&self) -> impl Iterator<Item = &BinId> {
        self.ids.iter()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Validation failures rejected at the sequencer boundary.
pub enum RouteError {
    /// A bin carries a coordinate or fill level the sequencer cannot use.
    #[error("Invalid bin record {id}: {reason}")]
    InvalidBinRecord {
        /// Identifier of the offending bin.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Two bins in the same snapshot share an identifier.
    #[error("Duplicate bin id: {0}")]
    DuplicateBinId(String),
}

/// Compute the visiting order for all bins above `options.threshold`.
///
/// Bins are validated once, up front; the greedy construction afterwards
/// cannot fail. The first eligible bin in input order seeds the route, then
/// each step appends the unvisited eligible bin nearest (great-circle) to the
/// last-placed one. Ties go to the earlier bin in input order, so identical
/// input always yields an identical route. An empty eligible set is not an
/// error: the result is simply empty.
///
/// # Errors
///
/// Returns [`RouteError::InvalidBinRecord`] for non-finite or out-of-range
/// coordinates and non-finite fill levels, and [`RouteError::DuplicateBinId`]
/// when two bins share an id. Fill levels outside [0, 100] are accepted;
/// range policing is the source's job.
pub fn sequence(bins: &[BinRecord], options: &RouteOptions) -> Result<RouteSequence, RouteError> {
    validate(bins)?;

    let eligible: Vec<&BinRecord> = bins
        .iter()
        .filter(|bin| bin.fill_level > options.threshold)
        .collect();

    let Some(&start) = eligible.first() else {
        return Ok(RouteSequence::default());
    };

    let mut visited: HashSet<&BinId> = HashSet::with_capacity(eligible.len());
    let mut order = Vec::with_capacity(eligible.len());
    visited.insert(&start.id);
    order.push(start.id.clone());

    let mut current = start;

    while order.len() < eligible.len() {
        let mut nearest: Option<(&BinRecord, f64)> = None;

        for &candidate in &eligible {
            if visited.contains(&candidate.id) {
                continue;
            }
            let dist = haversine_km(current, candidate);
            // Strict `<` keeps the first-encountered bin on ties.
            if nearest.is_none_or(|(_, best)| dist < best) {
                nearest = Some((candidate, dist));
            }
        }

        let Some((next, _)) = nearest else {
            break;
        };

        visited.insert(&next.id);
        order.push(next.id.clone());
        current = next;
    }

    Ok(RouteSequence { ids: order })
}

/// Great-circle distance between two bins in kilometers (haversine, spherical
/// Earth). Exact values are display-only; the sequencer relies solely on
/// relative ordering.
#[must_use]
pub fn haversine_km(from: &BinRecord, to: &BinRecord) -> f64 {
    let (lat1, lat2) = (from.latitude.to_radians(), to.latitude.to_radians());
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let half_chord =
        (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt())
}

/// Total length of a route in kilometers, resolving ids against `bins`.
///
/// Returns `None` when a stop cannot be resolved, which means the route was
/// computed from a different snapshot.
#[must_use]
pub fn route_distance_km(bins: &[BinRecord], route: &RouteSequence) -> Option<f64> {
    let mut total = 0.0;

    for pair in route.ids().windows(2) {
        let [from_id, to_id] = pair else {
            continue;
        };
        let from = bins.iter().find(|bin| &bin.id == from_id)?;
        let to = bins.iter().find(|bin| &bin.id == to_id)?;
        total += haversine_km(from, to);
    }

    Some(total)
}

fn validate(bins: &[BinRecord]) -> Result<(), RouteError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(bins.len());

    for bin in bins {
        let invalid = |reason: &str| RouteError::InvalidBinRecord {
            id: bin.id.0.clone(),
            reason: reason.to_owned(),
        };

        if !bin.latitude.is_finite() {
            return Err(invalid("latitude is not finite"));
        }
        if !(-90.0..=90.0).contains(&bin.latitude) {
            return Err(invalid("latitude out of range [-90, 90]"));
        }
        if !bin.longitude.is_finite() {
            return Err(invalid("longitude is not finite"));
        }
        if !(-180.0..=180.0).contains(&bin.longitude) {
            return Err(invalid("longitude out of range [-180, 180]"));
        }
        if !bin.fill_level.is_finite() {
            return Err(invalid("fill level is not finite"));
        }
        if !seen.insert(bin.id.0.as_str()) {
            return Err(RouteError::DuplicateBinId(bin.id.0.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BinId;

    fn bin(id: &str, latitude: f64, longitude: f64, fill_level: f64) -> BinRecord {
        BinRecord {
            id: BinId(id.to_owned()),
            latitude,
            longitude,
            fill_level,
        }
    }

    fn ids(route: &RouteSequence) -> Vec<&str> {
        route.iter().map(|id| id.0.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_empty_route() {
        let route = sequence(&[], &RouteOptions::default()).expect("empty input is valid");
        assert!(route.is_empty());
    }

    #[test]
    fn all_below_threshold_yields_empty_route() {
        let bins = vec![
            bin("B1", 50.0, 6.0, 30.0),
            bin("B2", 50.1, 6.1, 79.9),
            bin("B3", 50.2, 6.2, 80.0),
        ];

        let route = sequence(&bins, &RouteOptions::default()).expect("valid input");
        assert!(route.is_empty(), "threshold is strict, 80.0 is not eligible");
    }

    #[test]
    fn single_eligible_bin_routes_alone() {
        let bins = vec![bin("B1", 50.0, 6.0, 95.0), bin("B2", 50.1, 6.1, 10.0)];

        let route = sequence(&bins, &RouteOptions::default()).expect("valid input");
        assert_eq!(ids(&route), vec!["B1"]);
    }

    #[test]
    fn filters_to_eligible_and_seeds_with_first_in_input_order() {
        // Scenario: B1 at 50%, B2 at 90%, B3 at 85% -> route starts at B2.
        let bins = vec![
            bin("B1", 50.0, 6.0, 50.0),
            bin("B2", 50.1, 6.1, 90.0),
            bin("B3", 50.2, 6.2, 85.0),
        ];

        let route = sequence(&bins, &RouteOptions::default()).expect("valid input");
        assert_eq!(ids(&route), vec!["B2", "B3"]);
    }

    #[test]
    fn greedy_follows_nearest_neighbor() {
        // Bins on a line along the equator; nearest chain is B1 -> B2 -> B3.
        let bins = vec![
            bin("B1", 0.0, 0.0, 95.0),
            bin("B3", 0.0, 2.0, 95.0),
            bin("B2", 0.0, 1.0, 95.0),
        ];

        let route = sequence(&bins, &RouteOptions::default()).expect("valid input");
        assert_eq!(ids(&route), vec!["B1", "B2", "B3"]);
    }

    #[test]
    fn route_is_open_path_of_eligible_count() {
        let bins = vec![
            bin("B1", 0.0, 0.0, 95.0),
            bin("B2", 0.0, 1.0, 95.0),
            bin("B3", 0.0, 2.0, 60.0),
            bin("B4", 0.0, 3.0, 95.0),
        ];

        let route = sequence(&bins, &RouteOptions::default()).expect("valid input");
        assert_eq!(route.len(), 3, "one stop per eligible bin, no return leg");

        let unique: HashSet<&BinId> = route.iter().collect();
        assert_eq!(unique.len(), route.len(), "no revisits");
    }

    #[test]
    fn equidistant_candidates_break_ties_by_input_order() {
        // B2 and B3 are symmetric around the seed; first-seen B2 wins.
        let bins = vec![
            bin("B1", 0.0, 0.0, 95.0),
            bin("B2", 0.0, 1.0, 95.0),
            bin("B3", 0.0, -1.0, 95.0),
        ];

        let route = sequence(&bins, &RouteOptions::default()).expect("valid input");
        assert_eq!(ids(&route), vec!["B1", "B2", "B3"]);
    }

    #[test]
    fn colocated_bins_are_both_visited_in_stable_order() {
        let bins = vec![
            bin("B1", 0.0, 0.0, 95.0),
            bin("B2", 0.0, 1.0, 95.0),
            bin("B3", 0.0, 1.0, 95.0),
        ];

        let route = sequence(&bins, &RouteOptions::default()).expect("valid input");
        assert_eq!(ids(&route), vec!["B1", "B2", "B3"]);
    }

    #[test]
    fn identical_input_is_deterministic() {
        let bins = vec![
            bin("B1", 50.94, 6.96, 91.0),
            bin("B2", 50.95, 6.95, 88.0),
            bin("B3", 50.93, 6.97, 99.0),
            bin("B4", 50.96, 6.94, 85.0),
        ];

        let first = sequence(&bins, &RouteOptions::default()).expect("valid input");
        let second = sequence(&bins, &RouteOptions::default()).expect("valid input");
        assert_eq!(first, second);
    }

    #[test]
    fn custom_threshold_is_respected() {
        let bins = vec![bin("B1", 0.0, 0.0, 55.0), bin("B2", 0.0, 1.0, 45.0)];

        let options = RouteOptions { threshold: 50.0 };
        let route = sequence(&bins, &options).expect("valid input");
        assert_eq!(ids(&route), vec!["B1"]);
    }

    #[test]
    fn out_of_range_fill_levels_are_accepted() {
        // Range policing on fill levels is the source's job.
        let bins = vec![bin("B1", 0.0, 0.0, 150.0), bin("B2", 0.0, 1.0, -5.0)];

        let route = sequence(&bins, &RouteOptions::default()).expect("valid input");
        assert_eq!(ids(&route), vec!["B1"]);
    }

    #[test]
    fn nan_coordinate_is_rejected_naming_the_bin() {
        let bins = vec![
            bin("B1", 0.0, 0.0, 95.0),
            bin("B7", f64::NAN, 1.0, 95.0),
        ];

        let err = sequence(&bins, &RouteOptions::default()).expect_err("NaN must be rejected");
        match err {
            RouteError::InvalidBinRecord { id, .. } => assert_eq!(id, "B7"),
            RouteError::DuplicateBinId(_) => panic!("wrong error variant"),
        }
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let bins = vec![bin("B1", 91.0, 0.0, 95.0)];

        let err = sequence(&bins, &RouteOptions::default()).expect_err("latitude out of range");
        assert!(matches!(err, RouteError::InvalidBinRecord { .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let bins = vec![bin("B1", 0.0, 0.0, 95.0), bin("B1", 0.0, 1.0, 85.0)];

        let err = sequence(&bins, &RouteOptions::default()).expect_err("duplicate id");
        assert_eq!(err, RouteError::DuplicateBinId("B1".to_owned()));
    }

    #[test]
    fn haversine_matches_known_equator_distance() {
        // One degree of longitude on the equator is roughly 111.19 km.
        let from = bin("A", 0.0, 0.0, 0.0);
        let to = bin("B", 0.0, 1.0, 0.0);

        let dist = haversine_km(&from, &to);
        assert!((dist - 111.19).abs() < 0.5, "got {dist}");
    }

    #[test]
    fn route_distance_sums_leg_lengths() {
        let bins = vec![
            bin("B1", 0.0, 0.0, 95.0),
            bin("B2", 0.0, 1.0, 95.0),
            bin("B3", 0.0, 2.0, 95.0),
        ];

        let route = sequence(&bins, &RouteOptions::default()).expect("valid input");
        let total = route_distance_km(&bins, &route).expect("all stops resolvable");
        assert!((total - 2.0 * 111.19).abs() < 1.0, "got {total}");
    }

    #[test]
    fn route_distance_is_none_for_foreign_snapshot() {
        let bins = vec![bin("B1", 0.0, 0.0, 95.0), bin("B2", 0.0, 1.0, 95.0)];
        let route = sequence(&bins, &RouteOptions::default()).expect("valid input");

        let other = vec![bin("X1", 0.0, 0.0, 95.0)];
        assert!(route_distance_km(&other, &route).is_none());
    }
}

//! Rule Checkers: an ordered set of independent detectors over the entity
//! indices. Each checker is a pure function emitting zero or more issues
//! for one category; order only affects display order, never correctness.

pub mod hygiene;
pub mod inventory;
pub mod media;
pub mod pricing;

use chrono::{DateTime, Utc};

use crate::indices::EntityIndices;
use crate::overrides::OverrideMap;
use crate::types::{Issue, Seed};

/// Run every checker in display order and concatenate the results.
/// `now` is injected so expiry checks stay deterministic under test.
pub fn run_all(
    seeds: &[Seed],
    indices: &EntityIndices,
    overrides: &OverrideMap,
    now: DateTime<Utc>,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    issues.extend(media::missing_media(seeds, indices));
    issues.extend(hygiene::check(seeds, indices, overrides));
    issues.extend(inventory::check(seeds, indices, now));
    issues.extend(pricing::check(seeds, indices));
    issues
}

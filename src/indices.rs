//! Entity Index Builder: turns the flat entity collections into the lookup
//! structures the rule checkers scan. Rebuilt from scratch on every
//! recomputation pass; nothing here is cached across passes.

use std::collections::{BTreeMap, HashMap};

use crate::normalize::normalize_name;
use crate::types::{InventoryLot, PricingRecord, Seed, SeedImage};

/// Lookup structures keyed by owning seed id, plus the normalized-name
/// grouping used by the duplicate detectors.
#[derive(Debug, Default)]
pub struct EntityIndices<'a> {
    /// All media attachments per seed
    pub images_by_seed: HashMap<i64, Vec<&'a SeedImage>>,
    /// At most one tracked lot per seed; last write wins when the source
    /// data carries duplicates (flagging those is an upstream concern)
    pub inventory_by_seed: HashMap<i64, &'a InventoryLot>,
    /// At most one pricing row per seed; last write wins
    pub pricing_by_seed: HashMap<i64, &'a PricingRecord>,
    /// Seeds grouped by trimmed, lowercased name; empty names are skipped.
    /// Ordered map so duplicate-group emission order is stable across runs.
    pub seeds_by_normalized_name: BTreeMap<String, Vec<&'a Seed>>,
}

impl<'a> EntityIndices<'a> {
    /// Build all four indices in one pass per collection. Empty inputs
    /// simply produce empty maps.
    pub fn build(
        seeds: &'a [Seed],
        images: &'a [SeedImage],
        inventory: &'a [InventoryLot],
        pricing: &'a [PricingRecord],
    ) -> Self {
        let mut indices = EntityIndices::default();

        for img in images {
            indices
                .images_by_seed
                .entry(img.seed_id)
                .or_default()
                .push(img);
        }
        for lot in inventory {
            indices.inventory_by_seed.insert(lot.seed_id, lot);
        }
        for price in pricing {
            indices.pricing_by_seed.insert(price.seed_id, price);
        }
        for seed in seeds {
            let norm = normalize_name(&seed.name);
            if norm.is_empty() {
                continue;
            }
            indices
                .seeds_by_normalized_name
                .entry(norm)
                .or_default()
                .push(seed);
        }

        indices
    }

    /// Distinct normalized names in stable (sorted) order, for the
    /// pairwise near-duplicate scan.
    pub fn normalized_names(&self) -> Vec<&str> {
        self.seeds_by_normalized_name
            .keys()
            .map(String::as_str)
            .collect()
    }
}

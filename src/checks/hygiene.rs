//! Data hygiene checker: duplicate and near-duplicate names, near-duplicate
//! classification types, and the collapsed missing/invalid-field scan.
//!
//! The near-duplicate scans are pairwise over the *distinct* normalized
//! string sets (O(k²)); see `similarity` for the scaling notes.

use std::collections::BTreeSet;

use crate::indices::EntityIndices;
use crate::normalize::{is_blank, normalize_name, sku_looks_ok};
use crate::overrides::OverrideMap;
use crate::similarity::near_duplicate;
use crate::types::{EntityKind, Issue, IssueCategory, Remediation, Seed};

/// The fixed set of horticultural/metadata columns every catalog item must
/// carry. Order here is the order fields appear in the collapsed issue.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "botanical_name",
    "source",
    "sunlight",
    "plant_depth",
    "plant_spacing",
    "days_to_germinate",
    "plant_height",
    "days_to_bloom",
];

/// Run every data-hygiene rule in display order.
pub fn check(seeds: &[Seed], indices: &EntityIndices, overrides: &OverrideMap) -> Vec<Issue> {
    let mut issues = Vec::new();
    issues.extend(exact_duplicate_names(indices, overrides));
    issues.extend(near_duplicate_names(indices));
    issues.extend(near_duplicate_types(seeds));
    issues.extend(missing_or_invalid_fields(seeds));
    issues
}

/// One issue per normalized-name group with more than one member. Groups
/// with an acknowledged override keep their issue (the duplication is
/// still real) but the label is marked "(OK)" and the toggle flips back.
fn exact_duplicate_names(indices: &EntityIndices, overrides: &OverrideMap) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (norm, group) in &indices.seeds_by_normalized_name {
        if group.len() < 2 {
            continue;
        }
        let ids: Vec<i64> = group.iter().map(|s| s.id).collect();
        let acknowledged = overrides
            .get(norm)
            .map(|r| r.acknowledged)
            .unwrap_or(false);
        let suffix = if acknowledged { " (OK)" } else { "" };
        issues.push(Issue {
            key: format!("dup-name-{}", norm),
            category: IssueCategory::DataHygiene,
            label: format!("Duplicate seed name \"{}\"{}", group[0].name, suffix),
            hint: Some(format!(
                "IDs: {}",
                ids.iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            seed_ids: ids,
            remediation: Some(Remediation::ToggleOverride {
                key: norm.clone(),
                acknowledged: !acknowledged,
            }),
        });
    }
    issues
}

/// Informational issue for every pair of distinct normalized names within
/// edit distance 2. No remediation; merging is a human call.
fn near_duplicate_names(indices: &EntityIndices) -> Vec<Issue> {
    let names = indices.normalized_names();
    let mut issues = Vec::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            if near_duplicate(names[i], names[j]) {
                let display = |n: &str| {
                    indices.seeds_by_normalized_name[n][0].name.clone()
                };
                issues.push(Issue::info(
                    format!("near-name-{}-{}", names[i], names[j]),
                    IssueCategory::DataHygiene,
                    format!(
                        "Possible near-duplicate names: \"{}\" ↔ \"{}\"",
                        display(names[i]),
                        display(names[j])
                    ),
                    Vec::new(),
                ));
            }
        }
    }
    issues
}

/// Same scan over the distinct normalized classification types; keeps the
/// type dropdown options clean.
fn near_duplicate_types(seeds: &[Seed]) -> Vec<Issue> {
    let types: BTreeSet<String> = seeds
        .iter()
        .filter_map(|s| s.seed_type.as_deref())
        .map(normalize_name)
        .filter(|t| !t.is_empty())
        .collect();
    let types: Vec<&String> = types.iter().collect();

    let mut issues = Vec::new();
    for i in 0..types.len() {
        for j in (i + 1)..types.len() {
            if near_duplicate(types[i], types[j]) {
                issues.push(Issue::info(
                    format!("near-type-{}-{}", types[i], types[j]),
                    IssueCategory::DataHygiene,
                    format!(
                        "Possible near-duplicate types: \"{}\" ↔ \"{}\"",
                        types[i], types[j]
                    ),
                    Vec::new(),
                ));
            }
        }
    }
    issues
}

/// True when the seed is a heat-rated (pepper) variety and must carry a
/// scoville rating.
fn is_pepper(seed: &Seed) -> bool {
    seed.seed_type
        .as_deref()
        .map(|t| normalize_name(t) == "pepper")
        .unwrap_or(false)
        || seed.name.to_lowercase().contains("pepper")
}

/// Collect everything wrong with one seed's fields into at most one
/// collapsed issue: blank required columns, a malformed SKU, and a missing
/// scoville on pepper varieties. The remediation lists exactly the
/// offending fields so the inline editor renders only what is needed.
fn missing_or_invalid_fields(seeds: &[Seed]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for seed in seeds {
        let mut bad_fields: Vec<String> = Vec::new();

        for field in REQUIRED_FIELDS {
            let missing = match field {
                "botanical_name" => is_blank(seed.botanical_name.as_deref()),
                "source" => is_blank(seed.source.as_deref()),
                "sunlight" => is_blank(seed.sunlight.as_deref()),
                "plant_depth" => is_blank(seed.plant_depth.as_deref()),
                "plant_spacing" => is_blank(seed.plant_spacing.as_deref()),
                "plant_height" => is_blank(seed.plant_height.as_deref()),
                "days_to_germinate" => seed.days_to_germinate.is_none(),
                "days_to_bloom" => seed.days_to_bloom.is_none(),
                _ => false,
            };
            if missing {
                bad_fields.push(field.to_string());
            }
        }

        if !sku_looks_ok(seed.sku.as_deref()) {
            bad_fields.push("sku".to_string());
        }
        if is_pepper(seed) && seed.scoville.is_none() {
            bad_fields.push("scoville".to_string());
        }

        if bad_fields.is_empty() {
            continue;
        }

        let pretty: Vec<String> = bad_fields
            .iter()
            .map(|f| f.replace('_', " "))
            .collect();
        issues.push(Issue {
            key: format!("fields-{}", seed.id),
            category: IssueCategory::DataHygiene,
            label: format!("Missing or invalid fields — \"{}\"", seed.name),
            hint: Some(pretty.join(", ")),
            seed_ids: vec![seed.id],
            remediation: Some(Remediation::EditFields {
                entity: EntityKind::Seeds,
                fields: bad_fields,
            }),
        });
    }
    issues
}

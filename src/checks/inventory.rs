//! Inventory checker: every catalog item should have exactly one tracked
//! lot, and that lot should be complete, unexpired, and not flagged for
//! reorder.

use chrono::{DateTime, Utc};

use crate::indices::EntityIndices;
use crate::types::{EntityKind, Issue, IssueCategory, Remediation, Seed};

/// Lot columns the quick editor can fill inline.
const FILLABLE_FIELDS: [&str; 3] = ["amount_per_packet", "number_packets", "shelf_life_years"];

/// Run the inventory rules for every seed. A seed with no lot at all gets
/// a single "no inventory row" issue and no further checks.
pub fn check(seeds: &[Seed], indices: &EntityIndices, now: DateTime<Utc>) -> Vec<Issue> {
    let mut issues = Vec::new();

    for seed in seeds {
        let Some(lot) = indices.inventory_by_seed.get(&seed.id) else {
            issues.push(Issue {
                key: format!("inv-none-{}", seed.id),
                category: IssueCategory::Inventory,
                label: format!("No inventory row — \"{}\"", seed.name),
                hint: None,
                seed_ids: vec![seed.id],
                remediation: Some(Remediation::Notify {
                    context: format!(
                        "Seed \"{}\" (id {}) has no inventory row; create one from the inventory grid",
                        seed.name, seed.id
                    ),
                }),
            });
            continue;
        };

        let mut missing: Vec<String> = Vec::new();
        if lot.amount_per_packet.is_none() {
            missing.push(FILLABLE_FIELDS[0].to_string());
        }
        if lot.number_packets.is_none() {
            missing.push(FILLABLE_FIELDS[1].to_string());
        }
        if lot.shelf_life_years.is_none() {
            missing.push(FILLABLE_FIELDS[2].to_string());
        }
        if !missing.is_empty() {
            issues.push(Issue {
                key: format!("inv-fill-{}", seed.id),
                category: IssueCategory::Inventory,
                label: format!("Inventory fields missing — \"{}\"", seed.name),
                hint: Some(missing.join(", ").replace('_', " ")),
                seed_ids: vec![seed.id],
                remediation: Some(Remediation::EditFields {
                    entity: EntityKind::Inventory,
                    fields: missing,
                }),
            });
        }

        if let Some(expiration) = lot.expiration_date {
            if expiration < now {
                issues.push(Issue {
                    key: format!("inv-expired-{}", seed.id),
                    category: IssueCategory::Inventory,
                    label: format!("Expired inventory — \"{}\"", seed.name),
                    hint: Some(format!("Expired on {}", expiration.format("%Y-%m-%d"))),
                    seed_ids: vec![seed.id],
                    remediation: Some(Remediation::ClearExpiration),
                });
            }
        }

        if lot.buy_more == Some(true) {
            issues.push(Issue {
                key: format!("inv-buymore-{}", seed.id),
                category: IssueCategory::Inventory,
                label: format!("Buy more flagged — \"{}\"", seed.name),
                hint: None,
                seed_ids: vec![seed.id],
                remediation: Some(Remediation::MarkReorderResolved),
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InventoryLot;
    use chrono::TimeZone;

    fn seed(id: i64, name: &str) -> Seed {
        Seed { id, name: name.to_string(), ..Default::default() }
    }

    fn full_lot(id: i64, seed_id: i64) -> InventoryLot {
        InventoryLot {
            id,
            seed_id,
            amount_per_packet: Some(25.0),
            unit: Some("seeds".to_string()),
            number_packets: Some(4),
            shelf_life_years: Some(3.0),
            ..Default::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_missing_lot_emits_notify_issue() {
        let seeds = vec![seed(1, "Dill")];
        let indices = EntityIndices::build(&seeds, &[], &[], &[]);
        let issues = check(&seeds, &indices, now());

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "inv-none-1");
        assert!(matches!(issues[0].remediation, Some(Remediation::Notify { .. })));
    }

    #[test]
    fn test_incomplete_lot_lists_exactly_the_null_fields() {
        let seeds = vec![seed(1, "Dill")];
        let mut lot = full_lot(10, 1);
        lot.number_packets = None;
        lot.shelf_life_years = None;
        let lots = vec![lot];
        let indices = EntityIndices::build(&seeds, &[], &lots, &[]);

        let issues = check(&seeds, &indices, now());
        assert_eq!(issues.len(), 1);
        match &issues[0].remediation {
            Some(Remediation::EditFields { entity, fields }) => {
                assert_eq!(*entity, EntityKind::Inventory);
                assert_eq!(
                    fields,
                    &vec!["number_packets".to_string(), "shelf_life_years".to_string()]
                );
            }
            other => panic!("expected EditFields, got {:?}", other),
        }
    }

    #[test]
    fn test_expired_lot_offers_clear_expiration() {
        let seeds = vec![seed(1, "Dill")];
        let mut lot = full_lot(10, 1);
        lot.expiration_date = Some(Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap());
        let lots = vec![lot];
        let indices = EntityIndices::build(&seeds, &[], &lots, &[]);

        let issues = check(&seeds, &indices, now());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "inv-expired-1");
        assert_eq!(issues[0].hint.as_deref(), Some("Expired on 2025-01-15"));
        assert_eq!(issues[0].remediation, Some(Remediation::ClearExpiration));
    }

    #[test]
    fn test_future_expiration_is_not_flagged() {
        let seeds = vec![seed(1, "Dill")];
        let mut lot = full_lot(10, 1);
        lot.expiration_date = Some(Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());
        let lots = vec![lot];
        let indices = EntityIndices::build(&seeds, &[], &lots, &[]);
        assert!(check(&seeds, &indices, now()).is_empty());
    }

    #[test]
    fn test_buy_more_flag_offers_mark_resolved() {
        let seeds = vec![seed(1, "Dill")];
        let mut lot = full_lot(10, 1);
        lot.buy_more = Some(true);
        let lots = vec![lot];
        let indices = EntityIndices::build(&seeds, &[], &lots, &[]);

        let issues = check(&seeds, &indices, now());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "inv-buymore-1");
        assert_eq!(issues[0].remediation, Some(Remediation::MarkReorderResolved));
    }

    #[test]
    fn test_one_lot_can_raise_multiple_issues() {
        let seeds = vec![seed(1, "Dill")];
        let lot = InventoryLot {
            id: 10,
            seed_id: 1,
            buy_more: Some(true),
            expiration_date: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let lots = vec![lot];
        let indices = EntityIndices::build(&seeds, &[], &lots, &[]);

        let keys: Vec<String> = check(&seeds, &indices, now()).into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["inv-fill-1", "inv-expired-1", "inv-buymore-1"]);
    }
}

//! Pricing checker: every catalog item should have one pricing row with a
//! real retail price, and negative net profit gets surfaced for a human
//! decision.

use crate::indices::EntityIndices;
use crate::types::{EntityKind, Issue, IssueCategory, Remediation, Seed};

/// Run the pricing rules for every seed. A seed with no pricing row gets
/// a single "no pricing row" issue and no further checks.
pub fn check(seeds: &[Seed], indices: &EntityIndices) -> Vec<Issue> {
    let mut issues = Vec::new();

    for seed in seeds {
        let Some(price) = indices.pricing_by_seed.get(&seed.id) else {
            issues.push(Issue {
                key: format!("pr-none-{}", seed.id),
                category: IssueCategory::PricingProfit,
                label: format!("No pricing row — \"{}\"", seed.name),
                hint: None,
                seed_ids: vec![seed.id],
                remediation: Some(Remediation::Notify {
                    context: format!(
                        "Seed \"{}\" (id {}) has no pricing row; add cost and price figures",
                        seed.name, seed.id
                    ),
                }),
            });
            continue;
        };

        if price.retail_price.is_none() || price.retail_price == Some(0.0) {
            issues.push(Issue {
                key: format!("pr-retail-{}", seed.id),
                category: IssueCategory::PricingProfit,
                label: format!("Retail price missing/0 — \"{}\"", seed.name),
                hint: None,
                seed_ids: vec![seed.id],
                remediation: Some(Remediation::EditFields {
                    entity: EntityKind::Pricing,
                    fields: vec!["retail_price".to_string()],
                }),
            });
        }

        if let Some(profit) = price.net_profit {
            if profit < 0.0 {
                issues.push(Issue {
                    key: format!("pr-negative-{}", seed.id),
                    category: IssueCategory::PricingProfit,
                    label: format!("Negative net profit — \"{}\"", seed.name),
                    hint: Some(format!("Current: {:.2}", profit)),
                    seed_ids: vec![seed.id],
                    remediation: None,
                });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PricingRecord;

    fn seed(id: i64, name: &str) -> Seed {
        Seed { id, name: name.to_string(), ..Default::default() }
    }

    fn priced(id: i64, seed_id: i64, retail: Option<f64>, profit: Option<f64>) -> PricingRecord {
        PricingRecord {
            id,
            seed_id,
            retail_price: retail,
            net_profit: profit,
            inventory_id: None,
        }
    }

    #[test]
    fn test_missing_pricing_row_emits_notify_issue() {
        let seeds = vec![seed(1, "Cosmos")];
        let indices = EntityIndices::build(&seeds, &[], &[], &[]);
        let issues = check(&seeds, &indices);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "pr-none-1");
        assert!(matches!(issues[0].remediation, Some(Remediation::Notify { .. })));
    }

    #[test]
    fn test_null_and_zero_retail_price_both_flagged() {
        let seeds = vec![seed(1, "Cosmos"), seed(2, "Aster")];
        let pricing = vec![
            priced(10, 1, None, Some(1.0)),
            priced(11, 2, Some(0.0), Some(1.0)),
        ];
        let indices = EntityIndices::build(&seeds, &[], &[], &pricing);
        let keys: Vec<String> = check(&seeds, &indices).into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["pr-retail-1", "pr-retail-2"]);
    }

    #[test]
    fn test_negative_net_profit_is_informational() {
        let seeds = vec![seed(1, "Cosmos")];
        let pricing = vec![priced(10, 1, Some(3.50), Some(-0.75))];
        let indices = EntityIndices::build(&seeds, &[], &[], &pricing);

        let issues = check(&seeds, &indices);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "pr-negative-1");
        assert_eq!(issues[0].hint.as_deref(), Some("Current: -0.75"));
        assert!(issues[0].remediation.is_none());
    }

    #[test]
    fn test_healthy_pricing_row_passes() {
        let seeds = vec![seed(1, "Cosmos")];
        let pricing = vec![priced(10, 1, Some(3.50), Some(1.25))];
        let indices = EntityIndices::build(&seeds, &[], &[], &pricing);
        assert!(check(&seeds, &indices).is_empty());
    }
}

//! Issue Aggregator: runs the checkers over freshly built indices, groups
//! the output into the four fixed category buckets, and exposes the
//! collapsed/expanded section views the dashboard renders.
//!
//! Aggregation is a pure re-derivation. There is no retained issue state:
//! any change to the entity snapshots or the override map produces a fresh
//! issue set, so a fixed defect disappears on the next pass by
//! construction.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::checks;
use crate::indices::EntityIndices;
use crate::overrides::OverrideMap;
use crate::types::{InventoryLot, Issue, IssueCategory, PricingRecord, Seed, SeedImage};

/// Issues shown per section before the user expands it
pub const DEFAULT_SECTION_LIMIT: usize = 10;

/// Checker output grouped into the four fixed buckets, in display order.
/// Within a bucket, checker emission order is preserved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedIssues {
    #[serde(rename = "Media")]
    pub media: Vec<Issue>,
    #[serde(rename = "Data Hygiene")]
    pub data_hygiene: Vec<Issue>,
    #[serde(rename = "Inventory")]
    pub inventory: Vec<Issue>,
    #[serde(rename = "Pricing & Profit")]
    pub pricing_profit: Vec<Issue>,
}

impl GroupedIssues {
    fn from_issues(issues: Vec<Issue>) -> Self {
        let mut grouped = GroupedIssues::default();
        for issue in issues {
            match issue.category {
                IssueCategory::Media => grouped.media.push(issue),
                IssueCategory::DataHygiene => grouped.data_hygiene.push(issue),
                IssueCategory::Inventory => grouped.inventory.push(issue),
                IssueCategory::PricingProfit => grouped.pricing_profit.push(issue),
            }
        }
        grouped
    }

    /// All issues in one bucket, full list
    pub fn section(&self, category: IssueCategory) -> &[Issue] {
        match category {
            IssueCategory::Media => &self.media,
            IssueCategory::DataHygiene => &self.data_hygiene,
            IssueCategory::Inventory => &self.inventory,
            IssueCategory::PricingProfit => &self.pricing_profit,
        }
    }

    pub fn total(&self) -> usize {
        IssueCategory::ALL
            .iter()
            .map(|c| self.section(*c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Collapsed or expanded view of one section. Collapsed shows the
    /// first `limit` issues and reports how many remain hidden.
    pub fn section_view(
        &self,
        category: IssueCategory,
        limit: usize,
        expanded: bool,
    ) -> SectionView<'_> {
        let items = self.section(category);
        let shown = if expanded { items.len() } else { limit.min(items.len()) };
        SectionView {
            title: category.title(),
            total: items.len(),
            visible: &items[..shown],
            hidden_count: items.len() - shown,
        }
    }
}

/// What one dashboard section renders
#[derive(Debug, Clone, Serialize)]
pub struct SectionView<'a> {
    pub title: &'static str,
    pub total: usize,
    pub visible: &'a [Issue],
    pub hidden_count: usize,
}

/// Run every rule checker over the given snapshots and group the results.
///
/// `None` for seeds, inventory or pricing means "not loaded yet" and
/// short-circuits to an empty result (the original dashboard renders
/// nothing rather than a partial, misleading issue list). A missing image
/// collection degrades to "no seed has media", which the Media checker
/// then reports seed by seed.
///
/// Deterministic: identical inputs always produce the identical grouped
/// issue list, including ordering.
pub fn compute_issues(
    seeds: Option<&[Seed]>,
    images: Option<&[SeedImage]>,
    inventory: Option<&[InventoryLot]>,
    pricing: Option<&[PricingRecord]>,
    overrides: &OverrideMap,
    now: DateTime<Utc>,
) -> GroupedIssues {
    let (Some(seeds), Some(inventory), Some(pricing)) = (seeds, inventory, pricing) else {
        return GroupedIssues::default();
    };
    let images = images.unwrap_or(&[]);

    let indices = EntityIndices::build(seeds, images, inventory, pricing);
    let issues = checks::run_all(seeds, &indices, overrides, now);
    GroupedIssues::from_issues(issues)
}

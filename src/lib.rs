// Module declarations
pub mod aggregator;
pub mod checks;
pub mod engine;
pub mod errors;
pub mod indices;
pub mod normalize;
pub mod overrides;
pub mod remediation;
pub mod similarity;
pub mod store;
pub mod types;

// Re-exports for commonly used types
pub use aggregator::{compute_issues, GroupedIssues, SectionView, DEFAULT_SECTION_LIMIT};
pub use engine::DataQualityEngine;
pub use errors::{DataQualityError, DataQualityResult};
pub use overrides::{OverrideMap, OverrideStore};
pub use similarity::{levenshtein, near_duplicate};
pub use store::{StoreClient, StoreError, StoreResult, TaskTracker};
pub use types::{
    EntityKind, InventoryLot, Issue, IssueCategory, OverrideKind, OverrideRecord, PricingRecord,
    Remediation, Seed, SeedImage,
};

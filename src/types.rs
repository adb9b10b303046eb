use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single product/seed-type record as stored in the catalog grid
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Seed {
    /// Unique catalog identifier
    pub id: i64,
    /// Product code (alphanumeric and hyphens, 6-12 chars ignoring hyphens)
    pub sku: Option<String>,
    /// Display name; primary label used for duplicate detection
    pub name: String,
    /// Classification type (e.g. "Pepper", "Zinnia"), drives dropdown options
    #[serde(rename = "type")]
    pub seed_type: Option<String>,
    /// Broad category (vegetable, flower, herb, ...)
    pub category: Option<String>,
    /// Latin botanical name
    pub botanical_name: Option<String>,
    pub color: Option<String>,
    /// Whether the item is still offered
    pub is_active: Option<bool>,
    /// Supplier / seed source
    pub source: Option<String>,
    /// Sunlight requirement (full sun, partial shade, ...)
    pub sunlight: Option<String>,
    pub plant_depth: Option<String>,
    pub plant_spacing: Option<String>,
    pub plant_height: Option<String>,
    pub days_to_germinate: Option<i64>,
    pub days_to_bloom: Option<i64>,
    /// Heat-intensity rating; required for pepper varieties
    pub scoville: Option<i64>,
}

/// A media attachment (product photo) tied to one seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedImage {
    pub id: i64,
    pub seed_id: i64,
    /// Storage path within the external blob store
    pub image_path: String,
}

/// A tracked physical stock batch tied to one seed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryLot {
    pub id: i64,
    pub seed_id: i64,
    /// Quantity per unit (e.g. seeds per packet)
    pub amount_per_packet: Option<f64>,
    /// Unit label ("seeds", "grams", ...)
    pub unit: Option<String>,
    /// Number of packets on hand
    pub number_packets: Option<i64>,
    pub date_received: Option<NaiveDate>,
    pub shelf_life_years: Option<f64>,
    /// Derived upstream from date_received + shelf_life_years
    pub expiration_date: Option<DateTime<Utc>>,
    /// Needs-reorder flag set by the inventory grid
    pub buy_more: Option<bool>,
    pub notes: Option<String>,
}

/// Cost/price/profit figures tied to one seed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRecord {
    pub id: i64,
    pub seed_id: i64,
    pub retail_price: Option<f64>,
    /// Derived upstream; negative values are a business-decision signal
    pub net_profit: Option<f64>,
    /// Linked inventory lot, when the pricing row tracks one
    pub inventory_id: Option<i64>,
}

/// Kind discriminant for override records; keyed with a rule-specific string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverrideKind {
    /// "This duplicate name pair is acceptable", keyed by normalized name
    #[serde(rename = "duplicate_name")]
    DuplicateName,
}

impl OverrideKind {
    /// Stable string form used as the persisted discriminant
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideKind::DuplicateName => "duplicate_name",
        }
    }
}

/// A persisted human acknowledgment that a detected condition is acceptable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideRecord {
    /// None until the row has been persisted by the store
    #[serde(default)]
    pub id: Option<i64>,
    pub kind: OverrideKind,
    /// Rule-specific key; for DuplicateName this is the normalized name
    pub key: String,
    /// The seeds the override applies to
    pub seed_ids: Vec<i64>,
    /// True once a human has marked the condition as acceptable
    pub acknowledged: bool,
    pub note: Option<String>,
}

/// Issue category buckets, fixed display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    #[serde(rename = "Media")]
    Media,
    #[serde(rename = "Data Hygiene")]
    DataHygiene,
    #[serde(rename = "Inventory")]
    Inventory,
    #[serde(rename = "Pricing & Profit")]
    PricingProfit,
}

impl IssueCategory {
    /// All categories in display order
    pub const ALL: [IssueCategory; 4] = [
        IssueCategory::Media,
        IssueCategory::DataHygiene,
        IssueCategory::Inventory,
        IssueCategory::PricingProfit,
    ];

    /// Human-readable section title
    pub fn title(&self) -> &'static str {
        match self {
            IssueCategory::Media => "Media",
            IssueCategory::DataHygiene => "Data Hygiene",
            IssueCategory::Inventory => "Inventory",
            IssueCategory::PricingProfit => "Pricing & Profit",
        }
    }
}

/// Entity kinds understood by the storage collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "seeds")]
    Seeds,
    #[serde(rename = "seed_images")]
    SeedImages,
    #[serde(rename = "inventory")]
    Inventory,
    #[serde(rename = "costs_and_pricing")]
    Pricing,
    #[serde(rename = "dup_overrides")]
    Overrides,
}

impl EntityKind {
    /// Table/collection name used by the storage collaborator
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Seeds => "seeds",
            EntityKind::SeedImages => "seed_images",
            EntityKind::Inventory => "inventory",
            EntityKind::Pricing => "costs_and_pricing",
            EntityKind::Overrides => "dup_overrides",
        }
    }
}

/// Describes the inline fix an issue supports, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Remediation {
    /// Accept new media attachment(s) for the seed
    AttachMedia,
    /// Flip the acknowledgment on a duplicate-name override
    ToggleOverride {
        key: String,
        /// The acknowledgment state the toggle will set
        acknowledged: bool,
    },
    /// Inline-edit exactly these fields on the owning entity
    EditFields {
        entity: EntityKind,
        fields: Vec<String>,
    },
    /// Null out a stale expiration date
    ClearExpiration,
    /// Clear the needs-reorder flag
    MarkReorderResolved,
    /// Create an external task instead of a direct fix
    Notify { context: String },
}

/// One detected defect; ephemeral, re-derived on every pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Stable key derived from the rule and the offending records
    pub key: String,
    pub category: IssueCategory,
    pub label: String,
    /// Secondary detail line shown under the label
    pub hint: Option<String>,
    /// The seed(s) this issue concerns; empty for type-level issues
    pub seed_ids: Vec<i64>,
    pub remediation: Option<Remediation>,
}

impl Issue {
    /// Issue without hint or remediation (the common informational case)
    pub fn info(key: String, category: IssueCategory, label: String, seed_ids: Vec<i64>) -> Self {
        Self {
            key,
            category,
            label,
            hint: None,
            seed_ids,
            remediation: None,
        }
    }
}

//! Media checker: every catalog item should carry at least one photo.

use crate::indices::EntityIndices;
use crate::types::{Issue, IssueCategory, Remediation, Seed};

/// One Media issue per seed with zero attachments, remediable by
/// accepting new attachment(s) for that seed.
pub fn missing_media(seeds: &[Seed], indices: &EntityIndices) -> Vec<Issue> {
    let mut issues = Vec::new();
    for seed in seeds {
        let has_media = indices
            .images_by_seed
            .get(&seed.id)
            .map(|imgs| !imgs.is_empty())
            .unwrap_or(false);
        if !has_media {
            issues.push(Issue {
                key: format!("media-nopic-{}", seed.id),
                category: IssueCategory::Media,
                label: format!("Missing pictures — \"{}\"", seed.name),
                hint: None,
                seed_ids: vec![seed.id],
                remediation: Some(Remediation::AttachMedia),
            });
        }
    }
    issues
}

//! String normalization helpers shared by the duplicate detectors and the
//! required-field checks. Normalization here is deliberately simple
//! (trim + ASCII-insensitive lowercase); the distance function in
//! `similarity` expects its inputs to have gone through `normalize_name`.

/// Normalize a display name or classification type for comparison:
/// trim surrounding whitespace and lowercase.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// True when an optional string field counts as missing for the
/// required-field check (absent, empty, or whitespace-only).
pub fn is_blank(value: Option<&str>) -> bool {
    match value {
        Some(s) => s.trim().is_empty(),
        None => true,
    }
}

/// Bounds for the SKU shape check, measured with hyphens stripped.
pub const SKU_MIN_LEN: usize = 6;
pub const SKU_MAX_LEN: usize = 12;

/// SKU shape check: alphanumeric-and-hyphen only, and 6..=12 characters
/// once hyphens are removed. `None` or empty never passes.
pub fn sku_looks_ok(sku: Option<&str>) -> bool {
    let Some(sku) = sku else { return false };
    if sku.is_empty() {
        return false;
    }
    if !sku.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return false;
    }
    let bare = sku.chars().filter(|c| *c != '-').count();
    (SKU_MIN_LEN..=SKU_MAX_LEN).contains(&bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_trims_and_lowercases() {
        assert_eq!(normalize_name("  Sunflower "), "sunflower");
        assert_eq!(normalize_name("PEPPER - Ghost"), "pepper - ghost");
    }

    #[test]
    fn test_is_blank_covers_none_empty_and_whitespace() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("   ")));
        assert!(!is_blank(Some("full sun")));
    }

    #[test]
    fn test_sku_accepts_dashed_alphanumeric_within_bounds() {
        assert!(sku_looks_ok(Some("GHP-001234")));
        assert!(sku_looks_ok(Some("ABC123")));
        assert!(sku_looks_ok(Some("A1B2C3D4E5F6")));
    }

    #[test]
    fn test_sku_rejects_missing_short_long_and_bad_chars() {
        assert!(!sku_looks_ok(None));
        assert!(!sku_looks_ok(Some("")));
        assert!(!sku_looks_ok(Some("AB-12"))); // 4 chars without hyphens
        assert!(!sku_looks_ok(Some("A1B2C3D4E5F6G"))); // 13 chars
        assert!(!sku_looks_ok(Some("GHP 001234"))); // space
        assert!(!sku_looks_ok(Some("GHP_001234"))); // underscore
    }

    #[test]
    fn test_sku_hyphens_do_not_count_toward_length() {
        // 6 alphanumerics spread over hyphens still passes
        assert!(sku_looks_ok(Some("A-B-C-1-2-3")));
        // 5 alphanumerics padded with hyphens still fails
        assert!(!sku_looks_ok(Some("A-B-C-1-2")));
    }
}

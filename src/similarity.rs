//! Approximate String Matching for Catalog Deduplication
//!
//! This module implements the edit-distance primitive behind the
//! near-duplicate detectors in `checks::hygiene`.
//!
//! ## Mathematical Foundation
//!
//! ### Levenshtein Distance
//!
//! The Levenshtein distance between two strings is the minimum number of
//! single-character insertions, deletions, or substitutions required to
//! transform one into the other.
//!
//! **Properties:**
//! - `distance(a, a) == 0` (identity)
//! - `distance(a, b) == distance(b, a)` (symmetry)
//! - `distance(a, b) <= distance(a, c) + distance(c, b)` (triangle inequality)
//! - `distance("", b) == b.len()` in characters
//!
//! ### Implementation
//!
//! Standard dynamic-programming formulation with a single rolling row:
//! O(n·m) time, O(m) space. At catalog scale (hundreds to low thousands of
//! names) the O(k²) pairwise scan over distinct names that sits on top of
//! this completes in well under a millisecond. Past a few thousand distinct
//! names the scan should be prefiltered (e.g. bucket by length, since
//! |len(a) - len(b)| is a lower bound on the distance) before falling back
//! to the full DP.
//!
//! Comparison operates on Unicode scalar values. No normalization happens
//! here; callers pre-normalize with `normalize::normalize_name` (trim +
//! lowercase) before comparing.

/// Inclusive upper bound on the edit distance that still counts as a
/// near-duplicate for the data hygiene checks.
pub const NEAR_DUPLICATE_MAX_DISTANCE: usize = 2;

/// Compute the Levenshtein distance between two strings.
///
/// Fast paths: identical strings return 0 and an empty side returns the
/// character length of the other, both without allocating.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // dp[j] holds the distance between a[..i] and b[..j] as rows advance
    let mut dp: Vec<usize> = (0..=n).collect();
    for i in 1..=m {
        let mut prev = dp[0]; // dp[i-1][j-1] before this row overwrites it
        dp[0] = i;
        for j in 1..=n {
            let tmp = dp[j];
            let substitution_cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            dp[j] = (dp[j] + 1) // deletion
                .min(dp[j - 1] + 1) // insertion
                .min(prev + substitution_cost); // substitution
            prev = tmp;
        }
    }
    dp[n]
}

/// True when two *distinct* normalized strings are close enough to flag as
/// near-duplicates: edit distance in `[1, NEAR_DUPLICATE_MAX_DISTANCE]`.
/// Identical strings are exact duplicates, handled by a separate check.
pub fn near_duplicate(a: &str, b: &str) -> bool {
    let d = levenshtein(a, b);
    d > 0 && d <= NEAR_DUPLICATE_MAX_DISTANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_have_zero_distance() {
        assert_eq!(levenshtein("zinnia", "zinnia"), 0);
        assert_eq!(levenshtein("", ""), 0);
    }

    #[test]
    fn test_empty_string_distance_is_other_length() {
        assert_eq!(levenshtein("", "marigold"), 8);
        assert_eq!(levenshtein("marigold", ""), 8);
    }

    #[test]
    fn test_known_distances() {
        assert_eq!(levenshtein("zinnia", "zinia"), 1); // deletion
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("pepper", "peppers"), 1); // insertion
        assert_eq!(levenshtein("basil", "basel"), 1); // substitution
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("zinnia", "zinia"),
            ("sunflower", "sunflowers"),
            ("tomato", "potato"),
            ("", "chive"),
        ];
        for (a, b) in pairs {
            assert_eq!(levenshtein(a, b), levenshtein(b, a), "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_triangle_inequality_samples() {
        let triples = [
            ("zinnia", "zinia", "zinnias"),
            ("pepper", "paper", "piper"),
            ("marigold", "merigold", "marigolds"),
            ("", "ab", "abcd"),
        ];
        for (a, b, c) in triples {
            let ab = levenshtein(a, b);
            let ac = levenshtein(a, c);
            let cb = levenshtein(c, b);
            assert!(ab <= ac + cb, "triangle failed for ({}, {}, {})", a, b, c);
        }
    }

    #[test]
    fn test_multibyte_characters_count_as_single_edits() {
        // jalapeño vs jalapeno: one substitution, not a byte-level mess
        assert_eq!(levenshtein("jalapeño", "jalapeno"), 1);
    }

    #[test]
    fn test_near_duplicate_within_threshold_only() {
        assert!(near_duplicate("zinnia", "zinia")); // distance 1
        assert!(near_duplicate("cosmos", "cosmoss")); // distance 1
        assert!(near_duplicate("chive", "chivas")); // distance 2
        assert!(!near_duplicate("zinnia", "zinnia")); // exact, not near
        assert!(!near_duplicate("zinnia", "marigold")); // distance > 2
    }
}

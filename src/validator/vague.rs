//! Vague language detection for PRD text.
//!
//! A fixed list of terms is flagged as insufficiently measurable for a
//! requirement. Matching is word-boundary, case-insensitive, and tolerates
//! a "should be" / "must be" / "needs to be" prefix.

use regex::Regex;

/// Terms flagged as too vague to be testable.
pub const VAGUE_TERMS: &[&str] = &[
    "fast",
    "quick",
    "slow",
    "good",
    "bad",
    "poor",
    "user-friendly",
    "easy",
    "simple",
    "secure",
    "safe",
    "scalable",
    "flexible",
    "performant",
    "efficient",
];

fn vague_regex() -> Option<Regex> {
    let pattern = format!(
        r"(?i)\b(?:should\s+be\s+|must\s+be\s+|needs?\s+to\s+be\s+)?({})\b",
        VAGUE_TERMS.join("|")
    );
    Regex::new(&pattern).ok()
}

/// Find every vague term occurrence in `text`, in document order.
///
/// Returns the captured terms as they appear in the text (original casing,
/// without any "should be" prefix). Occurrences are not deduplicated.
pub fn find_vague_terms(text: &str) -> Vec<String> {
    let Some(re) = vague_regex() else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Deduplicate found terms, preserving first-occurrence order.
pub fn distinct_terms(found: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    found
        .iter()
        .filter(|t| seen.insert(t.as_str()))
        .cloned()
        .collect()
}

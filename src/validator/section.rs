//! Markdown section helpers for PRD analysis.
//!
//! Section lookup is a linear scan over heading lines; no full markdown
//! parser is involved. A section opens at the first heading whose visible
//! text contains the requested name (case-insensitive) and closes at the
//! next heading of equal or higher level.

use regex::Regex;

/// Parse a markdown heading line into `(level, title)`.
///
/// Accepts levels 1-6. The `#` run must be followed by whitespace.
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    Some((hashes, rest.trim_start()))
}

/// Check whether a heading (level 1-3) containing `name` exists.
///
/// Matching is case-insensitive substring match on the whole heading line.
pub fn has_section(text: &str, name: &str) -> bool {
    let pattern = format!(r"(?im)^#{{1,3}}\s+.*{}.*$", regex::escape(name));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

/// Extract the content under the first heading containing `name`.
///
/// Capture opens at the matching heading's level and continues until a later
/// heading of equal or higher level (exclusive) or end of document. Deeper
/// headings are captured as content. A deeper heading that itself contains
/// `name` re-anchors the capture at its own level. Returns an empty string
/// when no heading matches.
pub fn section_content(text: &str, name: &str) -> String {
    let needle = name.to_lowercase();
    let mut capturing = false;
    let mut level = 0usize;
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some((hlevel, title)) = parse_heading(line) {
            if title.to_lowercase().contains(&needle) {
                capturing = true;
                level = hlevel;
                continue;
            }
            if capturing {
                if hlevel <= level {
                    break;
                }
                lines.push(line);
            }
        } else if capturing {
            lines.push(line);
        }
    }

    lines.join("\n").trim().to_string()
}

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_section_case_insensitive() {
        let text = "# Intro\n\n## executive SUMMARY\n\nBody.";
        assert!(has_section(text, "Executive Summary"));
    }

    #[test]
    fn test_has_section_substring_match() {
        let text = "## 3. Executive Summary (draft)\n";
        assert!(has_section(text, "Executive Summary"));
    }

    #[test]
    fn test_has_section_missing() {
        assert!(!has_section("# Intro\nNothing here.", "Goals"));
    }

    #[test]
    fn test_has_section_ignores_deep_headings() {
        // Only levels 1-3 count as sections.
        let text = "#### Executive Summary\nBody.";
        assert!(!has_section(text, "Executive Summary"));
    }

    #[test]
    fn test_section_content_basic() {
        let text = "## Goals\n\nShip it.\n\n## Next\nOther.";
        assert_eq!(section_content(text, "Goals"), "Ship it.");
    }

    #[test]
    fn test_section_content_includes_subheadings() {
        let text = "## Problem Statement\nIntro.\n### User Impact\nUsers wait.\n## Goals\nX.";
        let content = section_content(text, "Problem Statement");
        assert!(content.contains("Intro."));
        assert!(content.contains("### User Impact"));
        assert!(content.contains("Users wait."));
        assert!(!content.contains("Goals"));
    }

    #[test]
    fn test_section_content_stops_at_same_level() {
        let text = "## Goals\nA.\n## Out of Scope\nB.";
        assert_eq!(section_content(text, "Goals"), "A.");
    }

    #[test]
    fn test_section_content_stops_at_higher_level() {
        let text = "## Goals\nA.\n# Appendix\nB.";
        assert_eq!(section_content(text, "Goals"), "A.");
    }

    #[test]
    fn test_section_content_runs_to_end() {
        let text = "Intro.\n## Out of Scope\nNo mobile app.\nNo billing.";
        assert_eq!(
            section_content(text, "Out of Scope"),
            "No mobile app.\nNo billing."
        );
    }

    #[test]
    fn test_section_content_missing_returns_empty() {
        assert_eq!(section_content("# Title\nBody.", "Goals"), "");
    }

    #[test]
    fn test_heading_requires_space_after_hashes() {
        // "##Goals" is not a heading, so nothing opens a section.
        assert_eq!(section_content("##Goals\nA.", "Goals"), "");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("one two  three\nfour"), 4);
    }
}

//! The fixed PRD quality checklist.
//!
//! Thirteen checks in two categories: nine "required" checks worth 5 points
//! each and four "taskmaster" checks worth 3 points each. The checklist is a
//! declarative table of check definitions so individual predicates can be
//! unit tested and checks added or removed without touching the scoring
//! arithmetic.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;

use super::section::{has_section, section_content, word_count};
use super::vague::find_vague_terms;

/// Check category, which determines its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Core PRD quality (5 points each)
    Required,
    /// Taskmaster-readiness (3 points each)
    Taskmaster,
}

/// Result of evaluating one check predicate.
pub struct Outcome {
    pub passed: bool,
    pub detail: String,
}

impl Outcome {
    fn new(passed: bool, detail: impl Into<String>) -> Self {
        Self {
            passed,
            detail: detail.into(),
        }
    }
}

/// One entry in the fixed checklist.
pub struct CheckDef {
    pub id: u32,
    pub category: Category,
    pub name: &'static str,
    pub points: u32,
    pub eval: fn(&DocScan) -> Outcome,
}

/// Pre-extracted document context shared by all check predicates.
///
/// Sections are extracted once so each predicate stays a cheap pure
/// function over strings.
pub struct DocScan<'a> {
    pub text: &'a str,
    pub exec_summary: String,
    pub problem: String,
    pub goals: String,
    pub stories: String,
    pub requirements: String,
    pub technical: String,
    pub non_functional: String,
    pub out_of_scope: String,
}

impl<'a> DocScan<'a> {
    pub fn new(text: &'a str) -> Self {
        // Check 6/7 fall back to a generic Requirements section when there
        // is no Functional Requirements heading.
        let mut requirements = section_content(text, "Functional Requirements");
        if requirements.is_empty() {
            requirements = section_content(text, "Requirements");
        }
        Self {
            text,
            exec_summary: section_content(text, "Executive Summary"),
            problem: section_content(text, "Problem Statement"),
            goals: section_content(text, "Goals"),
            stories: section_content(text, "User Stories"),
            requirements,
            technical: section_content(text, "Technical"),
            non_functional: section_content(text, "Non-Functional"),
            out_of_scope: section_content(text, "Out of Scope"),
        }
    }

    /// Count distinct `REQ-NNN` requirement IDs in the whole document.
    pub fn requirement_count(&self) -> usize {
        matches_of(r"REQ-\d{3}", self.text)
            .into_iter()
            .collect::<HashSet<_>>()
            .len()
    }
}

fn matches_of(pattern: &str, text: &str) -> Vec<String> {
    match Regex::new(pattern) {
        Ok(re) => re
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn is_match(pattern: &str, text: &str) -> bool {
    Regex::new(pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

// ============================================================================
// CHECK PREDICATES
// ============================================================================

fn check_exec_summary(doc: &DocScan) -> Outcome {
    let wc = word_count(&doc.exec_summary);
    let passed = has_section(doc.text, "Executive Summary") && (20..=500).contains(&wc);
    let detail = if doc.exec_summary.is_empty() {
        "Section missing".to_string()
    } else {
        format!("Found {} words", wc)
    };
    Outcome::new(passed, detail)
}

fn check_user_impact(doc: &DocScan) -> Outcome {
    let found = is_match(r"(?i)user\s+impact|who\s+is\s+affected|pain\s+point", &doc.problem)
        || has_section(doc.text, "User Impact");
    Outcome::new(
        found,
        if found {
            "User impact found"
        } else {
            "No user impact section"
        },
    )
}

fn check_business_impact(doc: &DocScan) -> Outcome {
    let found = is_match(r"(?i)business\s+impact|revenue|cost|strategic", &doc.problem)
        || has_section(doc.text, "Business Impact");
    Outcome::new(
        found,
        if found {
            "Business impact found"
        } else {
            "No business impact section"
        },
    )
}

fn check_smart_goals(doc: &DocScan) -> Outcome {
    let found = is_match(r"(?i)metric|baseline|target|timeframe|measurement", &doc.goals);
    Outcome::new(
        found,
        if found {
            "SMART elements found"
        } else {
            "Goals lack measurable metrics"
        },
    )
}

fn check_story_criteria(doc: &DocScan) -> Outcome {
    let ac_counts = story_criteria_counts(&doc.stories);
    if ac_counts.is_empty() {
        // Minimal PRDs have no story blocks; the check passes vacuously.
        return Outcome::new(true, "No user stories found (may be minimal PRD)");
    }
    let passed = ac_counts.iter().all(|&c| c >= 3);
    Outcome::new(
        passed,
        format!("Stories: {}, AC counts: {:?}", ac_counts.len(), ac_counts),
    )
}

/// Count checkbox acceptance criteria per `### Story N` block.
pub fn story_criteria_counts(stories_section: &str) -> Vec<usize> {
    let splitter = match Regex::new(r"###\s+Story\s+\d+") {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    splitter
        .split(stories_section)
        .skip(1) // text before the first story heading
        .map(|block| matches_of(r"- \[[ x]\]", block).len())
        .collect()
}

fn check_testable_requirements(doc: &DocScan) -> Outcome {
    let vague = find_vague_terms(&doc.requirements);
    if vague.is_empty() {
        Outcome::new(true, "All requirements are specific")
    } else {
        Outcome::new(false, format!("Vague terms found: {:?}", vague))
    }
}

fn check_priorities(doc: &DocScan) -> Outcome {
    let found = is_match(
        r"(?i)must\s+have|should\s+have|could\s+have|nice\s+to\s+have|P0|P1|P2",
        &doc.requirements,
    );
    Outcome::new(
        found,
        if found {
            "Priority labels found"
        } else {
            "No priority classification found"
        },
    )
}

fn check_numbered_requirements(doc: &DocScan) -> Outcome {
    let count = doc.requirement_count();
    if count > 0 {
        Outcome::new(true, format!("Found {} numbered requirements", count))
    } else {
        Outcome::new(false, "No REQ-NNN numbering found")
    }
}

fn check_architecture(doc: &DocScan) -> Outcome {
    let found = is_match(
        r"(?i)architecture|system\s+design|component|integration|diagram",
        &doc.technical,
    );
    Outcome::new(
        found,
        if found {
            "Architecture content found"
        } else {
            "No architectural detail found"
        },
    )
}

fn check_nfr_targets(doc: &DocScan) -> Outcome {
    let found = is_match(
        r"(?i)\d+\s*(ms|seconds?|minutes?|%|MB|GB|requests?/s)",
        &doc.non_functional,
    );
    // Vacuously passes when the section is absent.
    let passed = found || doc.non_functional.is_empty();
    Outcome::new(
        passed,
        if found {
            "Specific targets found"
        } else {
            "No measurable NFR targets"
        },
    )
}

fn check_task_hints(doc: &DocScan) -> Outcome {
    let found = is_match(r"(?i)task\s+breakdown|implementation\s+step|~\d+h", doc.text);
    Outcome::new(
        found,
        if found {
            "Task breakdown hints found"
        } else {
            "No task breakdown hints"
        },
    )
}

fn check_dependencies(doc: &DocScan) -> Outcome {
    let found = is_match(
        r"(?i)dependenc|depends\s+on|blocked\s+by|prerequisite|REQ-\d{3}.*depends",
        doc.text,
    );
    Outcome::new(
        found,
        if found {
            "Dependencies documented"
        } else {
            "No dependency information found"
        },
    )
}

fn check_out_of_scope(doc: &DocScan) -> Outcome {
    let has = has_section(doc.text, "Out of Scope");
    let passed = has && doc.out_of_scope.len() > 10;
    Outcome::new(
        passed,
        if has {
            "Out of scope section found"
        } else {
            "No Out of Scope section"
        },
    )
}

// ============================================================================
// THE CHECKLIST
// ============================================================================

/// The fixed checklist, in evaluation order. Not configurable at runtime.
pub const CHECKLIST: &[CheckDef] = &[
    CheckDef {
        id: 1,
        category: Category::Required,
        name: "Executive summary exists",
        points: 5,
        eval: check_exec_summary,
    },
    CheckDef {
        id: 2,
        category: Category::Required,
        name: "Problem statement includes user impact",
        points: 5,
        eval: check_user_impact,
    },
    CheckDef {
        id: 3,
        category: Category::Required,
        name: "Problem statement includes business impact",
        points: 5,
        eval: check_business_impact,
    },
    CheckDef {
        id: 4,
        category: Category::Required,
        name: "Goals have SMART metrics",
        points: 5,
        eval: check_smart_goals,
    },
    CheckDef {
        id: 5,
        category: Category::Required,
        name: "User stories have acceptance criteria (min 3)",
        points: 5,
        eval: check_story_criteria,
    },
    CheckDef {
        id: 6,
        category: Category::Required,
        name: "Functional requirements are testable",
        points: 5,
        eval: check_testable_requirements,
    },
    CheckDef {
        id: 7,
        category: Category::Required,
        name: "Requirements have priority labels",
        points: 5,
        eval: check_priorities,
    },
    CheckDef {
        id: 8,
        category: Category::Required,
        name: "Requirements are numbered (REQ-NNN)",
        points: 5,
        eval: check_numbered_requirements,
    },
    CheckDef {
        id: 9,
        category: Category::Required,
        name: "Technical considerations address architecture",
        points: 5,
        eval: check_architecture,
    },
    CheckDef {
        id: 10,
        category: Category::Taskmaster,
        name: "Non-functional requirements have specific targets",
        points: 3,
        eval: check_nfr_targets,
    },
    CheckDef {
        id: 11,
        category: Category::Taskmaster,
        name: "Requirements have task breakdown hints",
        points: 3,
        eval: check_task_hints,
    },
    CheckDef {
        id: 12,
        category: Category::Taskmaster,
        name: "Dependencies identified for task sequencing",
        points: 3,
        eval: check_dependencies,
    },
    CheckDef {
        id: 13,
        category: Category::Taskmaster,
        name: "Out of scope explicitly defined",
        points: 3,
        eval: check_out_of_scope,
    },
];

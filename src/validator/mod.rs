//! PRD quality scoring.
//!
//! The validator is a pure function of the document text: it runs the fixed
//! checklist from [`checks`], applies a capped penalty for vague language,
//! and produces an immutable [`Report`].

pub mod checks;
pub mod section;
pub mod vague;

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use checks::{Category, DocScan, CHECKLIST};

/// One evaluated checklist entry.
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub id: u32,
    pub category: Category,
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
    pub points: u32,
}

/// Advisory finding. Does not fail any check, but vague-language findings
/// contribute to the capped score penalty.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    VagueLanguage { term: String, suggestion: String },
    MissingDetail { item: String, suggestion: String },
}

/// Letter grade derived from the score percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    #[serde(rename = "EXCELLENT")]
    Excellent,
    #[serde(rename = "GOOD")]
    Good,
    #[serde(rename = "ACCEPTABLE")]
    Acceptable,
    #[serde(rename = "NEEDS_WORK")]
    NeedsWork,
}

impl Grade {
    /// Map a raw (unrounded) percentage to a grade.
    ///
    /// Thresholds are inclusive lower bounds; a value exactly on a boundary
    /// takes the higher grade.
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 91.0 {
            Grade::Excellent
        } else if pct >= 83.0 {
            Grade::Good
        } else if pct >= 75.0 {
            Grade::Acceptable
        } else {
            Grade::NeedsWork
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "EXCELLENT"),
            Self::Good => write!(f, "GOOD"),
            Self::Acceptable => write!(f, "ACCEPTABLE"),
            Self::NeedsWork => write!(f, "NEEDS_WORK"),
        }
    }
}

/// The full validation report for one document.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub score: i64,
    pub max_score: u32,
    /// Percentage rounded to one decimal place (grading uses the raw value).
    pub percentage: f64,
    pub grade: Grade,
    pub checks_passed: usize,
    pub checks_total: usize,
    pub checks: Vec<Check>,
    pub warnings: Vec<Warning>,
    pub vague_penalty: u32,
}

/// Run the full checklist against PRD text.
pub fn validate_text(text: &str) -> Report {
    let doc = DocScan::new(text);

    let checks: Vec<Check> = CHECKLIST
        .iter()
        .map(|def| {
            let outcome = (def.eval)(&doc);
            Check {
                id: def.id,
                category: def.category,
                name: def.name,
                passed: outcome.passed,
                detail: outcome.detail,
                points: def.points,
            }
        })
        .collect();

    // Vague-language penalty: every occurrence anywhere in the document
    // counts, capped at 5.
    let all_vague = vague::find_vague_terms(text);
    let vague_penalty = (all_vague.len() as u32).min(5);

    let mut warnings: Vec<Warning> = vague::distinct_terms(&all_vague)
        .into_iter()
        .map(|term| Warning::VagueLanguage {
            suggestion: format!("Replace '{}' with a specific, measurable target", term),
            term,
        })
        .collect();

    if !section::has_section(text, "Validation Checkpoint") {
        warnings.push(Warning::MissingDetail {
            item: "Validation checkpoints".to_string(),
            suggestion: "Add validation checkpoints for each implementation phase".to_string(),
        });
    }

    let max_score: u32 = checks.iter().map(|c| c.points).sum();
    let earned: u32 = checks.iter().filter(|c| c.passed).map(|c| c.points).sum();
    let score = (earned as i64 - vague_penalty as i64).max(0);

    let pct = if max_score > 0 {
        score as f64 / max_score as f64 * 100.0
    } else {
        0.0
    };

    Report {
        score,
        max_score,
        percentage: (pct * 10.0).round() / 10.0,
        grade: Grade::from_percentage(pct),
        checks_passed: checks.iter().filter(|c| c.passed).count(),
        checks_total: checks.len(),
        checks,
        warnings,
        vague_penalty,
    }
}

/// Read a PRD file and validate it.
///
/// A missing or unreadable path is a hard error; no partial report is
/// produced.
pub fn validate_file(path: &Path) -> Result<Report> {
    if !path.is_file() {
        anyhow::bail!("PRD file not found: {}", path.display());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read PRD: {}", path.display()))?;
    Ok(validate_text(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    /// A document designed to pass every check with no vague language.
    fn strong_prd() -> String {
        format!(
            "# Checkout PRD\n\n\
             ## Executive Summary\n{}\n\n\
             ## Problem Statement\nThe pain point is checkout latency; it costs revenue.\n\n\
             ## Goals\nRaise conversion from the 2.1% baseline to a 3% target.\n\n\
             ## User Stories\n### Story 1\n- [ ] Cart persists\n- [ ] Checkout completes\n- [x] Receipt emailed\n\n\
             ## Functional Requirements\nREQ-001 (must have): process payment within 2 seconds.\n\
             REQ-002 (should have): REQ-002 depends on REQ-001.\n\n\
             ## Non-Functional Requirements\np95 latency under 250 ms at 500 requests/s.\n\n\
             ## Technical Considerations\nComponent architecture with a payment integration layer.\n\n\
             ## Task Breakdown\nPayment capture (~3h), receipts (~2h).\n\n\
             ## Validation Checkpoint\nManual test after payment capture.\n\n\
             ## Out of Scope\nNo loyalty program changes in this release.\n",
            words(40)
        )
    }

    #[test]
    fn test_strong_prd_scores_full_marks() {
        let report = validate_text(&strong_prd());
        for check in &report.checks {
            assert!(check.passed, "check {} failed: {}", check.id, check.detail);
        }
        assert_eq!(report.score, 57);
        assert_eq!(report.max_score, 57);
        assert_eq!(report.vague_penalty, 0);
        assert_eq!(report.grade, Grade::Excellent);
        assert_eq!(report.percentage, 100.0);
    }

    #[test]
    fn test_empty_document_needs_work() {
        let report = validate_text("# Title\n\nHello.");
        // Checks 5 and 10 pass vacuously; everything else fails.
        assert_eq!(report.checks_passed, 2);
        assert_eq!(report.score, 8);
        assert_eq!(report.grade, Grade::NeedsWork);
    }

    #[test]
    fn test_score_stays_in_range() {
        for text in ["", "fast fast fast fast fast fast fast", &strong_prd()] {
            let report = validate_text(text);
            assert!(report.score >= 0);
            assert!(report.score <= report.max_score as i64);
        }
    }

    #[test]
    fn test_vague_penalty_capped_at_five() {
        let text = "quick fast slow good bad poor easy simple";
        let report = validate_text(text);
        assert_eq!(report.vague_penalty, 5);
        // Warnings are per distinct term, uncapped.
        let vague_warnings = report
            .warnings
            .iter()
            .filter(|w| matches!(w, Warning::VagueLanguage { .. }))
            .count();
        assert_eq!(vague_warnings, 8);
    }

    #[test]
    fn test_no_vague_terms_means_no_penalty() {
        let report = validate_text(&strong_prd());
        assert_eq!(report.vague_penalty, 0);
    }

    #[test]
    fn test_missing_checkpoint_warning() {
        let report = validate_text("# Title");
        assert!(report.warnings.iter().any(|w| matches!(
            w,
            Warning::MissingDetail { item, .. } if item == "Validation checkpoints"
        )));
        let report = validate_text(&strong_prd());
        assert!(!report
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::MissingDetail { .. })));
    }

    #[test]
    fn test_grade_boundaries_take_higher_grade() {
        assert_eq!(Grade::from_percentage(91.0), Grade::Excellent);
        assert_eq!(Grade::from_percentage(90.9), Grade::Good);
        assert_eq!(Grade::from_percentage(83.0), Grade::Good);
        assert_eq!(Grade::from_percentage(82.9), Grade::Acceptable);
        assert_eq!(Grade::from_percentage(75.0), Grade::Acceptable);
        assert_eq!(Grade::from_percentage(74.9), Grade::NeedsWork);
        assert_eq!(Grade::from_percentage(0.0), Grade::NeedsWork);
    }

    #[test]
    fn test_grade_serializes_upper_snake() {
        assert_eq!(
            serde_json::to_string(&Grade::NeedsWork).unwrap(),
            "\"NEEDS_WORK\""
        );
        assert_eq!(
            serde_json::to_string(&Grade::Excellent).unwrap(),
            "\"EXCELLENT\""
        );
    }

    #[test]
    fn test_warning_json_shape() {
        let report = validate_text("a fast one");
        let json = serde_json::to_value(&report).unwrap();
        let warning = &json["warnings"][0];
        assert_eq!(warning["type"], "vague_language");
        assert_eq!(warning["term"], "fast");
    }

    #[test]
    fn test_validate_file_missing_is_error() {
        let err = validate_file(Path::new("/nonexistent/prd.md")).unwrap_err();
        assert!(err.to_string().contains("PRD file not found"));
    }
}

//! Bundled PRD templates.

use anyhow::{bail, Result};
use serde::Serialize;

const COMPREHENSIVE: &str = include_str!("../templates/prd-comprehensive.md");
const MINIMAL: &str = include_str!("../templates/prd-minimal.md");

pub const TEMPLATE_TYPES: &[&str] = &["comprehensive", "minimal"];

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    #[serde(rename = "type")]
    pub template_type: String,
    pub content: &'static str,
    pub line_count: usize,
}

/// Look up a bundled template by type name.
pub fn load(template_type: &str) -> Result<TemplateInfo> {
    let content = match template_type {
        "comprehensive" => COMPREHENSIVE,
        "minimal" => MINIMAL,
        other => bail!(
            "Unknown template type '{}'. Available: {}",
            other,
            TEMPLATE_TYPES.join(", ")
        ),
    };
    Ok(TemplateInfo {
        template_type: template_type.to_string(),
        content,
        line_count: content.matches('\n').count() + 1,
    })
}

//! `validate-prd` - run the quality checklist against a PRD file.

use std::path::Path;

use anyhow::Result;

use prdflow::validator;

use super::emit;

pub fn validate_prd(input: &Path) -> Result<()> {
    let report = validator::validate_file(input)?;
    emit(&report)
}

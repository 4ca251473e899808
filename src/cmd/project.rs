//! Project environment commands: `preflight`, `detect-taskmaster`,
//! `init-taskmaster`, and `gen-scripts`.

use std::path::Path;

use anyhow::Result;

use prdflow::init::InitMethod;

use super::emit;

pub fn preflight(root: &Path) -> Result<()> {
    emit(&prdflow::preflight::run(root))
}

pub fn detect_taskmaster(root: &Path) -> Result<()> {
    emit(&prdflow::detect::detect(root))
}

pub fn init_taskmaster(root: &Path, method: InitMethod) -> Result<()> {
    let outcome = prdflow::init::init(root, method)?;
    emit(&outcome)
}

pub fn gen_scripts(output_dir: &Path) -> Result<()> {
    let result = prdflow::scripts::generate(output_dir)?;
    emit(&result)
}

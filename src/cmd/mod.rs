//! Command handlers for the prdflow CLI.
//!
//! Every handler prints exactly one JSON document to stdout with `"ok": true`
//! folded in; errors propagate to `main`, which prints the matching
//! `"ok": false` document. Diagnostics go to stderr via the logger so stdout
//! stays machine-parseable.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

pub mod docs;
pub mod plan;
pub mod project;
pub mod state;
pub mod tasks;
pub mod track;
pub mod validate;

/// Serialize a payload, fold in `"ok": true`, and print it pretty to stdout.
pub fn emit<T: Serialize>(payload: &T) -> Result<()> {
    let mut value = serde_json::to_value(payload)?;
    if let Value::Object(map) = &mut value {
        map.insert("ok".to_string(), Value::Bool(true));
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

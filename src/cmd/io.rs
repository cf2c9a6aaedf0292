//! File helpers shared by the commands.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a payload file.
///
/// Content that is not valid JSON is handed on as a JSON string so the
/// fail-soft parsing in the library reports it instead of aborting.
pub fn read_payload(path: &Path) -> Result<Value> {
    if !path.exists() {
        bail!("input file does not exist: {}", path.display());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_payload(&content))
}

pub fn parse_payload(content: &str) -> Value {
    serde_json::from_str(content).unwrap_or_else(|e| {
        debug!(error = %e, "Payload is not JSON, passing it on as a string");
        Value::String(content.to_string())
    })
}

/// Write to `output`, or stdout when none is given
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Split a comma-separated list, trimming and dropping empties
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

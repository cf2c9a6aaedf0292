//! Spec command implementation.

use super::io::{read_payload, write_output};
use anyhow::{anyhow, Result};
use spec_diagram::config::DiagramConfig;
use spec_diagram::graph::Layout;
use spec_diagram::spec::{compile_spec, SpecKind};
use std::path::PathBuf;
use tracing::info;

/// Run the spec command
pub fn run(
    file: PathBuf,
    kind: String,
    output: Option<PathBuf>,
    layout: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let kind: SpecKind = kind.parse().map_err(|e| anyhow!("{}", e))?;

    let config = DiagramConfig::load_or_default(config.as_deref())?;
    let mut options = config.spec_graph_options();
    if let Some(layout) = layout {
        options.layout = layout.parse::<Layout>().map_err(|e| anyhow!("{}", e))?;
    }

    let payload = read_payload(&file)?;
    let source = compile_spec(kind, &payload, &options);
    info!(file = %file.display(), %kind, bytes = source.len(), "Compiled specification graph");

    if source.is_empty() {
        eprintln!("No {} found in {}.", kind, file.display());
    }

    write_output(&source, output.as_deref())?;

    if let Some(ref out) = output {
        eprintln!("Graph written to: {}", out.display());
    }

    Ok(())
}

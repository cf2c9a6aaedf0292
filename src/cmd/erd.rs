//! Erd command implementation.

use super::io::{read_payload, split_list, write_output};
use anyhow::{anyhow, Result};
use glob::Pattern;
use spec_diagram::config::DiagramConfig;
use spec_diagram::graph::{to_json, to_mermaid, ErdView, OutputFormat};
use spec_diagram::schema::{DiagnosticCollector, NormalizedSchema};
use std::path::PathBuf;
use tracing::info;

/// Run the erd command
#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    tables: Option<String>,
    exclude: Option<String>,
    config: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let format = if json {
        OutputFormat::Json
    } else if let Some(ref f) = format {
        f.parse().map_err(|e| anyhow!("{}", e))?
    } else if let Some(ref out) = output {
        out.extension()
            .and_then(|e| e.to_str())
            .and_then(OutputFormat::from_extension)
            .unwrap_or_default()
    } else {
        OutputFormat::Mermaid
    };

    let config = DiagramConfig::load_or_default(config.as_deref())?;
    let payload = read_payload(&file)?;

    let schema = NormalizedSchema::from_payload(&payload, &config.database_name_fallback);
    info!(
        file = %file.display(),
        format = ?schema.format,
        tables = schema.tables.len(),
        "Normalized schema"
    );

    let mut diagnostics = DiagnosticCollector::new();
    diagnostics.absorb(schema.diagnostics.clone());

    let mut view = ErdView::from_schema(schema, &config.resolve_options(), &mut diagnostics);

    if let Some(ref tables) = tables {
        view.filter_tables(&compile_patterns(&split_list(tables)));
    }

    let mut excluded = config.erd.exclude.clone();
    if let Some(ref exclude) = exclude {
        excluded.extend(split_list(exclude));
    }
    view.exclude_tables(&compile_patterns(&excluded));

    let quiet = matches!(format, OutputFormat::Json);

    if view.is_empty() && !quiet {
        eprintln!("No tables found in {}.", file.display());
    }

    let content = match format {
        OutputFormat::Mermaid => to_mermaid(&view),
        OutputFormat::Json => to_json(&view),
    };
    write_output(&content, output.as_deref())?;

    if !quiet {
        if let Some(ref out) = output {
            eprintln!("ERD written to: {}", out.display());
        }
        eprintln!(
            "ERD ({}): {} tables, {} columns, {} relationships",
            view.database_name,
            view.table_count(),
            view.column_count(),
            view.relationship_count()
        );
        diagnostics.print_summary();
    }

    Ok(())
}

/// Compile glob patterns, skipping invalid ones
fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "Ignoring invalid table pattern");
                None
            }
        })
        .collect()
}

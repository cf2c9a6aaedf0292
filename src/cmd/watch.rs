//! Watch command: recompile a payload file whenever its content changes.

use super::io::{parse_payload, write_output};
use anyhow::{anyhow, bail, Result};
use glob::Pattern;
use serde_json::Value;
use spec_diagram::config::DiagramConfig;
use spec_diagram::graph::{to_mermaid, ErdView};
use spec_diagram::schema::{DiagnosticCollector, NormalizedSchema};
use spec_diagram::spec::{compile_spec, SpecKind};
use spec_diagram::viewport::DiagramPipeline;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

const MIN_INTERVAL_MS: u64 = 10;

/// Run the watch command
pub fn run(
    file: PathBuf,
    kind: Option<String>,
    output: Option<PathBuf>,
    debounce_ms: Option<u64>,
    interval_ms: u64,
    exit_after: Option<usize>,
    config: Option<PathBuf>,
) -> Result<()> {
    if !file.exists() {
        bail!("input file does not exist: {}", file.display());
    }

    let kind: Option<SpecKind> = kind
        .map(|k| k.parse())
        .transpose()
        .map_err(|e| anyhow!("{}", e))?;

    let config = DiagramConfig::load_or_default(config.as_deref())?;
    let delay = debounce_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.debounce());
    let interval = Duration::from_millis(interval_ms.max(MIN_INTERVAL_MS));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(watch_file(
        &file,
        build_pipeline(kind, &config, delay),
        output.as_deref(),
        interval,
        exit_after,
    ))
}

/// Pipeline compiling either an ER diagram or a specification graph
fn build_pipeline(
    kind: Option<SpecKind>,
    config: &DiagramConfig,
    delay: Duration,
) -> DiagramPipeline<Value> {
    match kind {
        Some(kind) => {
            let options = config.spec_graph_options();
            DiagramPipeline::new(delay, move |payload: &Value| {
                compile_spec(kind, payload, &options)
            })
        }
        None => {
            let fallback = config.database_name_fallback.clone();
            let resolve_options = config.resolve_options();
            let excluded: Vec<Pattern> = config
                .erd
                .exclude
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect();
            DiagramPipeline::new(delay, move |payload: &Value| {
                let schema = NormalizedSchema::from_payload(payload, &fallback);
                let mut diagnostics = DiagnosticCollector::new();
                let mut view = ErdView::from_schema(schema, &resolve_options, &mut diagnostics);
                view.exclude_tables(&excluded);
                to_mermaid(&view)
            })
        }
    }
}

async fn watch_file(
    file: &Path,
    pipeline: DiagramPipeline<Value>,
    output: Option<&Path>,
    interval: Duration,
    exit_after: Option<usize>,
) -> Result<()> {
    let mut rx = pipeline.subscribe();
    let mut ticker = tokio::time::interval(interval);
    let mut last_content: Option<String> = None;
    let mut written = 0usize;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    eprintln!("Watching {} (Ctrl-C to stop)", file.display());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match fs::read_to_string(file) {
                    Ok(content) => {
                        if last_content.as_deref() != Some(content.as_str()) {
                            info!(file = %file.display(), bytes = content.len(), "Input changed");
                            pipeline.submit(parse_payload(&content));
                            last_content = Some(content);
                        }
                    }
                    Err(e) => warn!(file = %file.display(), error = %e, "Failed to read input"),
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let source = rx.borrow_and_update().clone();
                write_output(&source, output)?;
                written += 1;
                if let Some(out) = output {
                    eprintln!("Recompiled ({}): {}", written, out.display());
                }
                if exit_after.is_some_and(|n| written >= n) {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                break;
            }
        }
    }

    pipeline.cancel();
    Ok(())
}

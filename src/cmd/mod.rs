mod erd;
mod io;
mod spec;
mod watch;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io as stdio;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spec-diagram")]
#[command(version)]
#[command(
    about = "Compile persisted schema and specification JSON into Mermaid diagram source",
    long_about = None
)]
pub struct Cli {
    /// Log level: trace, debug, info, warn, error, off (default: warn)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format: compact, pretty, json
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an ER diagram from a schema payload
    Erd {
        /// Schema payload (JSON, any supported shape)
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: mermaid, json (default: from output extension, else mermaid)
        #[arg(short, long)]
        format: Option<String>,

        /// Only include tables matching these glob patterns (comma-separated)
        #[arg(short, long)]
        tables: Option<String>,

        /// Exclude tables matching these glob patterns (comma-separated)
        #[arg(short, long)]
        exclude: Option<String>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output the canonical model as JSON (same as --format json)
        #[arg(long)]
        json: bool,
    },

    /// Generate a flowchart from use cases, requirements or user stories
    Spec {
        /// Specification payload (JSON array)
        file: PathBuf,

        /// Kind of specification: use-cases, requirements, user-stories
        #[arg(short, long)]
        kind: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Layout direction: td, lr (overrides config)
        #[arg(short, long)]
        layout: Option<String>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Recompile a payload whenever it changes on disk
    Watch {
        /// Schema or specification payload
        file: PathBuf,

        /// Specification kind; omit to compile an ER diagram
        #[arg(short, long)]
        kind: Option<String>,

        /// Output file, rewritten on every recompilation (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Debounce delay in milliseconds (overrides config)
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Polling interval in milliseconds
        #[arg(long, default_value = "200")]
        interval_ms: u64,

        /// Stop after this many recompilations
        #[arg(long)]
        exit_after: Option<usize>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print JSON Schemas for JSON output and the config file
    Schema {
        /// Schema name (erd, config); prints all when omitted
        name: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Erd {
            file,
            output,
            format,
            tables,
            exclude,
            config,
            json,
        } => erd::run(file, output, format, tables, exclude, config, json),
        Commands::Spec {
            file,
            kind,
            output,
            layout,
            config,
        } => spec::run(file, kind, output, layout, config),
        Commands::Watch {
            file,
            kind,
            output,
            debounce_ms,
            interval_ms,
            exit_after,
            config,
        } => watch::run(
            file,
            kind,
            output,
            debounce_ms,
            interval_ms,
            exit_after,
            config,
        ),
        Commands::Schema { name } => print_schemas(name),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "spec-diagram",
                &mut stdio::stdout(),
            );
            Ok(())
        }
    }
}

fn print_schemas(name: Option<String>) -> anyhow::Result<()> {
    use spec_diagram::json_schema::{all_schemas, get_schema, schema_names};

    match name {
        Some(name) => {
            let Some(schema) = get_schema(&name) else {
                anyhow::bail!(
                    "Unknown schema: {}. Valid options: {}",
                    name,
                    schema_names().join(", ")
                );
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        None => {
            let schemas = all_schemas();
            println!("{}", serde_json::to_string_pretty(&schemas)?);
        }
    }
    Ok(())
}

//! Output format implementations for ERD export.

pub(crate) mod json;
mod mermaid;

pub use json::{build_erd_json, to_json};
pub use mermaid::{er_diagram, to_mermaid};
#[allow(unused_imports)]
pub use json::{ColumnJson, ErdJson, ErdStats, TableJson};

use schemars::JsonSchema;
use std::fmt;
use std::str::FromStr;

/// Output format for ERD export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Mermaid erDiagram source
    #[default]
    Mermaid,
    /// Canonical model as JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mermaid" | "mmd" => Ok(OutputFormat::Mermaid),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Valid options: mermaid, json",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Mermaid => write!(f, "mermaid"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mermaid => "mmd",
            OutputFormat::Json => "json",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mmd" | "mermaid" | "md" => Some(OutputFormat::Mermaid),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Layout direction for flowchart-style diagrams
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Top to bottom
    #[default]
    TD,
    /// Left to right
    LR,
}

impl Layout {
    /// Mermaid direction keyword
    pub fn as_mermaid(self) -> &'static str {
        match self {
            Layout::TD => "TD",
            Layout::LR => "LR",
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lr" | "left-right" | "horizontal" => Ok(Layout::LR),
            "tb" | "td" | "top-bottom" | "top-down" | "vertical" => Ok(Layout::TD),
            _ => Err(format!("Unknown layout: {}. Valid options: td, lr", s)),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::TD => write!(f, "td"),
            Layout::LR => write!(f, "lr"),
        }
    }
}

/// Escape a string for use as a Mermaid identifier
pub(crate) fn escape_mermaid_id(s: &str) -> String {
    // Mermaid IDs should be alphanumeric with underscores
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Escape text placed inside a quoted Mermaid label
pub(crate) fn escape_label(s: &str) -> String {
    s.replace('"', "#quot;").replace(['\n', '\r'], " ")
}

//! YAML configuration for diagram compilation.
//!
//! Every section is optional; missing keys fall back to the defaults below.
//!
//! ```yaml
//! database_name_fallback: "sin nombre"
//! debounce_ms: 250
//! erd:
//!   fk_label: tiene
//!   exclude:
//!     - "audit_*"
//! graph:
//!   layout: lr
//!   labels:
//!     actors: Actors
//!     participates: uses
//! ```

use crate::graph::{Layout, ResolveOptions, DEFAULT_FK_LABEL};
use crate::schema::UNSPECIFIED_DATABASE;
use crate::spec::{GraphLabels, SpecGraphOptions};
use crate::viewport::DEFAULT_DEBOUNCE;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// ER diagram settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ErdConfig {
    /// Label of relationships inferred from column references
    pub fk_label: String,
    /// Glob patterns of tables to leave out
    pub exclude: Vec<String>,
}

impl Default for ErdConfig {
    fn default() -> Self {
        Self {
            fk_label: DEFAULT_FK_LABEL.to_string(),
            exclude: Vec::new(),
        }
    }
}

/// Specification graph settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GraphConfig {
    pub layout: Layout,
    pub labels: GraphLabels,
}

/// Complete YAML configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiagramConfig {
    /// Database name used when a payload carries none
    pub database_name_fallback: String,
    /// Recompilation delay for `watch`
    pub debounce_ms: u64,
    pub erd: ErdConfig,
    pub graph: GraphConfig,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            database_name_fallback: UNSPECIFIED_DATABASE.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            erd: ErdConfig::default(),
            graph: GraphConfig::default(),
        }
    }
}

impl DiagramConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: DiagramConfig = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            fk_label: self.erd.fk_label.clone(),
        }
    }

    pub fn spec_graph_options(&self) -> SpecGraphOptions {
        SpecGraphOptions {
            layout: self.graph.layout,
            labels: self.graph.labels.clone(),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

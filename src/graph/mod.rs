//! ERD (Entity-Relationship Diagram) generation module.
//!
//! This module provides:
//! - Relationship resolution from column references and named relations
//! - A filterable view over the normalized schema
//! - Output formats: Mermaid erDiagram and JSON

pub mod format;
pub mod relations;
pub mod view;

pub use format::{er_diagram, to_json, to_mermaid, Layout, OutputFormat};
pub use relations::{
    resolve, resolve_with, Cardinality, RelationOrigin, Relationship, ResolveOptions,
    DEFAULT_FK_LABEL,
};
pub use view::ErdView;

use crate::schema::{normalize, Table};
use serde_json::Value;

/// Compile canonical tables into erDiagram source with default options
pub fn compile_tables(tables: &[Table]) -> String {
    er_diagram(tables, &resolve(tables))
}

/// Normalize a raw payload and compile it into erDiagram source
pub fn compile_payload(payload: &Value) -> String {
    compile_tables(&normalize(payload))
}

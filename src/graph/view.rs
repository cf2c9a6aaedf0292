//! ERD view over a normalized schema, with glob-based table filtering.

use crate::graph::relations::{resolve_with, Relationship, ResolveOptions};
use crate::schema::{DiagnosticCollector, NormalizedSchema, Table};
use ahash::AHashSet;
use glob::Pattern;

/// Tables and resolved relationships ready for rendering
#[derive(Debug, Clone)]
pub struct ErdView {
    /// Database display name
    pub database_name: String,
    /// Tables in input order
    pub tables: Vec<Table>,
    /// Relationships in resolution order
    pub relationships: Vec<Relationship>,
}

impl ErdView {
    /// Resolve relationships for a set of tables
    pub fn from_tables(
        database_name: impl Into<String>,
        tables: Vec<Table>,
        options: &ResolveOptions,
        diagnostics: &mut DiagnosticCollector,
    ) -> Self {
        let relationships = resolve_with(&tables, options, diagnostics);
        Self {
            database_name: database_name.into(),
            tables,
            relationships,
        }
    }

    /// Build a view from a normalization result
    pub fn from_schema(
        schema: NormalizedSchema,
        options: &ResolveOptions,
        diagnostics: &mut DiagnosticCollector,
    ) -> Self {
        Self::from_tables(schema.database_name, schema.tables, options, diagnostics)
    }

    /// Keep only tables matching any of the given patterns
    pub fn filter_tables(&mut self, patterns: &[Pattern]) {
        if patterns.is_empty() {
            return;
        }

        let removed: AHashSet<String> = self
            .tables
            .iter()
            .filter(|t| !patterns.iter().any(|p| p.matches(&t.name)))
            .map(|t| t.name.clone())
            .collect();

        self.remove_tables(&removed);
    }

    /// Drop tables matching any of the given patterns
    pub fn exclude_tables(&mut self, patterns: &[Pattern]) {
        if patterns.is_empty() {
            return;
        }

        let removed: AHashSet<String> = self
            .tables
            .iter()
            .filter(|t| patterns.iter().any(|p| p.matches(&t.name)))
            .map(|t| t.name.clone())
            .collect();

        self.remove_tables(&removed);
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    // Relationships pointing at tables outside the schema are kept; only
    // edges touching a removed table go.
    fn remove_tables(&mut self, removed: &AHashSet<String>) {
        if removed.is_empty() {
            return;
        }
        self.tables.retain(|t| !removed.contains(&t.name));
        self.relationships
            .retain(|r| !removed.contains(&r.from) && !removed.contains(&r.to));
    }
}

//! Relationship resolution from canonical tables.
//!
//! Two sources are merged per table, in table order:
//! - column references (`table(column)`), deduplicated per `(owning, target)` pair
//! - the table-level relation map, deduplicated per `(owning, target, name)`
//!
//! The keys are independent, so an FK and a named relation between the same
//! two tables both appear.

use crate::schema::{Diagnostic, DiagnosticCollector, Reference, Table};
use ahash::AHashSet;
use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;
use tracing::{debug, span, Level};

/// Label for relationships inferred from column references
pub const DEFAULT_FK_LABEL: &str = "tiene";

/// Relationship cardinality, read from the referenced table towards the owning table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    /// Many rows of the owning table point at one target row
    #[default]
    ManyToOne,
    OneToOne,
    ManyToMany,
}

impl Cardinality {
    /// Mermaid ERD notation
    pub fn as_mermaid(self) -> &'static str {
        match self {
            Cardinality::ManyToOne => "||--o{",
            Cardinality::OneToOne => "||--||",
            Cardinality::ManyToMany => "}o--o{",
        }
    }

    /// Map a relation type declaration. Unknown types are one-to-one.
    pub fn from_relation_type(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "n:1" | "muchos-a-uno" => Cardinality::ManyToOne,
            "1:1" | "uno-a-uno" => Cardinality::OneToOne,
            "n:n" | "muchos-a-muchos" => Cardinality::ManyToMany,
            _ => Cardinality::OneToOne,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::ManyToOne => write!(f, "many-to-one"),
            Cardinality::OneToOne => write!(f, "one-to-one"),
            Cardinality::ManyToMany => write!(f, "many-to-many"),
        }
    }
}

/// Where a relationship came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RelationOrigin {
    /// Inferred from a column reference
    Column { column: String, target_column: String },
    /// Declared in the table's relation map
    Named { relation: String },
}

/// Directed edge between two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Relationship {
    /// Referenced table
    pub from: String,
    /// Owning table
    pub to: String,
    pub cardinality: Cardinality,
    pub label: String,
    pub origin: RelationOrigin,
}

/// Resolver settings
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub fk_label: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            fk_label: DEFAULT_FK_LABEL.to_string(),
        }
    }
}

/// Resolve relationships with default options
pub fn resolve(tables: &[Table]) -> Vec<Relationship> {
    resolve_with(tables, &ResolveOptions::default(), &mut DiagnosticCollector::new())
}

/// Resolve relationships, recording skipped references in `diagnostics`
pub fn resolve_with(
    tables: &[Table],
    options: &ResolveOptions,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<Relationship> {
    let resolve_span = span!(Level::DEBUG, "resolve_relationships", tables = tables.len());
    let _enter = resolve_span.enter();

    let mut relationships = Vec::new();
    let mut column_pairs: AHashSet<(&str, String)> = AHashSet::new();
    let mut named_keys: AHashSet<(&str, &str, &str)> = AHashSet::new();

    for table in tables {
        for col in &table.columns {
            let Some(raw) = col.reference.as_deref() else {
                continue;
            };
            let Some(Reference {
                table: target,
                column: target_column,
            }) = Reference::parse(raw)
            else {
                diagnostics.add(Diagnostic::MalformedReference {
                    table: table.name.clone(),
                    column: col.name.clone(),
                    reference: raw.to_string(),
                });
                continue;
            };

            if !column_pairs.insert((table.name.as_str(), target.clone())) {
                debug!(
                    table = %table.name,
                    column = %col.name,
                    target = %target,
                    "Skipping duplicate FK pair"
                );
                continue;
            }

            relationships.push(Relationship {
                from: target,
                to: table.name.clone(),
                cardinality: Cardinality::ManyToOne,
                label: options.fk_label.clone(),
                origin: RelationOrigin::Column {
                    column: col.name.clone(),
                    target_column,
                },
            });
        }

        for relation in &table.relations {
            let target = relation.spec.target_table.trim();
            if target.is_empty() {
                continue;
            }
            if !named_keys.insert((table.name.as_str(), target, relation.name.as_str())) {
                continue;
            }

            relationships.push(Relationship {
                from: target.to_string(),
                to: table.name.clone(),
                cardinality: Cardinality::from_relation_type(&relation.spec.relation_type),
                label: relation.name.clone(),
                origin: RelationOrigin::Named {
                    relation: relation.name.clone(),
                },
            });
        }
    }

    debug!(relationships = relationships.len(), "Resolved relationships");
    relationships
}

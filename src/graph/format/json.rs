//! JSON format output for ERD data.

use crate::graph::relations::Relationship;
use crate::graph::view::ErdView;
use crate::schema::{SemanticType, Table};
use schemars::JsonSchema;
use serde::Serialize;

/// JSON representation of the ERD
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErdJson {
    pub database: String,
    pub tables: Vec<TableJson>,
    pub relationships: Vec<Relationship>,
    pub stats: ErdStats,
}

/// JSON representation of a table with full column details
#[derive(Debug, Serialize, JsonSchema)]
pub struct TableJson {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub columns: Vec<ColumnJson>,
    pub index_count: usize,
}

/// JSON representation of a column
#[derive(Debug, Serialize, JsonSchema)]
pub struct ColumnJson {
    pub name: String,
    #[serde(rename = "type")]
    pub col_type: String,
    pub semantic_type: SemanticType,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_nullable: bool,
    pub is_unique: bool,
    pub is_auto_increment: bool,
    pub has_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
}

/// ERD statistics
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErdStats {
    pub table_count: usize,
    pub column_count: usize,
    pub relationship_count: usize,
}

/// Generate JSON output from a view
pub fn to_json(view: &ErdView) -> String {
    let erd = build_erd_json(view);
    serde_json::to_string_pretty(&erd).unwrap_or_else(|_| "{}".to_string())
}

/// Build the JSON structure
pub fn build_erd_json(view: &ErdView) -> ErdJson {
    ErdJson {
        database: view.database_name.clone(),
        tables: view.tables.iter().map(table_json).collect(),
        relationships: view.relationships.clone(),
        stats: ErdStats {
            table_count: view.table_count(),
            column_count: view.column_count(),
            relationship_count: view.relationship_count(),
        },
    }
}

fn table_json(table: &Table) -> TableJson {
    TableJson {
        name: table.name.clone(),
        description: table.description.clone(),
        columns: table
            .columns
            .iter()
            .map(|col| ColumnJson {
                name: col.name.clone(),
                col_type: col.col_type.clone(),
                semantic_type: col.semantic_type(),
                is_primary_key: col.primary_key,
                is_foreign_key: col.is_foreign_key(),
                is_nullable: col.nullable,
                is_unique: col.unique,
                is_auto_increment: col.auto_increment,
                has_default: col.has_default,
                references: col.reference.clone(),
                on_delete: col.on_delete.clone(),
            })
            .collect(),
        index_count: table.indices.len(),
    }
}

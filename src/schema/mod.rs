//! Canonical schema model.
//!
//! This module provides:
//! - The canonical `Table` / `Column` representation every payload shape is normalized into
//! - Semantic type classification for raw SQL type strings
//! - Restriction-string flag extraction for column definitions
//! - Shape-sniffing normalization of persisted schema payloads

mod diagnostics;
mod normalize;
mod restrictions;

pub use diagnostics::*;
pub use normalize::*;
pub use restrictions::*;

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;

/// `table(column)` reference syntax used by persisted column definitions
static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+)\((\w+)\)$").unwrap());

/// Semantic type bucket used when rendering a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// VARCHAR, CHAR, TEXT and anything unrecognized
    #[default]
    String,
    /// INTEGER, INT, SERIAL, BIGINT, SMALLINT
    Int,
    /// DECIMAL, NUMERIC
    Decimal,
    /// FLOAT, DOUBLE
    Float,
    /// BOOLEAN, BOOL
    Bool,
    /// DATE
    Date,
    /// DATETIME
    DateTime,
    /// TIMESTAMP
    Timestamp,
    /// TIME
    Time,
    /// JSON
    Json,
    /// UUID
    Uuid,
}

impl SemanticType {
    /// Classify a raw SQL type string.
    ///
    /// Everything from the first `(` onward is ignored, so `DECIMAL(10,2)` is a
    /// decimal and `VARCHAR(255)` a string. Unknown or empty input is a string;
    /// vendor-specific types must never break diagram generation.
    pub fn from_sql_type(type_str: &str) -> Self {
        let base_type = type_str.split('(').next().unwrap_or(type_str).trim();

        match base_type.to_uppercase().as_str() {
            "VARCHAR" | "CHAR" | "TEXT" => SemanticType::String,
            "INTEGER" | "INT" | "SERIAL" | "BIGINT" | "SMALLINT" => SemanticType::Int,
            "DECIMAL" | "NUMERIC" => SemanticType::Decimal,
            "FLOAT" | "DOUBLE" => SemanticType::Float,
            "BOOLEAN" | "BOOL" => SemanticType::Bool,
            "DATE" => SemanticType::Date,
            "DATETIME" => SemanticType::DateTime,
            "TIMESTAMP" => SemanticType::Timestamp,
            "TIME" => SemanticType::Time,
            "JSON" => SemanticType::Json,
            "UUID" => SemanticType::Uuid,
            _ => SemanticType::String,
        }
    }

    /// Name of the bucket as written in diagram source
    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::String => "string",
            SemanticType::Int => "int",
            SemanticType::Decimal => "decimal",
            SemanticType::Float => "float",
            SemanticType::Bool => "bool",
            SemanticType::Date => "date",
            SemanticType::DateTime => "datetime",
            SemanticType::Timestamp => "timestamp",
            SemanticType::Time => "time",
            SemanticType::Json => "json",
            SemanticType::Uuid => "uuid",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed `table(column)` reference target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub table: String,
    pub column: String,
}

impl Reference {
    /// Parse a reference string. Anything not matching `name(name)` exactly is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = REFERENCE_RE.captures(raw)?;
        Some(Self {
            table: caps[1].to_string(),
            column: caps[2].to_string(),
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.table, self.column)
    }
}

/// Column definition within a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name
    pub name: String,
    /// Raw type string, e.g. `VARCHAR(255)`
    #[serde(rename = "type")]
    pub col_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub foreign_key: bool,
    pub auto_increment: bool,
    pub unique: bool,
    pub has_default: bool,
    pub description: String,
    /// Raw reference string, expected as `table(column)`
    pub reference: Option<String>,
    pub on_delete: Option<String>,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            name: String::new(),
            col_type: String::new(),
            nullable: true,
            primary_key: false,
            foreign_key: false,
            auto_increment: false,
            unique: false,
            has_default: false,
            description: String::new(),
            reference: None,
            on_delete: None,
        }
    }
}

impl Column {
    /// Placeholder for a column whose definition could not be read
    pub fn unknown(name: &str) -> Self {
        Self {
            name: name.to_string(),
            col_type: "UNKNOWN".to_string(),
            ..Self::default()
        }
    }

    /// Semantic bucket of the raw type
    pub fn semantic_type(&self) -> SemanticType {
        SemanticType::from_sql_type(&self.col_type)
    }

    /// Parsed reference target, if the raw reference is well formed
    pub fn reference_target(&self) -> Option<Reference> {
        self.reference.as_deref().and_then(Reference::parse)
    }

    /// Whether the column is rendered with an FK marker
    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key || self.reference.is_some()
    }
}

/// Table-level relation declaration (legacy per-table object form)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationSpec {
    /// `1:1`, `N:1`, `N:N` or one of their Spanish synonyms
    #[serde(rename = "type")]
    pub relation_type: String,
    pub target_table: String,
}

/// A named entry of a table's relation map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct NamedRelation {
    pub name: String,
    #[serde(flatten)]
    pub spec: RelationSpec,
}

/// Canonical table
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Table {
    /// Table name, unique within a schema
    pub name: String,
    /// Column definitions in declaration order
    pub columns: Vec<Column>,
    pub description: String,
    /// Index definitions, passed through untouched
    pub indices: Vec<serde_json::Value>,
    /// Named relations in declaration order
    pub relations: Vec<NamedRelation>,
}

impl Table {
    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            description: String::new(),
            indices: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns flagged as primary key
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.primary_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_type_mapping() {
        assert_eq!(
            SemanticType::from_sql_type("DECIMAL(10,2)"),
            SemanticType::Decimal
        );
        assert_eq!(
            SemanticType::from_sql_type("varchar(255)"),
            SemanticType::String
        );
        assert_eq!(SemanticType::from_sql_type("SERIAL"), SemanticType::Int);
        assert_eq!(SemanticType::from_sql_type("bigint"), SemanticType::Int);
        assert_eq!(SemanticType::from_sql_type("DOUBLE"), SemanticType::Float);
        assert_eq!(SemanticType::from_sql_type("bool"), SemanticType::Bool);
        assert_eq!(
            SemanticType::from_sql_type("TIMESTAMP"),
            SemanticType::Timestamp
        );
        assert_eq!(SemanticType::from_sql_type("uuid"), SemanticType::Uuid);
    }

    #[test]
    fn test_semantic_type_fallback() {
        assert_eq!(SemanticType::from_sql_type(""), SemanticType::String);
        assert_eq!(SemanticType::from_sql_type("FOOBAR"), SemanticType::String);
        assert_eq!(SemanticType::from_sql_type("(5)"), SemanticType::String);
        assert_eq!(
            SemanticType::from_sql_type("GEOMETRY(Point, 4326)"),
            SemanticType::String
        );
    }

    #[test]
    fn test_reference_parse() {
        let r = Reference::parse("categorias(id)").unwrap();
        assert_eq!(r.table, "categorias");
        assert_eq!(r.column, "id");
        assert_eq!(r.to_string(), "categorias(id)");

        assert!(Reference::parse("categorias.id").is_none());
        assert!(Reference::parse("categorias(id) ").is_none());
        assert!(Reference::parse("public.categorias(id)").is_none());
        assert!(Reference::parse("").is_none());
    }

    #[test]
    fn test_column_fk_marker() {
        let mut col = Column::unknown("x");
        assert!(!col.is_foreign_key());
        assert!(col.nullable);

        col.reference = Some("not a reference".to_string());
        assert!(col.is_foreign_key());
        assert!(col.reference_target().is_none());
    }
}

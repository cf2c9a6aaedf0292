//! Column metadata extraction from persisted column definitions.
//!
//! Structural flags come from a free-text restriction string such as
//! `"NOT NULL UNIQUE DEFAULT 0"`. The matching policy is plain substring
//! containment on the upper-cased string and lives only in [`parse_restrictions`].

use super::Column;
use serde_json::{Map, Value};

/// Flags derived from a restriction string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestrictionFlags {
    pub primary_key: bool,
    pub not_null: bool,
    pub auto_increment: bool,
    pub unique: bool,
    pub has_default: bool,
}

impl RestrictionFlags {
    /// Nullability follows `NOT NULL` only. `PRIMARY KEY` alone leaves the column nullable.
    pub fn nullable(&self) -> bool {
        !self.not_null
    }
}

/// Extract structural flags from a restriction string
pub fn parse_restrictions(restrictions: &str) -> RestrictionFlags {
    let upper = restrictions.to_uppercase();

    RestrictionFlags {
        primary_key: upper.contains("PRIMARY KEY"),
        not_null: upper.contains("NOT NULL"),
        auto_increment: upper.contains("AUTO_INCREMENT"),
        unique: upper.contains("UNIQUE"),
        has_default: upper.contains("DEFAULT"),
    }
}

/// Build a [`Column`] from a raw definition object.
///
/// A definition that is not an object yields an `UNKNOWN`, nullable column with
/// every flag cleared. The reference is stored verbatim; its format is checked
/// when relationships are resolved.
pub fn parse_column(name: &str, definition: &Value) -> Column {
    let Some(def) = definition.as_object() else {
        return Column::unknown(name);
    };

    let flags = parse_restrictions(str_field(def, &["restricciones", "restrictions"]).unwrap_or(""));
    let reference = reference_field(def);

    Column {
        name: name.to_string(),
        col_type: str_field(def, &["tipo", "type"]).unwrap_or("").to_string(),
        nullable: flags.nullable(),
        primary_key: flags.primary_key,
        foreign_key: reference.is_some(),
        auto_increment: flags.auto_increment,
        unique: flags.unique,
        has_default: flags.has_default,
        description: str_field(def, &["descripcion", "description"])
            .unwrap_or("")
            .to_string(),
        reference,
        on_delete: str_field(def, &["on_delete", "onDelete"])
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    }
}

/// Build a [`Column`] from a legacy, pre-structured column object.
///
/// Stored flags are taken as they are, with missing or `null` fields falling
/// back to the column defaults. When a key and its alias are both present,
/// the first usable one wins.
pub fn parse_legacy_column(fallback_name: &str, obj: &Map<String, Value>) -> Column {
    let defaults = Column::default();

    Column {
        name: str_field(obj, &["name", "nombre"])
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(fallback_name)
            .to_string(),
        col_type: str_field(obj, &["type", "tipo"]).unwrap_or("").to_string(),
        nullable: bool_field(obj, &["nullable"]).unwrap_or(defaults.nullable),
        primary_key: bool_field(obj, &["primaryKey", "primary_key"]).unwrap_or(false),
        foreign_key: bool_field(obj, &["foreignKey", "foreign_key"]).unwrap_or(false),
        auto_increment: bool_field(obj, &["autoIncrement", "auto_increment"]).unwrap_or(false),
        unique: bool_field(obj, &["unique"]).unwrap_or(false),
        has_default: bool_field(obj, &["hasDefault", "has_default"]).unwrap_or(false),
        description: str_field(obj, &["description", "descripcion"])
            .unwrap_or("")
            .to_string(),
        reference: reference_field(obj),
        on_delete: str_field(obj, &["onDelete", "on_delete"])
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    }
}

/// First string value found under any of `keys`
pub(crate) fn str_field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_str))
}

fn bool_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_bool))
}

/// Reference as a `table(column)` string, from the first usable key.
///
/// Accepts the string form as-is and the `{table, column}` object form.
fn reference_field(def: &Map<String, Value>) -> Option<String> {
    ["referencia", "reference"]
        .iter()
        .find_map(|k| def.get(*k).and_then(reference_value))
}

fn reference_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(obj) => {
            let table = str_field(obj, &["tabla", "table"]).filter(|t| !t.trim().is_empty())?;
            let column = str_field(obj, &["columna", "column"]).unwrap_or("id");
            Some(format!("{}({})", table, column))
        }
        _ => None,
    }
}

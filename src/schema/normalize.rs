//! Normalization of persisted schema payloads into canonical tables.
//!
//! Three payload shapes have been persisted over time. Each is a variant of
//! [`SchemaFormat`] with its own decoder; variants are tried in a fixed
//! priority order and the first match wins.

use super::restrictions::{parse_column, parse_legacy_column, str_field};
use super::{Diagnostic, DiagnosticCollector, NamedRelation, RelationSpec, Table};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, info, span, Level};

/// Database name used when a payload does not carry one
pub const UNSPECIFIED_DATABASE: &str = "unspecified";

/// Known schema payload shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// `{ "tablas": { name: { "columnas": { col: definition } } } }`
    Current,
    /// `[ { "name": ..., "columns": [ ... ] } ]`
    LegacyArray,
    /// `{ "tablas": [ { "name": ..., "columns": [ ... ] } ] }`
    LegacyWrapped,
}

impl SchemaFormat {
    /// Detection order
    pub const PRIORITY: [SchemaFormat; 3] = [
        SchemaFormat::Current,
        SchemaFormat::LegacyArray,
        SchemaFormat::LegacyWrapped,
    ];

    /// Detect the shape of a (non-stringified) payload
    pub fn detect(payload: &Value) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|f| f.matches(payload))
    }

    fn matches(self, payload: &Value) -> bool {
        match self {
            SchemaFormat::Current => matches!(payload.get("tablas"), Some(Value::Object(_))),
            SchemaFormat::LegacyArray => payload.is_array(),
            SchemaFormat::LegacyWrapped => matches!(payload.get("tablas"), Some(Value::Array(_))),
        }
    }

    fn decode(self, payload: &Value, diagnostics: &mut DiagnosticCollector) -> Vec<Table> {
        match self {
            SchemaFormat::Current => payload
                .get("tablas")
                .and_then(Value::as_object)
                .map(|tables| decode_current(tables, diagnostics))
                .unwrap_or_default(),
            SchemaFormat::LegacyArray => payload
                .as_array()
                .map(|elements| decode_legacy(elements, diagnostics))
                .unwrap_or_default(),
            SchemaFormat::LegacyWrapped => payload
                .get("tablas")
                .and_then(Value::as_array)
                .map(|elements| decode_legacy(elements, diagnostics))
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaFormat::Current => write!(f, "current"),
            SchemaFormat::LegacyArray => write!(f, "legacy-array"),
            SchemaFormat::LegacyWrapped => write!(f, "legacy-wrapped"),
        }
    }
}

/// Result of a full normalization pass
#[derive(Debug, Clone)]
pub struct NormalizedSchema {
    pub database_name: String,
    pub format: Option<SchemaFormat>,
    pub tables: Vec<Table>,
    pub diagnostics: Vec<Diagnostic>,
}

impl NormalizedSchema {
    /// Normalize a payload and extract its database name in one pass
    pub fn from_payload(payload: &Value, database_fallback: &str) -> Self {
        let mut diagnostics = DiagnosticCollector::new();

        let Some(payload) = parse_stringified(payload, &mut diagnostics) else {
            return Self {
                database_name: database_fallback.to_string(),
                format: None,
                tables: Vec::new(),
                diagnostics: diagnostics.into_diagnostics(),
            };
        };

        let format = SchemaFormat::detect(&payload);
        let tables = normalize_parsed(&payload, format, &mut diagnostics);

        Self {
            database_name: database_name_of(&payload)
                .unwrap_or(database_fallback)
                .to_string(),
            format,
            tables,
            diagnostics: diagnostics.into_diagnostics(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }
}

/// Normalize any supported payload into canonical tables. Never fails.
pub fn normalize(payload: &Value) -> Vec<Table> {
    normalize_with_diagnostics(payload, &mut DiagnosticCollector::new())
}

/// Normalize, recording every recovered problem in `diagnostics`
pub fn normalize_with_diagnostics(
    payload: &Value,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<Table> {
    let Some(payload) = parse_stringified(payload, diagnostics) else {
        return Vec::new();
    };
    let format = SchemaFormat::detect(&payload);
    normalize_parsed(&payload, format, diagnostics)
}

/// Database display name, or [`UNSPECIFIED_DATABASE`]
pub fn extract_database_name(payload: &Value) -> String {
    extract_database_name_or(payload, UNSPECIFIED_DATABASE)
}

/// Database display name, or `fallback` when absent or unreadable.
///
/// A payload that arrives as a JSON string is parsed first; a parse failure
/// yields the fallback.
pub fn extract_database_name_or(payload: &Value, fallback: &str) -> String {
    let mut diagnostics = DiagnosticCollector::new();
    parse_stringified(payload, &mut diagnostics)
        .as_deref()
        .and_then(database_name_of)
        .unwrap_or(fallback)
        .to_string()
}

fn database_name_of(payload: &Value) -> Option<&str> {
    let obj = payload.as_object()?;
    str_field(obj, &["nombre_bd", "database_name"])
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

fn normalize_parsed(
    payload: &Value,
    format: Option<SchemaFormat>,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<Table> {
    let normalize_span = span!(Level::DEBUG, "normalize");
    let _enter = normalize_span.enter();

    let Some(format) = format else {
        diagnostics.add(Diagnostic::UnrecognizedFormat {
            found: describe_value(payload).to_string(),
        });
        return Vec::new();
    };

    let tables = format.decode(payload, diagnostics);
    info!(
        format = %format,
        tables = tables.len(),
        "Normalized schema payload"
    );
    tables
}

/// Parse a payload that was persisted as a JSON string
fn parse_stringified<'a>(
    payload: &'a Value,
    diagnostics: &mut DiagnosticCollector,
) -> Option<Cow<'a, Value>> {
    match payload {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(parsed) => Some(Cow::Owned(parsed)),
            Err(e) => {
                diagnostics.add(Diagnostic::InvalidJson {
                    message: e.to_string(),
                });
                None
            }
        },
        other => Some(Cow::Borrowed(other)),
    }
}

fn decode_current(tables: &Map<String, Value>, diagnostics: &mut DiagnosticCollector) -> Vec<Table> {
    let mut result = Vec::with_capacity(tables.len());

    for (name, entry) in tables {
        if name.trim().is_empty() {
            debug!("Dropping table without a name");
            continue;
        }

        let mut table = Table::new(name.as_str());

        if let Some(entry) = entry.as_object() {
            if let Some(columns) = entry.get("columnas").and_then(Value::as_object) {
                for (col_name, definition) in columns {
                    if !definition.is_object() {
                        diagnostics.add(Diagnostic::MalformedColumnDefinition {
                            table: name.clone(),
                            column: col_name.clone(),
                        });
                    }
                    table.columns.push(parse_column(col_name, definition));
                }
            }
            table.description = str_field(entry, &["descripcion", "description"])
                .unwrap_or("")
                .to_string();
            table.indices = decode_indices(entry.get("indices"));
            table.relations = decode_relations(entry.get("relaciones"));
        } else {
            debug!(table = %name, "Table entry is not an object");
        }

        result.push(table);
    }

    result
}

fn decode_legacy(elements: &[Value], diagnostics: &mut DiagnosticCollector) -> Vec<Table> {
    elements
        .iter()
        .filter_map(|element| decode_legacy_table(element, diagnostics))
        .collect()
}

fn decode_legacy_table(element: &Value, diagnostics: &mut DiagnosticCollector) -> Option<Table> {
    let obj = element.as_object()?;
    let name = str_field(obj, &["name", "nombre"])
        .map(str::trim)
        .filter(|n| !n.is_empty())?;

    let mut table = Table::new(name);

    let columns = obj
        .get("columns")
        .or_else(|| obj.get("columnas"))
        .and_then(Value::as_array);

    for (i, col) in columns.into_iter().flatten().enumerate() {
        match col.as_object() {
            Some(col) => table
                .columns
                .push(parse_legacy_column(&format!("column_{}", i + 1), col)),
            None => diagnostics.add(Diagnostic::MalformedColumnDefinition {
                table: name.to_string(),
                column: format!("#{}", i + 1),
            }),
        }
    }

    table.description = str_field(obj, &["description", "descripcion"])
        .unwrap_or("")
        .to_string();
    table.indices = decode_indices(obj.get("indices"));
    table.relations = decode_relations(obj.get("relations").or_else(|| obj.get("relaciones")));

    Some(table)
}

fn decode_indices(value: Option<&Value>) -> Vec<Value> {
    value
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn decode_relations(value: Option<&Value>) -> Vec<NamedRelation> {
    let Some(relations) = value.and_then(Value::as_object) else {
        return Vec::new();
    };

    relations
        .iter()
        .filter_map(|(name, spec)| {
            let Some(spec) = spec.as_object() else {
                debug!(relation = %name, "Skipping relation that is not an object");
                return None;
            };
            Some(NamedRelation {
                name: name.clone(),
                spec: RelationSpec {
                    relation_type: str_field(spec, &["tipo", "type"]).unwrap_or("").to_string(),
                    target_table: str_field(
                        spec,
                        &["tabla_destino", "targetTable", "target_table", "tabla"],
                    )
                    .unwrap_or("")
                    .to_string(),
                },
            })
        })
        .collect()
}

fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(obj) if obj.contains_key("tablas") => "object with unsupported 'tablas'",
        Value::Object(_) => "object without 'tablas'",
    }
}

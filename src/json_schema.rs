//! JSON Schema generation for CLI output and configuration types.
//!
//! Schemas are generated using the schemars crate and can be exported via the `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns all JSON schemas, keyed by name.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // erd command --json output
    schemas.insert("erd", schema_for!(crate::graph::format::ErdJson));

    // YAML configuration file
    schemas.insert("config", schema_for!(crate::config::DiagramConfig));

    schemas
}

/// Generate a single schema by name.
pub fn get_schema(name: &str) -> Option<Schema> {
    all_schemas().remove(name)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_names() {
        assert_eq!(schema_names(), vec!["config", "erd"]);
        assert!(get_schema("erd").is_some());
        assert!(get_schema("spec").is_none());
    }

    #[test]
    fn test_erd_schema_properties() {
        let schema = serde_json::to_value(get_schema("erd").unwrap()).unwrap();
        let props = schema.get("properties").unwrap();
        for key in ["database", "tables", "relationships", "stats"] {
            assert!(props.get(key).is_some(), "missing property {}", key);
        }
    }
}

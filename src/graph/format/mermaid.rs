//! Mermaid erDiagram format output.

use super::{escape_label, escape_mermaid_id};
use crate::graph::relations::Relationship;
use crate::graph::view::ErdView;
use crate::schema::Table;
use std::fmt::Write;

/// Generate Mermaid erDiagram from a view
pub fn to_mermaid(view: &ErdView) -> String {
    er_diagram(&view.tables, &view.relationships)
}

/// Generate Mermaid erDiagram source.
///
/// An empty table list yields an empty string: there is nothing to render.
pub fn er_diagram(tables: &[Table], relationships: &[Relationship]) -> String {
    if tables.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    output.push_str("erDiagram\n");

    for table in tables {
        let _ = writeln!(output, "    {} {{", escape_mermaid_id(&table.name));

        if table.columns.is_empty() {
            // Mermaid rejects empty entity blocks
            output.push_str("        int id PK\n");
        }

        for col in &table.columns {
            let _ = write!(
                output,
                "        {} {}",
                col.semantic_type(),
                escape_mermaid_id(&col.name)
            );
            if col.primary_key {
                output.push_str(" PK");
            }
            if col.is_foreign_key() {
                output.push_str(" FK");
            }
            output.push('\n');
        }

        output.push_str("    }\n");
    }

    for rel in relationships {
        let _ = writeln!(
            output,
            "    {} {} {} : \"{}\"",
            escape_mermaid_id(&rel.from),
            rel.cardinality.as_mermaid(),
            escape_mermaid_id(&rel.to),
            escape_label(&rel.label)
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::relations::resolve;
    use crate::schema::Column;

    fn create_test_tables() -> Vec<Table> {
        let mut productos = Table::new("productos");
        productos.columns.push(Column {
            name: "id".to_string(),
            col_type: "SERIAL".to_string(),
            primary_key: true,
            ..Column::default()
        });
        productos.columns.push(Column {
            name: "categoria_id".to_string(),
            col_type: "INTEGER".to_string(),
            nullable: false,
            foreign_key: true,
            reference: Some("categorias(id)".to_string()),
            ..Column::default()
        });
        productos.columns.push(Column {
            name: "precio".to_string(),
            col_type: "DECIMAL(10,2)".to_string(),
            ..Column::default()
        });

        vec![productos, Table::new("categorias")]
    }

    #[test]
    fn test_mermaid_er_diagram() {
        let tables = create_test_tables();
        let output = er_diagram(&tables, &resolve(&tables));

        assert!(output.starts_with("erDiagram\n"));
        assert!(output.contains("    productos {\n"));
        assert!(output.contains("    categorias {\n"));
    }

    #[test]
    fn test_mermaid_columns() {
        let tables = create_test_tables();
        let output = er_diagram(&tables, &[]);

        assert!(output.contains("        int id PK\n"));
        assert!(output.contains("        int categoria_id FK\n"));
        assert!(output.contains("        decimal precio\n"));
    }

    #[test]
    fn test_empty_table_placeholder() {
        let tables = vec![Table::new("vacia")];
        let output = er_diagram(&tables, &[]);

        assert_eq!(output, "erDiagram\n    vacia {\n        int id PK\n    }\n");
    }

    #[test]
    fn test_pk_and_fk_on_same_column() {
        let mut perfil = Table::new("perfiles");
        perfil.columns.push(Column {
            name: "usuario_id".to_string(),
            col_type: "INT".to_string(),
            primary_key: true,
            foreign_key: true,
            reference: Some("usuarios(id)".to_string()),
            ..Column::default()
        });
        let output = er_diagram(&[perfil], &[]);
        assert!(output.contains("int usuario_id PK FK"));
    }

    #[test]
    fn test_mermaid_relationships() {
        let tables = create_test_tables();
        let output = er_diagram(&tables, &resolve(&tables));

        assert!(output.ends_with("    categorias ||--o{ productos : \"tiene\"\n"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(er_diagram(&[], &[]), "");
    }
}

//! Integration tests for the erd, spec and watch commands.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn spec_diagram_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_spec-diagram"))
}

fn create_schema_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("schema.json");
    fs::write(
        &path,
        r#"{
  "nombre_bd": "tienda",
  "tablas": {
    "categorias": {
      "columnas": {
        "id": { "tipo": "SERIAL", "restricciones": "PRIMARY KEY" },
        "nombre": { "tipo": "VARCHAR(100)", "restricciones": "NOT NULL" }
      }
    },
    "productos": {
      "columnas": {
        "id": { "tipo": "SERIAL", "restricciones": "PRIMARY KEY" },
        "categoria_id": { "tipo": "INTEGER", "restricciones": "NOT NULL",
                          "referencia": "categorias(id)", "on_delete": "CASCADE" },
        "precio": { "tipo": "DECIMAL(10,2)" }
      }
    },
    "audit_log": {
      "columnas": {
        "producto_id": { "tipo": "INTEGER", "referencia": "productos(id)" }
      }
    }
  }
}"#,
    )
    .unwrap();
    path
}

#[test]
fn test_erd_mermaid_stdout() {
    let dir = TempDir::new().unwrap();
    let schema = create_schema_file(&dir);

    let output = spec_diagram_bin()
        .args(["erd", schema.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("erDiagram\n"));
    assert!(stdout.contains("        decimal precio\n"));
    assert!(stdout.contains("    categorias ||--o{ productos : \"tiene\"\n"));
    assert!(stdout.contains("    productos ||--o{ audit_log : \"tiene\"\n"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("3 tables, 6 columns, 2 relationships"));
}

#[test]
fn test_erd_exclude_and_output_file() {
    let dir = TempDir::new().unwrap();
    let schema = create_schema_file(&dir);
    let out = dir.path().join("schema.mmd");

    let status = spec_diagram_bin()
        .args([
            "erd",
            schema.to_str().unwrap(),
            "--exclude",
            "audit_*",
            "-o",
            out.to_str().unwrap(),
        ])
        .status()
        .unwrap();

    assert!(status.success());
    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("productos {"));
    assert!(!content.contains("audit_log"));
}

#[test]
fn test_erd_config_label() {
    let dir = TempDir::new().unwrap();
    let schema = create_schema_file(&dir);
    let config = dir.path().join("diagram.yaml");
    fs::write(&config, "erd:\n  fk_label: references\n").unwrap();

    let output = spec_diagram_bin()
        .args([
            "erd",
            schema.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(": \"references\""));
    assert!(!stdout.contains(": \"tiene\""));
}

#[test]
fn test_erd_json_output() {
    let dir = TempDir::new().unwrap();
    let schema = create_schema_file(&dir);

    let output = spec_diagram_bin()
        .args(["erd", schema.to_str().unwrap(), "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["database"], "tienda");
    assert_eq!(json["stats"]["table_count"], 3);
    assert_eq!(json["relationships"][0]["from"], "categorias");
    assert_eq!(json["relationships"][0]["cardinality"], "many-to-one");
    assert_eq!(json["relationships"][0]["origin"]["kind"], "column");
}

#[test]
fn test_erd_unreadable_payload_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ this is not json").unwrap();

    let output = spec_diagram_bin()
        .args(["erd", path.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No tables found"));
    assert!(stderr.contains("Invalid JSON payload"));
}

#[test]
fn test_erd_missing_file() {
    let output = spec_diagram_bin()
        .args(["erd", "/nonexistent/schema.json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("input file does not exist"));
}

#[test]
fn test_spec_use_cases() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("casos.json");
    fs::write(
        &path,
        r#"[
  { "nombre": "Registrar pedido", "actores": "Cliente, Vendedor", "prioridad": "Alta" },
  { "nombre": "Consultar stock", "actores": "Vendedor" }
]"#,
    )
    .unwrap();

    let output = spec_diagram_bin()
        .args([
            "spec",
            path.to_str().unwrap(),
            "--kind",
            "use-cases",
            "--layout",
            "lr",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("graph LR\n"));
    assert!(stdout.contains("        CU1[\"Registrar pedido [Alta]\"]\n"));
    assert!(stdout.contains("    A2 -->|participa| CU1\n"));
    assert!(stdout.contains("    A2 -->|participa| CU2\n"));
}

#[test]
fn test_spec_unknown_kind() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("casos.json");
    fs::write(&path, "[]").unwrap();

    let output = spec_diagram_bin()
        .args(["spec", path.to_str().unwrap(), "--kind", "epics"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown spec kind"));
}

#[test]
fn test_watch_compiles_once_and_exits() {
    let dir = TempDir::new().unwrap();
    let schema = create_schema_file(&dir);
    let out = dir.path().join("live.mmd");

    let status = spec_diagram_bin()
        .args([
            "watch",
            schema.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--debounce-ms",
            "20",
            "--interval-ms",
            "20",
            "--exit-after",
            "1",
        ])
        .status()
        .unwrap();

    assert!(status.success());
    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("erDiagram\n"));
}

#[test]
fn test_completions() {
    let output = spec_diagram_bin()
        .args(["completions", "bash"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("spec-diagram"));
}

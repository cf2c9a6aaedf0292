use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Map, Value};
use spec_diagram::graph::{compile_payload, compile_tables, resolve};
use spec_diagram::schema::normalize;
use spec_diagram::spec::{compile_spec, SpecGraphOptions, SpecKind};
use std::hint::black_box;

/// Current-format payload with `num_tables` tables, each referencing the previous one
fn generate_schema(num_tables: usize) -> Value {
    let mut tables = Map::new();
    for i in 0..num_tables {
        let mut columns = Map::new();
        columns.insert(
            "id".to_string(),
            json!({"tipo": "SERIAL", "restricciones": "PRIMARY KEY NOT NULL"}),
        );
        columns.insert(
            "nombre".to_string(),
            json!({"tipo": "VARCHAR(255)", "restricciones": "NOT NULL UNIQUE"}),
        );
        columns.insert("creado".to_string(), json!({"tipo": "TIMESTAMP"}));
        if i > 0 {
            columns.insert(
                "padre_id".to_string(),
                json!({"tipo": "INTEGER", "referencia": format!("tabla_{}(id)", i - 1)}),
            );
        }
        tables.insert(format!("tabla_{}", i), json!({ "columnas": columns }));
    }
    json!({"nombre_bd": "bench", "tablas": tables})
}

fn generate_stories(count: usize) -> Value {
    let stories: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "titulo": format!("Historia {}", i),
                "rol": format!("Rol {}, Rol {}", i % 7, i % 3),
                "prioridad": "Media",
                "valor_negocio": i % 13
            })
        })
        .collect();
    Value::Array(stories)
}

fn bench_erd(c: &mut Criterion) {
    let mut group = c.benchmark_group("erd");

    for num_tables in [10, 100, 500] {
        let payload = generate_schema(num_tables);

        group.throughput(Throughput::Elements(num_tables as u64));
        group.bench_with_input(
            BenchmarkId::new("normalize", num_tables),
            &payload,
            |b, payload| b.iter(|| normalize(black_box(payload))),
        );

        let tables = normalize(&payload);
        group.bench_with_input(
            BenchmarkId::new("resolve", num_tables),
            &tables,
            |b, tables| b.iter(|| resolve(black_box(tables))),
        );
        group.bench_with_input(
            BenchmarkId::new("compile_tables", num_tables),
            &tables,
            |b, tables| b.iter(|| compile_tables(black_box(tables))),
        );
        group.bench_with_input(
            BenchmarkId::new("end_to_end", num_tables),
            &payload,
            |b, payload| b.iter(|| compile_payload(black_box(payload))),
        );
    }

    group.finish();
}

fn bench_spec_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("spec_graph");
    let options = SpecGraphOptions::default();

    for count in [10, 100, 1000] {
        let payload = generate_stories(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("user_stories", count),
            &payload,
            |b, payload| {
                b.iter(|| compile_spec(SpecKind::UserStories, black_box(payload), &options))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_erd, bench_spec_graph);
criterion_main!(benches);

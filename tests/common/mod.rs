//! Shared test infrastructure.
//!
//! - `memory_store()` - in-memory store holding the bundled catalog
//! - `valid_acta()` - a submission every validator accepts
//! - `setup_test_db()` - isolated Postgres schema, `None` without `DATABASE_URL`
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;

use actas::db;
use actas::models::seed::CatalogSeed;
use actas::store::MemoryStore;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const COMUNA_SANTIAGO: i64 = 13101;
pub const PROVINCIA_SANTIAGO: i64 = 131;
pub const REGION_METROPOLITANA: i64 = 13;
pub const COMUNA_VALPARAISO: i64 = 5101;

/// Four valid, pairwise distinct RUTs.
pub const RUTS: [&str; 4] = ["11111111-1", "22222222-2", "33333333-3", "44444444-4"];
pub const NOMBRES: [(&str, &str); 4] = [
    ("Ana", "Rojas"),
    ("Benito", "Soto"),
    ("Carla", "Muñoz"),
    ("Diego", "Pérez"),
];

// ============================================================================
// FIXTURES
// ============================================================================

pub fn seed() -> CatalogSeed {
    CatalogSeed::bundled().expect("bundled catalog parses")
}

pub fn memory_store() -> MemoryStore {
    MemoryStore::from_seed(&seed())
}

pub fn participant(rut: &str, nombre: &str, apellido: &str) -> Value {
    json!({ "rut": rut, "nombre": nombre, "apellido": apellido, "serie_cedula": "100123456" })
}

pub fn participants(n: usize) -> Vec<Value> {
    RUTS.iter()
        .zip(NOMBRES)
        .take(n)
        .map(|(rut, (nombre, apellido))| participant(rut, nombre, apellido))
        .collect()
}

/// A submission that passes every stage against the bundled catalog.
pub fn valid_acta() -> Value {
    json!({
        "geo": {
            "region": REGION_METROPOLITANA,
            "provincia": PROVINCIA_SANTIAGO,
            "comuna": COMUNA_SANTIAGO
        },
        "participantes": participants(4),
        "itemsGroups": [
            {
                "nombre": "Valores y principios",
                "items": [
                    { "pk": 1, "nombre": "Democracia", "categoria": "1", "fundamento": "Base de todo" },
                    { "pk": 2, "nombre": "Justicia", "categoria": "0", "fundamento": "" }
                ]
            },
            {
                "nombre": "Derechos",
                "items": [
                    { "pk": 4, "nombre": "Derecho a la educación", "categoria": "-1" }
                ]
            }
        ],
        "memoria": "Nos reunimos en la junta de vecinos."
    })
}

pub fn decode(value: &Value) -> actas::models::submission::ActaSubmission {
    actas::models::submission::ActaSubmission::from_json(value.to_string().as_bytes())
        .expect("submission decodes")
}

// ============================================================================
// POSTGRES
// ============================================================================

static SCHEMA_SEQ: AtomicUsize = AtomicUsize::new(0);

/// A migrated and seeded schema private to one test.
pub struct TestDb {
    pool: PgPool,
    pub schema: String,
}

impl TestDb {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Create a fresh schema, point every pooled connection at it, run the
/// migrations and seed the catalog. Returns `None` when `DATABASE_URL` is
/// unset so the Postgres suites skip instead of failing.
pub async fn setup_test_db() -> Option<TestDb> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let schema = format!(
        "actas_test_{}_{}",
        std::process::id(),
        SCHEMA_SEQ.fetch_add(1, Ordering::SeqCst)
    );

    let admin = PgPool::connect(&url).await.expect("connect to DATABASE_URL");
    admin
        .execute(format!("DROP SCHEMA IF EXISTS {schema} CASCADE; CREATE SCHEMA {schema}").as_str())
        .await
        .expect("create test schema");
    admin.close().await;

    let search_path = format!("SET search_path TO {schema}");
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .after_connect(move |conn, _meta| {
            let search_path = search_path.clone();
            Box::pin(async move {
                conn.execute(search_path.as_str()).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await
        .expect("connect test pool");

    db::run_migrations(&pool).await.expect("run migrations");
    db::seed_catalog(&pool, &seed()).await.expect("seed catalog");

    Some(TestDb { pool, schema })
}

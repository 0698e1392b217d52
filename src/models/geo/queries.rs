use sqlx::PgExecutor;

use crate::errors::AppError;
use super::types::*;

/// Look up a comuna by primary key, joined up to its region.
pub async fn find_comuna(db: impl PgExecutor<'_>, id: i64) -> Result<Option<Comuna>, AppError> {
    let comuna = sqlx::query_as::<_, Comuna>(
        "SELECT c.id, c.nombre, c.provincia_id, p.region_id \
         FROM comunas c \
         JOIN provinces p ON p.id = c.provincia_id \
         WHERE c.id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(comuna)
}

/// Full region → province → comuna tree, ordered by ids.
pub async fn find_tree(db: impl PgExecutor<'_>) -> Result<Vec<RegionNode>, AppError> {
    let rows = sqlx::query_as::<_, GeoRow>(
        "SELECT r.id AS region_id, r.nombre AS region, \
                p.id AS provincia_id, p.nombre AS provincia, \
                c.id AS comuna_id, c.nombre AS comuna \
         FROM comunas c \
         JOIN provinces p ON p.id = c.provincia_id \
         JOIN regions r ON r.id = p.region_id \
         ORDER BY r.id, p.id, c.id",
    )
    .fetch_all(db)
    .await?;
    Ok(build_tree(rows))
}

pub async fn count_regions(db: impl PgExecutor<'_>) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM regions")
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn insert_region(db: impl PgExecutor<'_>, id: i64, nombre: &str) -> Result<(), AppError> {
    sqlx::query("INSERT INTO regions (id, nombre) VALUES ($1, $2)")
        .bind(id)
        .bind(nombre)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn insert_provincia(
    db: impl PgExecutor<'_>,
    id: i64,
    region_id: i64,
    nombre: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO provinces (id, region_id, nombre) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(region_id)
        .bind(nombre)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn insert_comuna(
    db: impl PgExecutor<'_>,
    id: i64,
    provincia_id: i64,
    nombre: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO comunas (id, provincia_id, nombre) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(provincia_id)
        .bind(nombre)
        .execute(db)
        .await?;
    Ok(())
}

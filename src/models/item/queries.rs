use sqlx::PgExecutor;

use crate::errors::AppError;
use super::types::*;

pub async fn find_by_id(db: impl PgExecutor<'_>, id: i64) -> Result<Option<Item>, AppError> {
    let item = sqlx::query_as::<_, Item>(
        "SELECT id, group_id, nombre, orden FROM items WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(item)
}

/// All groups ordered by `orden`, each with its items ordered the same way.
pub async fn find_groups(db: impl PgExecutor<'_>) -> Result<Vec<ItemGroup>, AppError> {
    #[derive(sqlx::FromRow)]
    struct Row {
        group_id: i64,
        group_nombre: String,
        group_orden: i32,
        item_id: Option<i64>,
        item_nombre: Option<String>,
        item_orden: Option<i32>,
    }

    let rows = sqlx::query_as::<_, Row>(
        "SELECT g.id AS group_id, g.nombre AS group_nombre, g.orden AS group_orden, \
                i.id AS item_id, i.nombre AS item_nombre, i.orden AS item_orden \
         FROM item_groups g \
         LEFT JOIN items i ON i.group_id = g.id \
         ORDER BY g.orden, g.id, i.orden, i.id",
    )
    .fetch_all(db)
    .await?;

    let mut groups: Vec<ItemGroup> = Vec::new();
    for row in rows {
        if groups.last().is_none_or(|g| g.id != row.group_id) {
            groups.push(ItemGroup {
                id: row.group_id,
                nombre: row.group_nombre,
                orden: row.group_orden,
                items: Vec::new(),
            });
        }
        if let (Some(group), Some(id), Some(nombre)) = (groups.last_mut(), row.item_id, row.item_nombre) {
            group.items.push(Item {
                id,
                group_id: row.group_id,
                nombre,
                orden: row.item_orden.unwrap_or(0),
            });
        }
    }
    Ok(groups)
}

pub async fn insert_group(db: impl PgExecutor<'_>, id: i64, nombre: &str, orden: i32) -> Result<(), AppError> {
    sqlx::query("INSERT INTO item_groups (id, nombre, orden) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(nombre)
        .bind(orden)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn insert_item(db: impl PgExecutor<'_>, item: &Item) -> Result<(), AppError> {
    sqlx::query("INSERT INTO items (id, group_id, nombre, orden) VALUES ($1, $2, $3, $4)")
        .bind(item.id)
        .bind(item.group_id)
        .bind(&item.nombre)
        .bind(item.orden)
        .execute(db)
        .await?;
    Ok(())
}

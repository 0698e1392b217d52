use sqlx::PgExecutor;

use crate::errors::AppError;
use super::types::EncuentroConfig;

pub async fn find_by_id(db: impl PgExecutor<'_>, id: i64) -> Result<Option<EncuentroConfig>, AppError> {
    let config = sqlx::query_as::<_, EncuentroConfig>(
        "SELECT id, nombre, min_participantes, max_participantes \
         FROM encuentro_configs WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(config)
}

pub async fn insert(db: impl PgExecutor<'_>, config: &EncuentroConfig) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO encuentro_configs (id, nombre, min_participantes, max_participantes) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(config.id)
    .bind(&config.nombre)
    .bind(config.min_participantes)
    .bind(config.max_participantes)
    .execute(db)
    .await?;
    Ok(())
}

use sqlx::PgExecutor;

use crate::errors::AppError;
use super::types::*;

/// Participants whose RUT is in `ruts`.
pub async fn find_by_ruts(db: impl PgExecutor<'_>, ruts: &[String]) -> Result<Vec<Participant>, AppError> {
    let rows = sqlx::query_as::<_, Participant>(
        "SELECT id, rut, nombre, apellido FROM participants WHERE rut = ANY($1) ORDER BY id",
    )
    .bind(ruts)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Insert a participant. A RUT that already exists maps to `AppError::Conflict`.
pub async fn create(db: impl PgExecutor<'_>, new: &NewParticipant) -> Result<i64, AppError> {
    let result: Result<i64, sqlx::Error> = sqlx::query_scalar(
        "INSERT INTO participants (rut, nombre, apellido) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&new.rut)
    .bind(&new.nombre)
    .bind(&new.apellido)
    .fetch_one(db)
    .await;

    match result {
        Ok(id) => Ok(id),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(new.rut.clone())),
        Err(e) => Err(e.into()),
    }
}

use sqlx::PgExecutor;

use crate::errors::AppError;
use super::types::*;

pub async fn create(db: impl PgExecutor<'_>, new: &NewActa) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO actas (comuna_id, encuentro_id, memoria_historica, fecha) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(new.comuna_id)
    .bind(new.encuentro_id)
    .bind(&new.memoria_historica)
    .bind(new.fecha)
    .fetch_one(db)
    .await?;
    Ok(id)
}

pub async fn add_participant(db: impl PgExecutor<'_>, acta_id: i64, participant_id: i64) -> Result<(), AppError> {
    sqlx::query("INSERT INTO acta_participants (acta_id, participant_id) VALUES ($1, $2)")
        .bind(acta_id)
        .bind(participant_id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn create_response(db: impl PgExecutor<'_>, new: &NewResponse) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO acta_responses (acta_id, item_id, categoria, fundamento) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(new.acta_id)
    .bind(new.item_id)
    .bind(new.categoria.code())
    .bind(&new.fundamento)
    .fetch_one(db)
    .await?;
    Ok(id)
}

pub async fn count(db: impl PgExecutor<'_>) -> Result<i64, AppError> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM actas")
        .fetch_one(db)
        .await?;
    Ok(n)
}

pub async fn count_responses(db: impl PgExecutor<'_>) -> Result<i64, AppError> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM acta_responses")
        .fetch_one(db)
        .await?;
    Ok(n)
}

/// Every participant attached to an acta, oldest acta first.
pub async fn export_participants(db: impl PgExecutor<'_>) -> Result<Vec<ParticipantExportRow>, AppError> {
    let rows = sqlx::query_as::<_, ParticipantExportRow>(
        "SELECT p.rut, p.nombre, p.apellido, c.nombre AS comuna, a.fecha \
         FROM acta_participants ap \
         JOIN participants p ON p.id = ap.participant_id \
         JOIN actas a ON a.id = ap.acta_id \
         JOIN comunas c ON c.id = a.comuna_id \
         ORDER BY a.id, p.id",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Every response with its acta's geography and the item's group.
pub async fn export_responses(db: impl PgExecutor<'_>) -> Result<Vec<ResponseExportRow>, AppError> {
    let rows = sqlx::query_as::<_, ResponseExportRow>(
        "SELECT a.id AS acta_id, a.fecha, \
                r.nombre AS region, p.nombre AS provincia, c.nombre AS comuna, \
                g.nombre AS grupo, i.nombre AS item, \
                ar.categoria, ar.fundamento \
         FROM acta_responses ar \
         JOIN actas a ON a.id = ar.acta_id \
         JOIN comunas c ON c.id = a.comuna_id \
         JOIN provinces p ON p.id = c.provincia_id \
         JOIN regions r ON r.id = p.region_id \
         JOIN items i ON i.id = ar.item_id \
         JOIN item_groups g ON g.id = i.group_id \
         ORDER BY a.id, g.orden, i.orden, ar.id",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

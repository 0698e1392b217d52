use std::collections::HashSet;

use crate::errors::AppError;
use crate::models::encuentro::ParticipantBounds;
use crate::models::submission::ParticipantInput;
use crate::store::Catalog;
use super::rut;

const MIN_NAME_CHARS: usize = 2;

pub fn already_participated(rut: &str) -> String {
    format!("El RUT {rut} ya participó del proceso.")
}

/// Validate the participant roster.
///
/// Stages, each returning early when it produces messages:
/// 1. the list exists and its length is within `bounds` (one message);
/// 2. per-participant RUT, name and surname (all messages, 1-based positions);
/// 3. RUTs are pairwise distinct (one message);
/// 4. (name, surname) pairs are pairwise distinct, case-insensitively (one message);
/// 5. no RUT has already participated (one message per RUT).
pub async fn validate_participants<C: Catalog>(
    catalog: &mut C,
    participantes: Option<&[ParticipantInput]>,
    bounds: ParticipantBounds,
) -> Result<Vec<String>, AppError> {
    let participantes = match participantes {
        Some(list) if bounds.contains(list.len()) => list,
        _ => return Ok(vec!["Error en el formato de los participantes.".to_string()]),
    };

    let errors: Vec<String> = participantes
        .iter()
        .zip(1..)
        .flat_map(|(p, pos)| validate_participant(p, pos))
        .collect();
    if !errors.is_empty() {
        return Ok(errors);
    }

    let ruts: Vec<String> = participantes
        .iter()
        .filter_map(|p| p.rut.as_deref().and_then(rut::normalize))
        .collect();
    if !is_distinct_within(&ruts, participantes.len(), bounds) {
        return Ok(vec!["Existen RUTs repetidos.".to_string()]);
    }

    let names: Vec<(String, String)> = participantes
        .iter()
        .map(|p| (name_key(p.nombre.as_deref()), name_key(p.apellido.as_deref())))
        .collect();
    if !is_distinct_within(&names, participantes.len(), bounds) {
        return Ok(vec!["Existen nombres repetidos.".to_string()]);
    }

    let existing: HashSet<String> = catalog
        .find_participants_by_rut(&ruts)
        .await?
        .into_iter()
        .map(|p| p.rut)
        .collect();
    Ok(ruts
        .iter()
        .filter(|r| existing.contains(*r))
        .map(|r| already_participated(r))
        .collect())
}

/// Field checks for the participant at 1-based position `pos`.
pub fn validate_participant(p: &ParticipantInput, pos: usize) -> Vec<String> {
    let mut errors = Vec::new();
    if !p.rut.as_deref().is_some_and(rut::verify_rut) {
        errors.push(format!("RUT del participante {pos} es inválido."));
    }
    if !is_valid_name(p.nombre.as_deref()) {
        errors.push(format!("Nombre del participante {pos} es inválido."));
    }
    if !is_valid_name(p.apellido.as_deref()) {
        errors.push(format!("Apellido del participante {pos} es inválido."));
    }
    errors
}

fn is_valid_name(name: Option<&str>) -> bool {
    name.is_some_and(|n| n.chars().count() >= MIN_NAME_CHARS)
}

fn name_key(name: Option<&str>) -> String {
    name.unwrap_or_default().trim().to_lowercase()
}

/// Every value distinct, and the distinct count inside `bounds`.
fn is_distinct_within<T: Eq + std::hash::Hash>(values: &[T], total: usize, bounds: ParticipantBounds) -> bool {
    let distinct = values.iter().collect::<HashSet<_>>().len();
    distinct == total && bounds.contains(distinct)
}

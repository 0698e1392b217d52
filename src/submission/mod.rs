//! Validate-only and validate-and-confirm entry points.
//!
//! Both open a unit of work before any lookup, the encuentro bounds included.
//! `validate` always rolls it back; `confirm` commits only after the document
//! check and every write succeeded, and rolls back on every other path.

pub mod pipeline;
pub mod writer;

use chrono::Utc;

use crate::errors::AppError;
use crate::models::encuentro::ParticipantBounds;
use crate::models::submission::{ActaSubmission, SubmitResponse, INVALID_REQUEST};
use crate::store::{Catalog, Store, UnitOfWork};
use crate::validation::DocumentVerifier;
use crate::validation::participants::already_participated;

pub use writer::{ValidatedActa, save_acta};

pub const VALIDATED: &str = "El acta ha sido validada exitosamente.";
pub const CONFIRMED: &str = "El acta ha sido ingresada exitosamente.";
pub const INVALID_ENCUENTRO: &str = "Encuentro inválido.";

/// Bounds for this submission: the named encuentro's, else `defaults`.
/// `None` when the submission names an encuentro that does not exist.
pub async fn resolve_bounds<C: Catalog>(
    catalog: &mut C,
    encuentro: Option<i64>,
    defaults: ParticipantBounds,
) -> Result<Option<ParticipantBounds>, AppError> {
    match encuentro {
        None => Ok(Some(defaults)),
        Some(id) => Ok(catalog.find_encuentro(id).await?.as_ref().map(ParticipantBounds::from)),
    }
}

/// Bounds, then the validation pipeline, both inside `catalog`.
async fn check<C: Catalog>(
    catalog: &mut C,
    defaults: ParticipantBounds,
    acta: &ActaSubmission,
) -> Result<Vec<String>, AppError> {
    match resolve_bounds(catalog, acta.encuentro, defaults).await? {
        Some(bounds) => pipeline::run(catalog, acta, bounds).await,
        None => Ok(vec![INVALID_ENCUENTRO.to_string()]),
    }
}

/// Run the validators without persisting anything.
pub async fn validate<S: Store>(
    store: &S,
    defaults: ParticipantBounds,
    acta: &ActaSubmission,
) -> Result<SubmitResponse, AppError> {
    let mut uow = store.begin().await?;
    let result = check(&mut uow, defaults, acta).await;
    uow.rollback().await?;

    let errors = result?;
    if errors.is_empty() {
        Ok(SubmitResponse::success(VALIDATED))
    } else {
        Ok(SubmitResponse::error(errors))
    }
}

enum Step {
    Rejected(Vec<String>),
    Written(i64),
}

/// Validate, check every participant's document, then persist the acta.
pub async fn confirm<S: Store, V: DocumentVerifier>(
    store: &S,
    verifier: &V,
    defaults: ParticipantBounds,
    acta: &ActaSubmission,
) -> Result<SubmitResponse, AppError> {
    let mut uow = store.begin().await?;
    let outcome = match confirm_in(&mut uow, verifier, defaults, acta).await {
        Ok(Step::Written(id)) => uow.commit().await.map(|()| Step::Written(id)),
        Ok(rejected) => uow.rollback().await.map(|()| rejected),
        Err(e) => {
            if let Err(rollback) = uow.rollback().await {
                log::error!("Rollback after failed confirmation also failed: {rollback}");
            }
            Err(e)
        }
    };

    match outcome {
        Ok(Step::Written(acta_id)) => {
            log::info!(
                "Acta {} stored for comuna {:?} with {} participants",
                acta_id,
                acta.geo.comuna,
                acta.participantes.as_ref().map_or(0, Vec::len)
            );
            Ok(SubmitResponse::success(CONFIRMED))
        }
        Ok(Step::Rejected(errors)) => {
            log::warn!("Acta confirmation rejected with {} message(s)", errors.len());
            Ok(SubmitResponse::error(errors))
        }
        Err(AppError::Conflict(rut)) => {
            log::warn!("Acta confirmation lost a race on an already registered RUT");
            Ok(SubmitResponse::error(vec![already_participated(&rut)]))
        }
        Err(e) => Err(e),
    }
}

async fn confirm_in<U: UnitOfWork, V: DocumentVerifier>(
    uow: &mut U,
    verifier: &V,
    defaults: ParticipantBounds,
    acta: &ActaSubmission,
) -> Result<Step, AppError> {
    let errors = check(uow, defaults, acta).await?;
    if !errors.is_empty() {
        return Ok(Step::Rejected(errors));
    }

    let validated = ValidatedActa::from_submission(acta)
        .ok_or_else(|| AppError::BadRequest(INVALID_REQUEST.to_string()))?;

    let mut errors = Vec::new();
    for p in &validated.participants {
        errors.extend(verifier.verify(&p.rut, p.serie_cedula.as_deref()).await);
    }
    if !errors.is_empty() {
        return Ok(Step::Rejected(errors));
    }

    let acta_id = save_acta(uow, &validated, Utc::now()).await?;
    Ok(Step::Written(acta_id))
}

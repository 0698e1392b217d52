use actix_web::{HttpResponse, web};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::submission::{ActaSubmission, INVALID_REQUEST, SubmitResponse};
use crate::store::Store;
use crate::submission;
use crate::validation::DocumentVerifier;

/// POST /subir/validar: run every validator, persist nothing.
pub async fn validar<S: Store + 'static>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let acta = ActaSubmission::from_json(&body)?;
    let outcome = submission::validate(store.get_ref(), config.participant_bounds, &acta).await?;
    Ok(respond(outcome))
}

/// POST /subir/confirmar: validate, check cédulas, then store the acta.
pub async fn confirmar<S, V>(
    store: web::Data<S>,
    verifier: web::Data<V>,
    config: web::Data<AppConfig>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    V: DocumentVerifier + 'static,
{
    let acta = ActaSubmission::from_json(&body)?;
    let outcome = submission::confirm(
        store.get_ref(),
        verifier.get_ref(),
        config.participant_bounds,
        &acta,
    )
    .await?;
    Ok(respond(outcome))
}

/// Any method other than POST on the submission endpoints.
pub async fn invalid_method() -> HttpResponse {
    HttpResponse::BadRequest().json(SubmitResponse::error(vec![INVALID_REQUEST.to_string()]))
}

fn respond(outcome: SubmitResponse) -> HttpResponse {
    if outcome.is_success() {
        HttpResponse::Ok().json(outcome)
    } else {
        HttpResponse::BadRequest().json(outcome)
    }
}

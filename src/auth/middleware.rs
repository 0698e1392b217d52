use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    middleware::Next,
};

use crate::models::submission::SubmitResponse;
use super::csrf;

/// Guard for the JSON submission endpoints.
///
/// POST requests must carry `Content-Type: application/json` and an
/// `X-CSRFToken` header equal to the token stored in the session by
/// `GET /subir/`. Other methods pass through untouched.
pub async fn protect_submission(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if req.method() != Method::POST {
        return next.call(req).await.map(|res| res.map_into_left_body());
    }

    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.starts_with("application/json") {
        let body = SubmitResponse::error(vec!["Content-Type debe ser application/json.".to_string()]);
        let response = HttpResponse::BadRequest().json(body);
        return Ok(req.into_response(response).map_into_right_body());
    }

    let submitted = req
        .headers()
        .get(csrf::HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if !csrf::is_valid(&req.get_session(), submitted.as_deref()) {
        log::warn!("Rejected {} without a valid CSRF token", req.path());
        let body = SubmitResponse::error(vec!["Token CSRF inválido o ausente.".to_string()]);
        let response = HttpResponse::Forbidden().json(body);
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

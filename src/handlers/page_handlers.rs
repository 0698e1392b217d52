use actix_session::Session;
use actix_web::HttpResponse;
use askama::Template;

use crate::auth::csrf;
use crate::errors::{AppError, render};
use crate::templates_structs::{IndexTemplate, ListaTemplate, PageContext, SubirTemplate};

pub async fn index() -> Result<HttpResponse, AppError> {
    render(IndexTemplate { ctx: PageContext::new("/") })
}

pub async fn lista() -> Result<HttpResponse, AppError> {
    render(ListaTemplate { ctx: PageContext::new("/lista") })
}

/// Submission form. Stores a CSRF token in the session and exposes it in a
/// readable cookie so the page's script can send it back.
pub async fn subir(session: Session) -> Result<HttpResponse, AppError> {
    let csrf_token = csrf::get_or_create_token(&session);
    let tmpl = SubirTemplate {
        ctx: PageContext::new("/subir/"),
        csrf_token: csrf_token.clone(),
        encuentro: 1,
    };
    let html = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .cookie(csrf::token_cookie(&csrf_token))
        .body(html))
}

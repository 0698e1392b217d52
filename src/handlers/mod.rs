pub mod acta_handlers;
pub mod catalog_handlers;
pub mod export_handlers;
pub mod page_handlers;

use actix_web::{HttpResponse, web};

use crate::auth::middleware::protect_submission;
use crate::store::Store;
use crate::validation::DocumentVerifier;

/// Register every route. The application must provide `web::Data<S>`,
/// `web::Data<V>` and `web::Data<AppConfig>` plus a session middleware.
pub fn configure<S, V>(cfg: &mut web::ServiceConfig)
where
    S: Store + 'static,
    V: DocumentVerifier + 'static,
{
    cfg.route("/", web::get().to(page_handlers::index))
        .route("/lista", web::get().to(page_handlers::lista))
        .route("/base/{id}", web::get().to(catalog_handlers::base::<S>))
        .route("/geo", web::get().to(catalog_handlers::geo::<S>))
        .route("/bajartext", web::get().to(export_handlers::participants::<S>))
        .route("/bajartodo", web::get().to(export_handlers::responses::<S>))
        // `/subir/` sets the CSRF token; the two POST endpoints check it.
        .service(
            web::scope("/subir")
                .wrap(actix_web::middleware::from_fn(protect_submission))
                .route("/", web::get().to(page_handlers::subir))
                .service(
                    web::resource("/validar")
                        .route(web::post().to(acta_handlers::validar::<S>))
                        .default_service(web::to(acta_handlers::invalid_method)),
                )
                .service(
                    web::resource("/confirmar")
                        .route(web::post().to(acta_handlers::confirmar::<S, V>))
                        .default_service(web::to(acta_handlers::invalid_method)),
                ),
        );
}

/// Default service: static 404 page.
pub async fn not_found() -> HttpResponse {
    let html = include_str!("../../templates/errors/404.html");
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

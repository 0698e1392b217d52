/// HTTP tests: routing, CSRF protection and the JSON envelope, served by
/// `actix_web::test` over the in-memory store.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use actas::config::AppConfig;
use actas::handlers;
use actas::models::submission::{Status, SubmitResponse};
use actas::store::MemoryStore;
use actas::validation::SerialFormatVerifier;

mod common;
use common::*;

macro_rules! app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new($store.clone()))
                .app_data(web::Data::new(SerialFormatVerifier))
                .app_data(web::Data::new(AppConfig::default()))
                .configure(handlers::configure::<MemoryStore, SerialFormatVerifier>)
                .default_service(web::to(handlers::not_found)),
        )
        .await
    };
}

/// GET /subir/ and return the cookies it set plus the CSRF token.
macro_rules! open_form {
    ($app:expr) => {{
        let resp = test::call_service(&$app, test::TestRequest::get().uri("/subir/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookies: Vec<Cookie<'static>> = resp.response().cookies().map(|c| c.into_owned()).collect();
        let token = cookies
            .iter()
            .find(|c| c.name() == "csrftoken")
            .expect("csrftoken cookie")
            .value()
            .to_string();
        (cookies, token)
    }};
}

fn post(uri: &str, cookies: &[Cookie<'static>], token: &str, body: &Value) -> test::TestRequest {
    let mut req = test::TestRequest::post()
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .insert_header(("X-CSRFToken", token.to_string()))
        .set_payload(body.to_string());
    for cookie in cookies {
        req = req.cookie(cookie.clone());
    }
    req
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_pages_render() {
    let store = memory_store();
    let app = app!(store);
    for uri in ["/", "/lista", "/subir/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let store = memory_store();
    let app = app!(store);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/no-existe").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_form_sets_readable_csrf_cookie() {
    let store = memory_store();
    let app = app!(store);
    let (cookies, token) = open_form!(app);
    assert_eq!(token.len(), 64);
    let csrf = cookies.iter().find(|c| c.name() == "csrftoken").unwrap();
    assert_ne!(csrf.http_only(), Some(true));
}

// ---------------------------------------------------------------------------
// Submission endpoints
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_validar_success_returns_envelope() {
    let store = memory_store();
    let app = app!(store);
    let (cookies, token) = open_form!(app);

    let resp = test::call_service(&app, post("/subir/validar", &cookies, &token, &valid_acta()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: SubmitResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, Status::Success);
    assert_eq!(body.mensajes, vec!["El acta ha sido validada exitosamente."]);
    assert!(store.actas().is_empty());
}

#[actix_web::test]
async fn test_confirmar_success_stores_acta() {
    let store = memory_store();
    let app = app!(store);
    let (cookies, token) = open_form!(app);

    let resp = test::call_service(&app, post("/subir/confirmar", &cookies, &token, &valid_acta()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "status": "success", "mensajes": ["El acta ha sido ingresada exitosamente."] }));
    assert_eq!(store.actas().len(), 1);
    assert_eq!(store.participants().len(), 4);
}

#[actix_web::test]
async fn test_confirmar_bad_category_is_400_and_writes_nothing() {
    let store = memory_store();
    let app = app!(store);
    let (cookies, token) = open_form!(app);
    let mut acta = valid_acta();
    acta["itemsGroups"][0]["items"][0]["categoria"] = json!("2");

    let resp = test::call_service(&app, post("/subir/confirmar", &cookies, &token, &acta).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: SubmitResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, Status::Error);
    assert_eq!(
        body.mensajes,
        vec!["No se ha seleccionado la categoría del ítem Democracia, del grupo Valores y principios."]
    );
    assert!(store.actas().is_empty());
    assert!(store.responses().is_empty());
}

#[actix_web::test]
async fn test_malformed_body_is_invalid_request() {
    let store = memory_store();
    let app = app!(store);
    let (cookies, token) = open_form!(app);

    for body in [json!({ "geo": {} }), json!([1, 2, 3]), json!({ "itemsGroups": [ { "items": 5 } ] })] {
        let resp = test::call_service(&app, post("/subir/validar", &cookies, &token, &body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: SubmitResponse = test::read_body_json(resp).await;
        assert_eq!(body.mensajes, vec!["Request inválido."]);
    }
}

#[actix_web::test]
async fn test_non_post_is_invalid_request() {
    let store = memory_store();
    let app = app!(store);
    for uri in ["/subir/validar", "/subir/confirmar"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: SubmitResponse = test::read_body_json(resp).await;
        assert_eq!(body.mensajes, vec!["Request inválido."]);
    }
}

#[actix_web::test]
async fn test_missing_or_wrong_csrf_token_is_403() {
    let store = memory_store();
    let app = app!(store);
    let (cookies, _token) = open_form!(app);

    let resp = test::call_service(&app, post("/subir/confirmar", &cookies, "forged", &valid_acta()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // No session at all.
    let resp = test::call_service(&app, post("/subir/confirmar", &[], "forged", &valid_acta()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(store.actas().is_empty());
}

#[actix_web::test]
async fn test_non_json_content_type_is_400() {
    let store = memory_store();
    let app = app!(store);
    let (cookies, token) = open_form!(app);

    let mut req = test::TestRequest::post()
        .uri("/subir/validar")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .insert_header(("X-CSRFToken", token))
        .set_payload("geo=1");
    for cookie in &cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Catalog and exports
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_base_returns_form_skeleton() {
    let store = memory_store();
    let app = app!(store);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/base/1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["encuentro"], 1);
    assert_eq!(body["participantes"].as_array().unwrap().len(), 4);
    assert_eq!(body["itemsGroups"].as_array().unwrap().len(), 4);
    assert_eq!(body["itemsGroups"][0]["items"][0], json!({
        "pk": 1, "nombre": "Democracia", "categoria": null, "fundamento": ""
    }));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/base/99").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_geo_tree() {
    let store = memory_store();
    let app = app!(store);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/geo").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let regions = body.as_array().unwrap();
    assert_eq!(regions.len(), 3);
    let metropolitana = regions.iter().find(|r| r["id"] == REGION_METROPOLITANA).unwrap();
    assert_eq!(metropolitana["provincias"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_exports_after_confirmation() {
    let store = memory_store();
    let app = app!(store);
    let (cookies, token) = open_form!(app);
    let resp = test::call_service(&app, post("/subir/confirmar", &cookies, &token, &valid_acta()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/bajartext").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("11111111-1;Ana;Rojas;Santiago;"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/bajartodo").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"actas-"));
    let csv = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "acta_id,fecha,region,provincia,comuna,grupo,item,categoria,fundamento");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].ends_with(",Valores y principios,Democracia,1,Base de todo"));
}

#[actix_web::test]
async fn test_single_item_acta_creates_one_acta_and_one_response() {
    let store = memory_store();
    let app = app!(store);
    let (cookies, token) = open_form!(app);
    let mut acta = valid_acta();
    acta["itemsGroups"] = json!([
        { "nombre": "Valores y principios", "items": [ { "pk": 1, "nombre": "Democracia", "categoria": "1", "fundamento": "" } ] }
    ]);

    let resp = test::call_service(&app, post("/subir/confirmar", &cookies, &token, &acta).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(store.actas().len(), 1);
    assert_eq!(store.responses().len(), 1);
}

use std::io;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use actas::config::{AppConfig, StorageBackend};
use actas::models::seed::CatalogSeed;
use actas::store::{MemoryStore, PgStore, Store};
use actas::validation::{CedulaVerifier, DocumentVerifier};
use actas::{db, handlers};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;
    let verifier = CedulaVerifier::from_config(&config).map_err(io::Error::other)?;
    let seed = CatalogSeed::bundled().map_err(io::Error::other)?;

    match config.storage {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .clone()
                .ok_or_else(|| io::Error::other("DATABASE_URL is required for STORAGE=postgres"))?;
            let pool = db::init_pool(&url, config.db_max_connections)
                .await
                .map_err(io::Error::other)?;
            db::run_migrations(&pool).await.map_err(io::Error::other)?;
            db::seed_catalog(&pool, &seed).await.map_err(io::Error::other)?;
            serve(config, PgStore::new(pool), verifier).await
        }
        StorageBackend::Memory => {
            log::warn!("STORAGE=memory: submitted actas are lost on restart");
            serve(config, MemoryStore::from_seed(&seed), verifier).await
        }
    }
}

async fn serve<S, V>(config: AppConfig, store: S, verifier: V) -> io::Result<()>
where
    S: Store + Send + Sync + 'static,
    V: DocumentVerifier + Send + Sync + 'static,
{
    // Session key: SESSION_KEY keeps sessions valid across restarts.
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr = config.bind_addr.clone();
    let store = web::Data::new(store);
    let verifier = web::Data::new(verifier);
    let config = web::Data::new(config);

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
            .cookie_secure(false)
            .cookie_http_only(true)
            .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(store.clone())
            .app_data(verifier.clone())
            .app_data(config.clone())
            .service(actix_files::Files::new("/static", "./static"))
            .configure(handlers::configure::<S, V>)
            // Default 404 handler (must be registered last)
            .default_service(web::to(handlers::not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::encuentro::EncuentroConfig;
use crate::models::item::CatalogGroup;
use crate::store::Store;

/// Serializes as `{}`: an empty geography selection or participant slot.
#[derive(Serialize, Default)]
struct Blank {}

/// Skeleton the submission form starts from for one encuentro type.
#[derive(Serialize)]
struct ActaBase {
    encuentro: i64,
    min_participantes: i32,
    max_participantes: i32,
    geo: Blank,
    participantes: Vec<Blank>,
    #[serde(rename = "itemsGroups")]
    items_groups: Vec<CatalogGroup>,
}

impl ActaBase {
    fn new(config: &EncuentroConfig, items_groups: Vec<CatalogGroup>) -> Self {
        let slots = usize::try_from(config.min_participantes).unwrap_or_default();
        Self {
            encuentro: config.id,
            min_participantes: config.min_participantes,
            max_participantes: config.max_participantes,
            geo: Blank::default(),
            participantes: (0..slots).map(|_| Blank::default()).collect(),
            items_groups,
        }
    }
}

/// GET /base/{id}
pub async fn base<S: Store + 'static>(
    store: web::Data<S>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let config = store.find_encuentro(id).await?.ok_or(AppError::NotFound)?;
    let groups = store.item_groups().await?;
    let body = ActaBase::new(&config, groups.iter().map(CatalogGroup::from).collect());
    Ok(HttpResponse::Ok().json(body))
}

/// GET /geo: regions with their provinces and comunas.
pub async fn geo<S: Store + 'static>(store: web::Data<S>) -> Result<HttpResponse, AppError> {
    let tree = store.geo_tree().await?;
    Ok(HttpResponse::Ok().json(tree))
}

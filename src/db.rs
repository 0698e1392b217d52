use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::errors::AppError;
use crate::models::seed::CatalogSeed;
use crate::models::{encuentro, geo, item};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Load the reference catalog into an empty database. A database that
/// already has regions is left untouched.
pub async fn seed_catalog(pool: &PgPool, seed: &CatalogSeed) -> Result<(), AppError> {
    if geo::count_regions(pool).await? > 0 {
        log::info!("Catalog already seeded, skipping");
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    let mut comunas = 0usize;
    for region in &seed.regions {
        geo::insert_region(&mut *tx, region.id, &region.nombre).await?;
        for provincia in &region.provincias {
            geo::insert_provincia(&mut *tx, provincia.id, region.id, &provincia.nombre).await?;
            for comuna in &provincia.comunas {
                geo::insert_comuna(&mut *tx, comuna.id, provincia.id, &comuna.nombre).await?;
                comunas += 1;
            }
        }
    }

    let mut items = 0usize;
    for group in &seed.item_groups {
        item::insert_group(&mut *tx, group.id, &group.nombre, group.orden).await?;
        for (seed_item, orden) in group.items.iter().zip(1..) {
            item::insert_item(
                &mut *tx,
                &item::Item {
                    id: seed_item.id,
                    group_id: group.id,
                    nombre: seed_item.nombre.clone(),
                    orden,
                },
            )
            .await?;
            items += 1;
        }
    }

    for config in &seed.encuentros {
        encuentro::insert(&mut *tx, config).await?;
    }
    tx.commit().await?;

    log::info!(
        "Seeded catalog: regions={}, comunas={}, groups={}, items={}, encuentros={}",
        seed.regions.len(),
        comunas,
        seed.item_groups.len(),
        items,
        seed.encuentros.len()
    );
    Ok(())
}

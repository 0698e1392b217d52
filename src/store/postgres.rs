use sqlx::{PgPool, Postgres, Transaction};

use crate::errors::AppError;
use crate::models::acta::{self, NewActa, NewResponse, ParticipantExportRow, ResponseExportRow};
use crate::models::encuentro::{self, EncuentroConfig};
use crate::models::geo::{self, Comuna, RegionNode};
use crate::models::item::{self, Item, ItemGroup};
use crate::models::participant::{self, NewParticipant, Participant};
use super::{Catalog, Store, UnitOfWork};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// A Postgres transaction. Dropping it without `commit` rolls it back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl Catalog for PgUnitOfWork {
    async fn find_encuentro(&mut self, id: i64) -> Result<Option<EncuentroConfig>, AppError> {
        encuentro::find_by_id(&mut *self.tx, id).await
    }

    async fn find_comuna(&mut self, id: i64) -> Result<Option<Comuna>, AppError> {
        geo::find_comuna(&mut *self.tx, id).await
    }

    async fn find_item(&mut self, id: i64) -> Result<Option<Item>, AppError> {
        item::find_by_id(&mut *self.tx, id).await
    }

    async fn find_participants_by_rut(&mut self, ruts: &[String]) -> Result<Vec<Participant>, AppError> {
        participant::find_by_ruts(&mut *self.tx, ruts).await
    }
}

impl UnitOfWork for PgUnitOfWork {
    async fn insert_acta(&mut self, new: &NewActa) -> Result<i64, AppError> {
        acta::create(&mut *self.tx, new).await
    }

    async fn insert_participant(&mut self, new: &NewParticipant) -> Result<i64, AppError> {
        participant::create(&mut *self.tx, new).await
    }

    async fn attach_participant(&mut self, acta_id: i64, participant_id: i64) -> Result<(), AppError> {
        acta::add_participant(&mut *self.tx, acta_id, participant_id).await
    }

    async fn insert_response(&mut self, new: &NewResponse) -> Result<i64, AppError> {
        acta::create_response(&mut *self.tx, new).await
    }

    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), AppError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

impl Store for PgStore {
    type Uow = PgUnitOfWork;

    async fn begin(&self) -> Result<Self::Uow, AppError> {
        let tx = self.pool.begin().await?;
        Ok(PgUnitOfWork { tx })
    }

    async fn find_encuentro(&self, id: i64) -> Result<Option<EncuentroConfig>, AppError> {
        encuentro::find_by_id(&self.pool, id).await
    }

    async fn item_groups(&self) -> Result<Vec<ItemGroup>, AppError> {
        item::find_groups(&self.pool).await
    }

    async fn geo_tree(&self) -> Result<Vec<RegionNode>, AppError> {
        geo::find_tree(&self.pool).await
    }

    async fn export_participants(&self) -> Result<Vec<ParticipantExportRow>, AppError> {
        acta::export_participants(&self.pool).await
    }

    async fn export_responses(&self) -> Result<Vec<ResponseExportRow>, AppError> {
        acta::export_responses(&self.pool).await
    }
}

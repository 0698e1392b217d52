//! Storage seam between the submission flow and the database.
//!
//! Validators only see [`Catalog`]. The orchestrator opens a [`UnitOfWork`]
//! from a [`Store`] before validating and either commits it after every write
//! succeeded or rolls it back.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::errors::AppError;
use crate::models::acta::{NewActa, NewResponse, ParticipantExportRow, ResponseExportRow};
use crate::models::encuentro::EncuentroConfig;
use crate::models::geo::{Comuna, RegionNode};
use crate::models::item::{Item, ItemGroup};
use crate::models::participant::{NewParticipant, Participant};

/// Read-only lookups used by the validators.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    async fn find_encuentro(&mut self, id: i64) -> Result<Option<EncuentroConfig>, AppError>;
    async fn find_comuna(&mut self, id: i64) -> Result<Option<Comuna>, AppError>;
    async fn find_item(&mut self, id: i64) -> Result<Option<Item>, AppError>;
    async fn find_participants_by_rut(&mut self, ruts: &[String]) -> Result<Vec<Participant>, AppError>;
}

/// One atomic request: catalog reads plus the acta writes.
/// Nothing written becomes visible unless `commit` returns `Ok`.
#[allow(async_fn_in_trait)]
pub trait UnitOfWork: Catalog {
    async fn insert_acta(&mut self, acta: &NewActa) -> Result<i64, AppError>;
    /// Fails with `AppError::Conflict` if the RUT is already registered.
    async fn insert_participant(&mut self, participant: &NewParticipant) -> Result<i64, AppError>;
    async fn attach_participant(&mut self, acta_id: i64, participant_id: i64) -> Result<(), AppError>;
    async fn insert_response(&mut self, response: &NewResponse) -> Result<i64, AppError>;
    async fn commit(self) -> Result<(), AppError>;
    async fn rollback(self) -> Result<(), AppError>;
}

#[allow(async_fn_in_trait)]
pub trait Store {
    type Uow: UnitOfWork;

    async fn begin(&self) -> Result<Self::Uow, AppError>;
    async fn find_encuentro(&self, id: i64) -> Result<Option<EncuentroConfig>, AppError>;
    async fn item_groups(&self) -> Result<Vec<ItemGroup>, AppError>;
    async fn geo_tree(&self) -> Result<Vec<RegionNode>, AppError>;
    async fn export_participants(&self) -> Result<Vec<ParticipantExportRow>, AppError>;
    async fn export_responses(&self) -> Result<Vec<ResponseExportRow>, AppError>;
}

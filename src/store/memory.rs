//! In-process store backed by a mutex-guarded set of tables.
//!
//! Writes made through a [`MemoryUnitOfWork`] are buffered and only applied to
//! the shared tables on `commit`, where the participant RUT uniqueness that the
//! Postgres schema enforces is checked again.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::AppError;
use crate::models::acta::{
    Acta, ActaResponse, NewActa, NewResponse, ParticipantExportRow, ResponseExportRow,
};
use crate::models::encuentro::EncuentroConfig;
use crate::models::geo::{Comuna, GeoRow, RegionNode, build_tree};
use crate::models::item::{Item, ItemGroup};
use crate::models::participant::{NewParticipant, Participant};
use crate::models::seed::CatalogSeed;
use super::{Catalog, Store, UnitOfWork};

#[derive(Debug, Default)]
struct Tables {
    regions: BTreeMap<i64, String>,
    /// id → (region_id, nombre)
    provinces: BTreeMap<i64, (i64, String)>,
    /// id → (provincia_id, nombre)
    comunas: BTreeMap<i64, (i64, String)>,
    groups: Vec<ItemGroup>,
    items: BTreeMap<i64, Item>,
    encuentros: BTreeMap<i64, EncuentroConfig>,
    participants: Vec<Participant>,
    actas: Vec<Acta>,
    acta_participants: Vec<(i64, i64)>,
    responses: Vec<ActaResponse>,
    next_id: i64,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn comuna(&self, id: i64) -> Option<Comuna> {
        let (provincia_id, nombre) = self.comunas.get(&id)?;
        let (region_id, _) = self.provinces.get(provincia_id)?;
        Some(Comuna {
            id,
            nombre: nombre.clone(),
            provincia_id: *provincia_id,
            region_id: *region_id,
        })
    }

    fn geo_names(&self, comuna_id: i64) -> (String, String, String) {
        let (provincia_id, comuna) = self.comunas.get(&comuna_id).cloned().unwrap_or_default();
        let (region_id, provincia) = self.provinces.get(&provincia_id).cloned().unwrap_or_default();
        let region = self.regions.get(&region_id).cloned().unwrap_or_default();
        (region, provincia, comuna)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// A store holding the given reference data and no actas.
    pub fn from_seed(seed: &CatalogSeed) -> Self {
        let mut tables = Tables::default();
        for region in &seed.regions {
            tables.regions.insert(region.id, region.nombre.clone());
            for provincia in &region.provincias {
                tables.provinces.insert(provincia.id, (region.id, provincia.nombre.clone()));
                for comuna in &provincia.comunas {
                    tables.comunas.insert(comuna.id, (provincia.id, comuna.nombre.clone()));
                }
            }
        }

        let mut groups: Vec<ItemGroup> = seed
            .item_groups
            .iter()
            .map(|group| ItemGroup {
                id: group.id,
                nombre: group.nombre.clone(),
                orden: group.orden,
                items: group
                    .items
                    .iter()
                    .zip(1..)
                    .map(|(item, orden)| Item {
                        id: item.id,
                        group_id: group.id,
                        nombre: item.nombre.clone(),
                        orden,
                    })
                    .collect(),
            })
            .collect();
        groups.sort_by_key(|g| (g.orden, g.id));
        for item in groups.iter().flat_map(|g| g.items.iter()) {
            tables.items.insert(item.id, item.clone());
        }
        tables.groups = groups;

        for config in &seed.encuentros {
            tables.encuentros.insert(config.id, config.clone());
        }

        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a participant outside any acta (e.g. one imported from an earlier process).
    pub fn register_participant(&self, new: &NewParticipant) -> Result<i64, AppError> {
        let mut tables = self.lock();
        if tables.participants.iter().any(|p| p.rut == new.rut) {
            return Err(AppError::Conflict(new.rut.clone()));
        }
        let id = tables.allocate_id();
        tables.participants.push(Participant {
            id,
            rut: new.rut.clone(),
            nombre: new.nombre.clone(),
            apellido: new.apellido.clone(),
        });
        Ok(id)
    }

    pub fn actas(&self) -> Vec<Acta> {
        self.lock().actas.clone()
    }

    pub fn responses(&self) -> Vec<ActaResponse> {
        self.lock().responses.clone()
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.lock().participants.clone()
    }

    /// RUTs attached to the given acta, in insertion order.
    pub fn acta_participant_ruts(&self, acta_id: i64) -> Vec<String> {
        let tables = self.lock();
        tables
            .acta_participants
            .iter()
            .filter(|(a, _)| *a == acta_id)
            .filter_map(|(_, p)| tables.participants.iter().find(|x| x.id == *p))
            .map(|p| p.rut.clone())
            .collect()
    }
}

#[derive(Debug, Default)]
struct Pending {
    actas: Vec<Acta>,
    participants: Vec<Participant>,
    links: Vec<(i64, i64)>,
    responses: Vec<ActaResponse>,
}

pub struct MemoryUnitOfWork {
    store: MemoryStore,
    pending: Pending,
}

impl Catalog for MemoryUnitOfWork {
    async fn find_encuentro(&mut self, id: i64) -> Result<Option<EncuentroConfig>, AppError> {
        Ok(self.store.lock().encuentros.get(&id).cloned())
    }

    async fn find_comuna(&mut self, id: i64) -> Result<Option<Comuna>, AppError> {
        Ok(self.store.lock().comuna(id))
    }

    async fn find_item(&mut self, id: i64) -> Result<Option<Item>, AppError> {
        Ok(self.store.lock().items.get(&id).cloned())
    }

    async fn find_participants_by_rut(&mut self, ruts: &[String]) -> Result<Vec<Participant>, AppError> {
        let wanted: HashSet<&str> = ruts.iter().map(String::as_str).collect();
        let tables = self.store.lock();
        Ok(tables
            .participants
            .iter()
            .chain(self.pending.participants.iter())
            .filter(|p| wanted.contains(p.rut.as_str()))
            .cloned()
            .collect())
    }
}

impl UnitOfWork for MemoryUnitOfWork {
    async fn insert_acta(&mut self, new: &NewActa) -> Result<i64, AppError> {
        let id = self.store.lock().allocate_id();
        self.pending.actas.push(Acta {
            id,
            comuna_id: new.comuna_id,
            encuentro_id: new.encuentro_id,
            memoria_historica: new.memoria_historica.clone(),
            fecha: new.fecha,
        });
        Ok(id)
    }

    async fn insert_participant(&mut self, new: &NewParticipant) -> Result<i64, AppError> {
        if self.pending.participants.iter().any(|p| p.rut == new.rut) {
            return Err(AppError::Conflict(new.rut.clone()));
        }
        let id = {
            let mut tables = self.store.lock();
            if tables.participants.iter().any(|p| p.rut == new.rut) {
                return Err(AppError::Conflict(new.rut.clone()));
            }
            tables.allocate_id()
        };
        self.pending.participants.push(Participant {
            id,
            rut: new.rut.clone(),
            nombre: new.nombre.clone(),
            apellido: new.apellido.clone(),
        });
        Ok(id)
    }

    async fn attach_participant(&mut self, acta_id: i64, participant_id: i64) -> Result<(), AppError> {
        self.pending.links.push((acta_id, participant_id));
        Ok(())
    }

    async fn insert_response(&mut self, new: &NewResponse) -> Result<i64, AppError> {
        let id = self.store.lock().allocate_id();
        self.pending.responses.push(ActaResponse {
            id,
            acta_id: new.acta_id,
            item_id: new.item_id,
            categoria: new.categoria,
            fundamento: new.fundamento.clone(),
        });
        Ok(id)
    }

    async fn commit(self) -> Result<(), AppError> {
        let mut tables = self.store.lock();
        // Another unit of work may have committed the same RUT since insert.
        if let Some(taken) = self
            .pending
            .participants
            .iter()
            .find(|p| tables.participants.iter().any(|existing| existing.rut == p.rut))
        {
            return Err(AppError::Conflict(taken.rut.clone()));
        }
        let Pending { actas, participants, links, responses } = self.pending;
        tables.actas.extend(actas);
        tables.participants.extend(participants);
        tables.acta_participants.extend(links);
        tables.responses.extend(responses);
        Ok(())
    }

    async fn rollback(self) -> Result<(), AppError> {
        Ok(())
    }
}

impl Store for MemoryStore {
    type Uow = MemoryUnitOfWork;

    async fn begin(&self) -> Result<Self::Uow, AppError> {
        Ok(MemoryUnitOfWork {
            store: self.clone(),
            pending: Pending::default(),
        })
    }

    async fn find_encuentro(&self, id: i64) -> Result<Option<EncuentroConfig>, AppError> {
        Ok(self.lock().encuentros.get(&id).cloned())
    }

    async fn item_groups(&self) -> Result<Vec<ItemGroup>, AppError> {
        Ok(self.lock().groups.clone())
    }

    async fn geo_tree(&self) -> Result<Vec<RegionNode>, AppError> {
        let tables = self.lock();
        let rows = tables.comunas.iter().filter_map(|(comuna_id, (provincia_id, comuna))| {
            let (region_id, provincia) = tables.provinces.get(provincia_id)?;
            Some(GeoRow {
                region_id: *region_id,
                region: tables.regions.get(region_id)?.clone(),
                provincia_id: *provincia_id,
                provincia: provincia.clone(),
                comuna_id: *comuna_id,
                comuna: comuna.clone(),
            })
        });
        let mut rows: Vec<GeoRow> = rows.collect();
        rows.sort_by_key(|r| (r.region_id, r.provincia_id, r.comuna_id));
        Ok(build_tree(rows))
    }

    async fn export_participants(&self) -> Result<Vec<ParticipantExportRow>, AppError> {
        let tables = self.lock();
        let mut rows = Vec::new();
        for acta in &tables.actas {
            let (_, _, comuna) = tables.geo_names(acta.comuna_id);
            for (_, participant_id) in tables.acta_participants.iter().filter(|(a, _)| *a == acta.id) {
                if let Some(p) = tables.participants.iter().find(|p| p.id == *participant_id) {
                    rows.push(ParticipantExportRow {
                        rut: p.rut.clone(),
                        nombre: p.nombre.clone(),
                        apellido: p.apellido.clone(),
                        comuna: comuna.clone(),
                        fecha: acta.fecha,
                    });
                }
            }
        }
        Ok(rows)
    }

    async fn export_responses(&self) -> Result<Vec<ResponseExportRow>, AppError> {
        let tables = self.lock();
        let mut rows = Vec::new();
        for acta in &tables.actas {
            let (region, provincia, comuna) = tables.geo_names(acta.comuna_id);
            for response in tables.responses.iter().filter(|r| r.acta_id == acta.id) {
                let item = tables.items.get(&response.item_id);
                let grupo = item
                    .and_then(|i| tables.groups.iter().find(|g| g.id == i.group_id))
                    .map(|g| g.nombre.clone())
                    .unwrap_or_default();
                rows.push(ResponseExportRow {
                    acta_id: acta.id,
                    fecha: acta.fecha,
                    region: region.clone(),
                    provincia: provincia.clone(),
                    comuna: comuna.clone(),
                    grupo,
                    item: item.map(|i| i.nombre.clone()).unwrap_or_default(),
                    categoria: response.categoria.code().to_string(),
                    fundamento: response.fundamento.clone(),
                });
            }
        }
        Ok(rows)
    }
}

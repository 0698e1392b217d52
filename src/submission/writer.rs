use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::acta::{Categoria, NewActa, NewResponse};
use crate::models::participant::NewParticipant;
use crate::models::submission::ActaSubmission;
use crate::store::UnitOfWork;
use crate::validation::rut;

/// A submission that passed every validator, in the shape the writer stores.
#[derive(Debug, Clone)]
pub struct ValidatedActa {
    pub comuna_id: i64,
    pub encuentro_id: Option<i64>,
    pub memoria: Option<String>,
    pub participants: Vec<ValidatedParticipant>,
    pub responses: Vec<ValidatedResponse>,
}

#[derive(Debug, Clone)]
pub struct ValidatedParticipant {
    /// Normalised `12345678-5` form.
    pub rut: String,
    pub nombre: String,
    pub apellido: String,
    pub serie_cedula: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidatedResponse {
    pub item_id: i64,
    pub categoria: Categoria,
    pub fundamento: Option<String>,
}

impl ValidatedActa {
    /// `None` if a field the validators guarantee is missing.
    pub fn from_submission(acta: &ActaSubmission) -> Option<Self> {
        let participants = acta
            .participantes
            .as_ref()?
            .iter()
            .map(|p| {
                Some(ValidatedParticipant {
                    rut: rut::normalize(p.rut.as_deref()?)?,
                    nombre: p.nombre.as_deref()?.trim().to_string(),
                    apellido: p.apellido.as_deref()?.trim().to_string(),
                    serie_cedula: p.serie_cedula.clone(),
                })
            })
            .collect::<Option<Vec<_>>>()?;

        let responses = acta
            .items_groups
            .iter()
            .flat_map(|g| g.items.iter())
            .map(|i| {
                Some(ValidatedResponse {
                    item_id: i.pk?,
                    categoria: Categoria::from_code(i.categoria.as_deref()?)?,
                    fundamento: i.fundamento.clone(),
                })
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            comuna_id: acta.geo.comuna?,
            encuentro_id: acta.encuentro,
            memoria: acta.memoria.clone(),
            participants,
            responses,
        })
    }
}

/// Write the acta, its participants and one response per item.
/// Returns the new acta id. The caller owns commit/rollback.
pub async fn save_acta<U: UnitOfWork>(
    uow: &mut U,
    acta: &ValidatedActa,
    fecha: DateTime<Utc>,
) -> Result<i64, AppError> {
    let acta_id = uow
        .insert_acta(&NewActa {
            comuna_id: acta.comuna_id,
            encuentro_id: acta.encuentro_id,
            memoria_historica: acta.memoria.clone(),
            fecha,
        })
        .await?;

    for p in &acta.participants {
        let participant_id = uow
            .insert_participant(&NewParticipant {
                rut: p.rut.clone(),
                nombre: p.nombre.clone(),
                apellido: p.apellido.clone(),
            })
            .await?;
        uow.attach_participant(acta_id, participant_id).await?;
    }

    for r in &acta.responses {
        uow.insert_response(&NewResponse {
            acta_id,
            item_id: r.item_id,
            categoria: r.categoria,
            fundamento: r.fundamento.clone(),
        })
        .await?;
    }

    Ok(acta_id)
}

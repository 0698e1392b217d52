//! Request and response contract of `/subir/validar` and `/subir/confirmar`.
//!
//! The body must be a JSON object whose `itemsGroups` is a list of groups, each
//! with an `items` list of objects; anything else is rejected before validation.
//! Fields whose type the validators report on (geography ids, participant
//! fields, item fields) decode leniently: a value of the wrong type becomes
//! `None` and the corresponding validator produces its message.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const INVALID_REQUEST: &str = "Request inválido.";

#[derive(Debug, Clone, Deserialize)]
pub struct ActaSubmission {
    #[serde(default, deserialize_with = "lenient::geo")]
    pub geo: GeoSelection,
    /// `None` when the key is missing or not a list.
    #[serde(default, deserialize_with = "lenient::participants")]
    pub participantes: Option<Vec<ParticipantInput>>,
    #[serde(rename = "itemsGroups")]
    pub items_groups: Vec<ItemGroupInput>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub memoria: Option<String>,
    /// Encuentro configuration whose participant bounds govern this acta.
    #[serde(default, deserialize_with = "lenient::int")]
    pub encuentro: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoSelection {
    #[serde(default, deserialize_with = "lenient::int")]
    pub region: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub provincia: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub comuna: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParticipantInput {
    #[serde(default, deserialize_with = "lenient::string")]
    pub rut: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub apellido: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub serie_cedula: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemGroupInput {
    #[serde(default, deserialize_with = "lenient::string")]
    pub nombre: Option<String>,
    pub items: Vec<ItemInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    #[serde(default, deserialize_with = "lenient::int")]
    pub pk: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub categoria: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub fundamento: Option<String>,
}

impl ActaSubmission {
    /// Decode a request body. Shape errors become a 400 with the generic message.
    pub fn from_json(body: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(body).map_err(|e| {
            log::debug!("Rejected submission body: {e}");
            AppError::BadRequest(INVALID_REQUEST.to_string())
        })
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{GeoSelection, ParticipantInput};

    /// JSON integers only; strings, floats and booleans become `None`.
    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(match value {
            Value::Number(n) => n.as_i64(),
            _ => None,
        })
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(match value {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn geo<'de, D: Deserializer<'de>>(d: D) -> Result<GeoSelection, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(GeoSelection::deserialize(&value).unwrap_or_default())
    }

    /// A list is kept even if some entries are not objects; those decode as
    /// an all-empty participant so each field is reported.
    pub fn participants<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<ParticipantInput>>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value.as_array().map(|entries| {
            entries
                .iter()
                .map(|entry| ParticipantInput::deserialize(entry).unwrap_or_default())
                .collect()
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// `{status, mensajes}` envelope returned by both submission endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: Status,
    pub mensajes: Vec<String>,
}

impl SubmitResponse {
    pub fn success(message: &str) -> Self {
        Self {
            status: Status::Success,
            mensajes: vec![message.to_string()],
        }
    }

    pub fn error(mensajes: Vec<String>) -> Self {
        Self {
            status: Status::Error,
            mensajes,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Answer category for one item. The wire and storage form is the code string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Categoria {
    #[serde(rename = "-1")]
    EnContra,
    #[serde(rename = "0")]
    Parcial,
    #[serde(rename = "1")]
    AFavor,
}

impl Categoria {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "-1" => Some(Categoria::EnContra),
            "0" => Some(Categoria::Parcial),
            "1" => Some(Categoria::AFavor),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Categoria::EnContra => "-1",
            Categoria::Parcial => "0",
            Categoria::AFavor => "1",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Acta {
    pub id: i64,
    pub comuna_id: i64,
    pub encuentro_id: Option<i64>,
    pub memoria_historica: Option<String>,
    pub fecha: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewActa {
    pub comuna_id: i64,
    pub encuentro_id: Option<i64>,
    pub memoria_historica: Option<String>,
    pub fecha: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActaResponse {
    pub id: i64,
    pub acta_id: i64,
    pub item_id: i64,
    pub categoria: Categoria,
    pub fundamento: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewResponse {
    pub acta_id: i64,
    pub item_id: i64,
    pub categoria: Categoria,
    pub fundamento: Option<String>,
}

/// One participant of a persisted acta, for the plain-text export.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantExportRow {
    pub rut: String,
    pub nombre: String,
    pub apellido: String,
    pub comuna: String,
    pub fecha: DateTime<Utc>,
}

/// One response of a persisted acta, for the CSV export.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResponseExportRow {
    pub acta_id: i64,
    pub fecha: DateTime<Utc>,
    pub region: String,
    pub provincia: String,
    pub comuna: String,
    pub grupo: String,
    pub item: String,
    pub categoria: String,
    pub fundamento: Option<String>,
}

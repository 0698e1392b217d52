/// A person who has signed an acta. Keyed by normalised RUT; created once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Participant {
    pub id: i64,
    pub rut: String,
    pub nombre: String,
    pub apellido: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    pub rut: String,
    pub nombre: String,
    pub apellido: String,
}

use crate::errors::AppError;
use crate::models::encuentro::ParticipantBounds;
use crate::models::submission::ActaSubmission;
use crate::store::Catalog;
use crate::validation::{validate_geo, validate_items, validate_participants};

/// Run geography, participants and items in that order, stopping at the
/// first stage that produced messages.
pub async fn run<C: Catalog>(
    catalog: &mut C,
    acta: &ActaSubmission,
    bounds: ParticipantBounds,
) -> Result<Vec<String>, AppError> {
    let errors = validate_geo(catalog, &acta.geo).await?;
    if !errors.is_empty() {
        return Ok(errors);
    }

    let errors = validate_participants(catalog, acta.participantes.as_deref(), bounds).await?;
    if !errors.is_empty() {
        return Ok(errors);
    }

    validate_items(catalog, &acta.items_groups).await
}

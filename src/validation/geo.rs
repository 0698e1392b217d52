use crate::errors::AppError;
use crate::models::submission::GeoSelection;
use crate::store::Catalog;

/// Check that the selected comuna exists and belongs to the selected province and region.
///
/// A missing or non-integer id yields exactly one message, checked in the
/// order region, province, comuna. Chain mismatches accumulate.
pub async fn validate_geo<C: Catalog>(catalog: &mut C, geo: &GeoSelection) -> Result<Vec<String>, AppError> {
    let Some(region) = geo.region else {
        return Ok(vec!["Región inválida.".to_string()]);
    };
    let Some(provincia) = geo.provincia else {
        return Ok(vec!["Provincia inválida.".to_string()]);
    };
    let Some(comuna) = geo.comuna else {
        return Ok(vec!["Comuna inválida.".to_string()]);
    };

    let mut errors = Vec::new();
    match catalog.find_comuna(comuna).await? {
        None => errors.push("Comuna inválida.".to_string()),
        Some(found) => {
            if found.provincia_id != provincia {
                errors.push("Provincia no corresponde a la comuna.".to_string());
            }
            if found.region_id != region {
                errors.push("Región no corresponde a la provincia.".to_string());
            }
        }
    }
    Ok(errors)
}

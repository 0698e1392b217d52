use crate::errors::AppError;
use crate::models::acta::Categoria;
use crate::models::submission::ItemGroupInput;
use crate::store::Catalog;

/// Check every submitted item against the catalog and its category code.
///
/// Each item is looked up on its own. An item can produce both the catalog
/// message and the category message.
pub async fn validate_items<C: Catalog>(catalog: &mut C, groups: &[ItemGroupInput]) -> Result<Vec<String>, AppError> {
    let mut errors = Vec::new();

    for group in groups {
        let group_name = group.nombre.as_deref().unwrap_or_default();
        for item in &group.items {
            let item_name = item.nombre.as_deref().unwrap_or_default();

            let stored = match item.pk {
                Some(pk) => catalog.find_item(pk).await?,
                None => None,
            };
            if stored.is_none_or(|s| item.nombre.as_deref() != Some(s.nombre.as_str())) {
                errors.push(format!(
                    "Existen errores de validación en ítem {item_name} del grupo {group_name}."
                ));
            }

            if item.categoria.as_deref().and_then(Categoria::from_code).is_none() {
                errors.push(format!(
                    "No se ha seleccionado la categoría del ítem {item_name}, del grupo {group_name}."
                ));
            }
        }
    }

    Ok(errors)
}

use serde::Serialize;

/// Catalog entry. Reference data: read, never written by the submission flow.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub group_id: i64,
    pub nombre: String,
    pub orden: i32,
}

#[derive(Debug, Clone)]
pub struct ItemGroup {
    pub id: i64,
    pub nombre: String,
    pub orden: i32,
    pub items: Vec<Item>,
}

/// Group as the submission form receives it from `/base/<id>`.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogGroup {
    pub pk: i64,
    pub nombre: String,
    pub orden: i32,
    pub items: Vec<CatalogItem>,
}

/// Item with the answer fields the form fills in.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogItem {
    pub pk: i64,
    pub nombre: String,
    pub categoria: Option<String>,
    pub fundamento: String,
}

impl From<&ItemGroup> for CatalogGroup {
    fn from(group: &ItemGroup) -> Self {
        Self {
            pk: group.id,
            nombre: group.nombre.clone(),
            orden: group.orden,
            items: group
                .items
                .iter()
                .map(|item| CatalogItem {
                    pk: item.id,
                    nombre: item.nombre.clone(),
                    categoria: None,
                    fundamento: String::new(),
                })
                .collect(),
        }
    }
}

//! Reference-data seed: geography, item catalog and encuentro configurations.

use serde::Deserialize;

use super::encuentro::EncuentroConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub regions: Vec<SeedRegion>,
    #[serde(default)]
    pub item_groups: Vec<SeedGroup>,
    #[serde(default)]
    pub encuentros: Vec<EncuentroConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRegion {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub provincias: Vec<SeedProvincia>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedProvincia {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub comunas: Vec<SeedComuna>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedComuna {
    pub id: i64,
    pub nombre: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedGroup {
    pub id: i64,
    pub nombre: String,
    pub orden: i32,
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedItem {
    pub id: i64,
    pub nombre: String,
}

const CATALOG_SEED: &str = include_str!("../../data/seed/catalog.json");

impl CatalogSeed {
    /// The catalog shipped with the binary.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        serde_json::from_str(CATALOG_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_seed_parses() {
        let seed = CatalogSeed::bundled().unwrap();
        assert!(!seed.regions.is_empty());
        assert!(!seed.item_groups.is_empty());
        assert!(seed.encuentros.iter().any(|e| e.id == 1));
    }
}

use serde::Serialize;

/// A comuna with its province and that province's region resolved.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Comuna {
    pub id: i64,
    pub nombre: String,
    pub provincia_id: i64,
    pub region_id: i64,
}

/// One row of the flattened region/province/comuna join.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GeoRow {
    pub region_id: i64,
    pub region: String,
    pub provincia_id: i64,
    pub provincia: String,
    pub comuna_id: i64,
    pub comuna: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionNode {
    pub id: i64,
    pub nombre: String,
    pub provincias: Vec<ProvinciaNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvinciaNode {
    pub id: i64,
    pub nombre: String,
    pub comunas: Vec<ComunaNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComunaNode {
    pub id: i64,
    pub nombre: String,
}

/// Fold rows ordered by (region, provincia, comuna) into a nested tree.
pub fn build_tree(rows: impl IntoIterator<Item = GeoRow>) -> Vec<RegionNode> {
    let mut regions: Vec<RegionNode> = Vec::new();
    for row in rows {
        if regions.last().is_none_or(|r| r.id != row.region_id) {
            regions.push(RegionNode {
                id: row.region_id,
                nombre: row.region.clone(),
                provincias: Vec::new(),
            });
        }
        let Some(region) = regions.last_mut() else { continue };

        if region.provincias.last().is_none_or(|p| p.id != row.provincia_id) {
            region.provincias.push(ProvinciaNode {
                id: row.provincia_id,
                nombre: row.provincia.clone(),
                comunas: Vec::new(),
            });
        }
        if let Some(provincia) = region.provincias.last_mut() {
            provincia.comunas.push(ComunaNode {
                id: row.comuna_id,
                nombre: row.comuna,
            });
        }
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(r: i64, p: i64, c: i64) -> GeoRow {
        GeoRow {
            region_id: r,
            region: format!("R{r}"),
            provincia_id: p,
            provincia: format!("P{p}"),
            comuna_id: c,
            comuna: format!("C{c}"),
        }
    }

    #[test]
    fn build_tree_groups_consecutive_rows() {
        let tree = build_tree(vec![
            row(5, 51, 5101),
            row(5, 51, 5109),
            row(13, 131, 13101),
            row(13, 132, 13201),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].provincias.len(), 1);
        assert_eq!(tree[0].provincias[0].comunas.len(), 2);
        assert_eq!(tree[1].provincias.len(), 2);
        assert_eq!(tree[1].provincias[1].comunas[0].id, 13201);
    }

    #[test]
    fn build_tree_empty() {
        assert!(build_tree(Vec::new()).is_empty());
    }
}

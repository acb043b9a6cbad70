use crate::catalog::schema::Catalog;
use crate::catalog::validate_catalog;
use crate::error::SeutuError;

const STATFIN_JSON: &str = include_str!("../../../../catalog/statfin.json");

/// Available embedded catalogs.
pub const PRESETS: &[&str] = &["statfin"];

pub const DEFAULT_PRESET: &str = "statfin";

/// Load an embedded catalog by name.
pub fn load_preset(name: &str) -> Result<Catalog, SeutuError> {
    match name {
        "statfin" => {
            let catalog: Catalog = serde_json::from_str(STATFIN_JSON)?;
            validate_catalog(&catalog)?;
            Ok(catalog)
        }
        _ => Err(SeutuError::CatalogInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonstat::IndicatorMode;

    #[test]
    fn test_load_statfin_preset() {
        let catalog = load_preset("statfin").unwrap();
        assert_eq!(catalog.name, "statfin");
        assert_eq!(catalog.datasets.len(), 6);
    }

    #[test]
    fn test_statfin_publishes_dashboard_series() {
        let catalog = load_preset("statfin").unwrap();
        let mut names = catalog.published_names();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "births",
                "dependency_ratio",
                "education_applicants",
                "employment_rate",
                "enterprises",
                "population",
                "projected_births",
                "projected_dependency_ratio",
                "projected_net_migration",
                "projected_population",
                "projected_population_change",
                "unemployment_rate",
            ]
        );
    }

    #[test]
    fn test_education_is_summed() {
        let catalog = load_preset("statfin").unwrap();
        let def = catalog.dataset("education_applicants").unwrap();
        assert_eq!(def.decode.mode, IndicatorMode::Sum);
        assert_eq!(def.decode.entity.code, "Oppilaitoksen sijaintialue");
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("xyz").is_err());
    }
}

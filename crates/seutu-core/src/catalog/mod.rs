pub mod builtin;
pub mod schema;

use crate::error::SeutuError;
use crate::jsonstat::IndicatorMode;
use schema::Catalog;
use std::collections::HashSet;
use std::path::Path;

/// Load a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Catalog, SeutuError> {
    let content = std::fs::read_to_string(path).map_err(|e| SeutuError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_catalog(&content, path)
}

/// Parse a catalog from a JSON string.
pub fn parse_catalog(json: &str, source: &Path) -> Result<Catalog, SeutuError> {
    let catalog: Catalog = serde_json::from_str(json).map_err(|e| SeutuError::CatalogLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Parse a catalog from a JSON string (no file path context).
pub fn parse_catalog_str(json: &str) -> Result<Catalog, SeutuError> {
    let catalog: Catalog = serde_json::from_str(json).map_err(SeutuError::Json)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Validate that a catalog is well-formed.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), SeutuError> {
    if catalog.datasets.is_empty() {
        return Err(SeutuError::CatalogInvalid("datasets must not be empty".into()));
    }

    let mut dataset_names = HashSet::new();
    let mut series_names = HashSet::new();

    for def in &catalog.datasets {
        if def.name.is_empty() {
            return Err(SeutuError::CatalogInvalid(
                "dataset name must not be empty".into(),
            ));
        }
        if !dataset_names.insert(def.name.as_str()) {
            return Err(SeutuError::CatalogInvalid(format!(
                "duplicate dataset '{}'",
                def.name
            )));
        }

        if !def.url.starts_with("http://") && !def.url.starts_with("https://") {
            return Err(SeutuError::CatalogInvalid(format!(
                "dataset '{}' has invalid url '{}' (expected http or https)",
                def.name, def.url
            )));
        }

        if def.years.is_empty() {
            return Err(SeutuError::CatalogInvalid(format!(
                "dataset '{}' requests no years",
                def.name
            )));
        }

        let split = def.decode.mode == IndicatorMode::Split;
        if split && def.series.is_empty() {
            return Err(SeutuError::CatalogInvalid(format!(
                "dataset '{}' is split but picks no series",
                def.name
            )));
        }
        if !split && !def.series.is_empty() {
            return Err(SeutuError::CatalogInvalid(format!(
                "dataset '{}' publishes a single series and cannot pick series",
                def.name
            )));
        }

        for pick in &def.series {
            if pick.code.is_none() && pick.rules.iter().all(|r| r.is_empty()) {
                return Err(SeutuError::CatalogInvalid(format!(
                    "series '{}' in dataset '{}' has neither a code nor label rules",
                    pick.name, def.name
                )));
            }
        }

        for name in def.published_names() {
            if name.is_empty() {
                return Err(SeutuError::CatalogInvalid(format!(
                    "dataset '{}' publishes a series with an empty name",
                    def.name
                )));
            }
            if !series_names.insert(name) {
                return Err(SeutuError::CatalogInvalid(format!(
                    "series '{}' is published more than once",
                    name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dataset(name: &str, mode: &str, series: &str) -> String {
        format!(
            r#"{{
                "name": "{name}",
                "url": "https://example.test/{name}.px",
                "years": [2023, 2024],
                "decode": {{
                    "entity": {{ "code": "Alue" }},
                    "year": {{ "code": "Vuosi" }},
                    "indicator": {{ "code": "Tiedot" }},
                    "mode": {mode}
                }},
                "series": [{series}]
            }}"#
        )
    }

    fn catalog(datasets: &[String]) -> String {
        format!(
            r#"{{ "name": "Test", "version": "1.0", "datasets": [{}] }}"#,
            datasets.join(",")
        )
    }

    #[test]
    fn test_parse_valid_catalog() {
        let json = catalog(&[
            dataset("a", r#""split""#, r#"{ "name": "pop", "code": "vaesto" }"#),
            dataset("b", r#""sum""#, ""),
        ]);
        let c = parse_catalog_str(&json).unwrap();
        assert_eq!(c.name, "Test");
        assert_eq!(c.published_names(), vec!["pop", "b"]);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(parse_catalog_str(&catalog(&[])).is_err());
    }

    #[test]
    fn test_duplicate_dataset_rejected() {
        let json = catalog(&[
            dataset("a", r#""sum""#, ""),
            dataset("a", r#""sum""#, ""),
        ]);
        assert!(parse_catalog_str(&json).is_err());
    }

    #[test]
    fn test_series_name_colliding_with_dataset_rejected() {
        let json = catalog(&[
            dataset("a", r#""split""#, r#"{ "name": "b", "code": "x" }"#),
            dataset("b", r#""sum""#, ""),
        ]);
        assert!(parse_catalog_str(&json).is_err());
    }

    #[test]
    fn test_split_without_series_rejected() {
        let json = catalog(&[dataset("a", r#""split""#, "")]);
        assert!(parse_catalog_str(&json).is_err());
    }

    #[test]
    fn test_series_on_single_series_dataset_rejected() {
        let json = catalog(&[dataset(
            "a",
            r#"{ "select": { "keywords": ["x"] } }"#,
            r#"{ "name": "pop", "code": "vaesto" }"#,
        )]);
        assert!(parse_catalog_str(&json).is_err());
    }

    #[test]
    fn test_pick_without_code_or_rules_rejected() {
        let json = catalog(&[dataset("a", r#""split""#, r#"{ "name": "pop", "rules": [{}] }"#)]);
        assert!(parse_catalog_str(&json).is_err());
    }

    #[test]
    fn test_non_http_url_rejected() {
        let json = catalog(&[dataset("a", r#""sum""#, "")]).replace("https://", "ftp://");
        assert!(parse_catalog_str(&json).is_err());
    }

    #[test]
    fn test_empty_years_rejected() {
        let json = catalog(&[dataset("a", r#""sum""#, "")]).replace("[2023, 2024]", "[]");
        assert!(parse_catalog_str(&json).is_err());
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = catalog(&[dataset("a", r#""sum""#, "")]);
        file.write_all(json.as_bytes()).unwrap();

        let c = load_catalog(file.path()).unwrap();
        assert_eq!(c.datasets[0].name, "a");
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, SeutuError::CatalogLoad { .. }));
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}

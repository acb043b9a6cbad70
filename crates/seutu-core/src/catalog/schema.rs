use crate::jsonstat::{DecodePlan, LabelRule};
use crate::query::QueryItem;
use serde::{Deserialize, Serialize};

/// A set of remote datasets that together make up the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub datasets: Vec<DatasetDef>,
}

/// One table on the remote service and how to decode it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDef {
    /// Dataset name; also the published series name for single-series datasets.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Table URL on the PxWeb API.
    pub url: String,
    /// Years requested on the year dimension.
    pub years: Vec<u32>,
    /// Selections on dimensions other than area and year, sent verbatim.
    #[serde(default)]
    pub selections: Vec<QueryItem>,
    pub decode: DecodePlan,
    /// Named series picked out of a split table. Empty for single-series datasets.
    #[serde(default)]
    pub series: Vec<SeriesDef>,
}

/// Picks one indicator of a split table, by code or by label rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Label rules in priority order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<LabelRule>,
}

impl Catalog {
    pub fn dataset(&self, name: &str) -> Option<&DatasetDef> {
        self.datasets.iter().find(|d| d.name == name)
    }

    /// Names of every series a full load publishes.
    pub fn published_names(&self) -> Vec<&str> {
        self.datasets
            .iter()
            .flat_map(|d| d.published_names())
            .collect()
    }
}

impl DatasetDef {
    pub fn published_names(&self) -> Vec<&str> {
        if self.series.is_empty() {
            vec![self.name.as_str()]
        } else {
            self.series.iter().map(|s| s.name.as_str()).collect()
        }
    }
}

use crate::catalog::schema::DatasetDef;
use crate::model::Municipality;
use serde::{Deserialize, Serialize};

pub const RESPONSE_FORMAT: &str = "json-stat2";

/// Body of a PxWeb table query (`POST <table url>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    pub query: Vec<QueryItem>,
    pub response: ResponseFormat,
}

/// Selection on one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryItem {
    pub code: String,
    pub selection: Selection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub filter: Filter,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    Item,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFormat {
    pub format: String,
}

impl Default for ResponseFormat {
    fn default() -> Self {
        ResponseFormat {
            format: RESPONSE_FORMAT.to_string(),
        }
    }
}

impl QueryItem {
    pub fn items<S: ToString>(code: &str, values: impl IntoIterator<Item = S>) -> Self {
        QueryItem {
            code: code.to_string(),
            selection: Selection {
                filter: Filter::Item,
                values: values.into_iter().map(|v| v.to_string()).collect(),
            },
        }
    }

    pub fn all(code: &str) -> Self {
        QueryItem {
            code: code.to_string(),
            selection: Selection {
                filter: Filter::All,
                values: vec!["*".to_string()],
            },
        }
    }
}

impl TableQuery {
    /// Build the request for one dataset: the five municipalities, the
    /// dataset's years, then its extra selections.
    pub fn for_dataset(def: &DatasetDef) -> Self {
        let mut query = vec![
            QueryItem::items(
                &def.decode.entity.code,
                Municipality::ALL.iter().map(|m| m.code()),
            ),
            QueryItem::items(&def.decode.year.code, &def.years),
        ];
        query.extend(def.selections.iter().cloned());

        TableQuery {
            query,
            response: ResponseFormat::default(),
        }
    }
}

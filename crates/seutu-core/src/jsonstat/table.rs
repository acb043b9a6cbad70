use crate::error::SeutuError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// A JSON-stat 2.0 dataset as returned by the PxWeb table service.
///
/// Only the members needed for decoding are kept: `id` and `size` give the
/// dimension order and cardinalities, `dimension` holds the category labels,
/// and `value` the flattened cells (last dimension varies fastest).
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticalTable {
    #[serde(default)]
    pub label: Option<String>,
    pub id: Vec<String>,
    pub size: Vec<usize>,
    pub dimension: HashMap<String, Dimension>,
    pub value: Values,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dimension {
    #[serde(default)]
    pub label: Option<String>,
    pub category: Category,
}

/// Cell values: a dense array with `null` for suppressed cells, or a sparse
/// object keyed by linear index.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Values {
    Dense(Vec<Option<f64>>),
    Sparse(BTreeMap<String, Option<f64>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub code: String,
    pub label: String,
}

/// The ordered categories of one dimension. Position in `entries` is the
/// coordinate used by the value array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawCategory")]
pub struct Category {
    entries: Vec<CategoryEntry>,
}

#[derive(Deserialize)]
struct RawCategory {
    #[serde(default)]
    index: Option<RawIndex>,
    #[serde(default)]
    label: HashMap<String, String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIndex {
    Codes(Vec<String>),
    Positions(HashMap<String, usize>),
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        let codes: Vec<String> = match raw.index {
            Some(RawIndex::Codes(codes)) => codes,
            Some(RawIndex::Positions(positions)) => {
                let mut pairs: Vec<(String, usize)> = positions.into_iter().collect();
                pairs.sort_by_key(|(_, pos)| *pos);
                pairs.into_iter().map(|(code, _)| code).collect()
            }
            // A single-category dimension may omit the index.
            None => {
                let mut codes: Vec<String> = raw.label.keys().cloned().collect();
                codes.sort();
                codes
            }
        };

        let entries = codes
            .into_iter()
            .map(|code| {
                let label = raw.label.get(&code).cloned().unwrap_or_else(|| code.clone());
                CategoryEntry { code, label }
            })
            .collect();

        Category { entries }
    }
}

impl Category {
    pub fn new<C: Into<String>, L: Into<String>>(entries: impl IntoIterator<Item = (C, L)>) -> Self {
        Category {
            entries: entries
                .into_iter()
                .map(|(code, label)| CategoryEntry {
                    code: code.into(),
                    label: label.into(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CategoryEntry> {
        self.entries.get(index)
    }

    pub fn position(&self, code: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.code == code)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + Clone {
        self.entries.iter().map(|e| e.label.as_str())
    }
}

impl StatisticalTable {
    pub fn parse(json: &str) -> Result<Self, SeutuError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of cells implied by `size`.
    pub fn cell_count(&self) -> usize {
        self.size.iter().product()
    }

    /// Position of a dimension in `id`.
    pub fn position(&self, dimension: &str) -> Option<usize> {
        self.id.iter().position(|d| d == dimension)
    }

    /// Categories of the dimension at `position` in `id`.
    pub fn category_at(&self, position: usize) -> Option<&Category> {
        self.id
            .get(position)
            .and_then(|code| self.dimension.get(code))
            .map(|d| &d.category)
    }

    /// Check the structural invariants the decoder relies on.
    pub fn validate(&self) -> Result<(), SeutuError> {
        if self.id.len() != self.size.len() {
            return Err(SeutuError::Format(format!(
                "{} dimension ids but {} sizes",
                self.id.len(),
                self.size.len()
            )));
        }

        for (code, &size) in self.id.iter().zip(&self.size) {
            let dim = self.dimension.get(code).ok_or_else(|| {
                SeutuError::Format(format!("dimension '{}' listed in id but not described", code))
            })?;
            if dim.category.len() != size {
                return Err(SeutuError::Format(format!(
                    "dimension '{}' has {} categories but size {}",
                    code,
                    dim.category.len(),
                    size
                )));
            }
        }

        let expected = self.cell_count();
        match &self.value {
            Values::Dense(values) if values.len() != expected => Err(SeutuError::Format(format!(
                "value array has {} cells, sizes imply {}",
                values.len(),
                expected
            ))),
            Values::Sparse(values) => {
                for key in values.keys() {
                    match key.parse::<usize>() {
                        Ok(i) if i < expected => {}
                        _ => {
                            return Err(SeutuError::Format(format!(
                                "sparse value key '{}' is not an index below {}",
                                key, expected
                            )))
                        }
                    }
                }
                Ok(())
            }
            Values::Dense(_) => Ok(()),
        }
    }

    /// Observed cells as (linear index, value), ascending by index. Null cells
    /// are skipped. Assumes `validate` passed.
    pub fn observed_cells(&self) -> Vec<(usize, f64)> {
        match &self.value {
            Values::Dense(values) => values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|v| (i, v)))
                .collect(),
            Values::Sparse(values) => {
                let mut cells: Vec<(usize, f64)> = values
                    .iter()
                    .filter_map(|(k, v)| Some((k.parse::<usize>().ok()?, (*v)?)))
                    .collect();
                cells.sort_by_key(|(i, _)| *i);
                cells
            }
        }
    }
}

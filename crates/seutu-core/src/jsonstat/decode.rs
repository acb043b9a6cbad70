use crate::error::SeutuError;
use crate::jsonstat::coords::decode_index;
use crate::jsonstat::resolve::{resolve_indicator_index, resolve_total_index};
use crate::jsonstat::table::StatisticalTable;
use crate::model::{Municipality, TimeSeries, YearRecord};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Locates a dimension in a table: by exact code, else by the first
/// dimension whose code contains one of `fragments` (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSelector {
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fragments: Vec<String>,
}

impl DimensionSelector {
    pub fn new(code: &str) -> Self {
        DimensionSelector {
            code: code.to_string(),
            fragments: Vec::new(),
        }
    }

    pub fn or_containing(mut self, fragments: &[&str]) -> Self {
        self.fragments = fragments.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn find(&self, ids: &[String]) -> Option<usize> {
        if let Some(pos) = ids.iter().position(|d| *d == self.code) {
            return Some(pos);
        }
        ids.iter().position(|d| {
            let lower = d.to_lowercase();
            self.fragments
                .iter()
                .any(|f| lower.contains(&f.to_lowercase()))
        })
    }
}

/// What to do with the indicator dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMode {
    /// Keep only the indicator whose label contains one of the keywords.
    Select {
        #[serde(default)]
        keywords: Vec<String>,
    },
    /// One output series per indicator category.
    Split,
    /// Sum all indicator categories into a single series.
    Sum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodePlan {
    pub entity: DimensionSelector,
    pub year: DimensionSelector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator: Option<DimensionSelector>,
    pub mode: IndicatorMode,
}

/// Identifies one decoded series: the indicator category it came from, or
/// the whole table when there is no indicator split. Keys order by the
/// category's position in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub position: usize,
    pub code: String,
    pub label: String,
}

impl SeriesKey {
    pub fn whole() -> Self {
        SeriesKey::default()
    }

    pub fn is_whole(&self) -> bool {
        self.code.is_empty()
    }
}

/// Decode a statistical table into per-year, per-municipality series.
///
/// Every dimension other than entity, year and the indicator is pinned to
/// its total category. Null cells and cells outside the pinned slice are
/// skipped; years without a value for a municipality leave that
/// municipality out of the record. Structural problems produce an empty map.
pub fn decode(table: &StatisticalTable, plan: &DecodePlan) -> BTreeMap<SeriesKey, TimeSeries> {
    match try_decode(table, plan) {
        Ok(series) => series,
        Err(e) => {
            warn!(
                "could not decode table {}: {}",
                table.label.as_deref().unwrap_or("(unlabelled)"),
                e
            );
            BTreeMap::new()
        }
    }
}

/// Decode into a single series: the first one produced, or an empty series.
pub fn decode_single(table: &StatisticalTable, plan: &DecodePlan) -> TimeSeries {
    decode(table, plan).into_values().next().unwrap_or_default()
}

fn try_decode(
    table: &StatisticalTable,
    plan: &DecodePlan,
) -> Result<BTreeMap<SeriesKey, TimeSeries>, SeutuError> {
    table.validate()?;

    let entity_pos = plan.entity.find(&table.id).ok_or_else(|| {
        SeutuError::Format(format!("no entity dimension '{}' in {:?}", plan.entity.code, table.id))
    })?;
    let year_pos = plan.year.find(&table.id).ok_or_else(|| {
        SeutuError::Format(format!("no year dimension '{}' in {:?}", plan.year.code, table.id))
    })?;
    if entity_pos == year_pos {
        return Err(SeutuError::Format(format!(
            "entity and year both resolve to dimension '{}'",
            table.id[entity_pos]
        )));
    }

    let indicator_pos = plan
        .indicator
        .as_ref()
        .and_then(|s| s.find(&table.id))
        .filter(|&p| p != entity_pos && p != year_pos);

    if indicator_pos.is_none() && matches!(plan.mode, IndicatorMode::Split | IndicatorMode::Sum) {
        return Err(SeutuError::Format(format!(
            "no indicator dimension in {:?}",
            table.id
        )));
    }

    // The coordinate every retained cell must have, per pinned dimension.
    let mut pinned: Vec<Option<usize>> = vec![None; table.id.len()];
    for (pos, slot) in pinned.iter_mut().enumerate() {
        if pos == entity_pos || pos == year_pos {
            continue;
        }
        let category = table
            .category_at(pos)
            .ok_or_else(|| SeutuError::Format(format!("dimension {} has no categories", pos)))?;
        if Some(pos) == indicator_pos {
            if let IndicatorMode::Select { ref keywords } = plan.mode {
                *slot = Some(resolve_indicator_index(category, keywords));
            }
        } else {
            *slot = Some(resolve_total_index(category));
        }
    }

    let entity_category = table
        .category_at(entity_pos)
        .ok_or_else(|| SeutuError::Format("entity dimension has no categories".into()))?;
    let entities: Vec<Option<Municipality>> = entity_category
        .entries()
        .iter()
        .map(|e| {
            let m = Municipality::from_code(&e.code).or_else(|| Municipality::from_label(&e.label));
            if m.is_none() {
                debug!("ignoring unknown area {} ({})", e.code, e.label);
            }
            m
        })
        .collect();

    let year_category = table
        .category_at(year_pos)
        .ok_or_else(|| SeutuError::Format("year dimension has no categories".into()))?;
    let years: Vec<Option<u32>> = year_category
        .entries()
        .iter()
        .map(|e| {
            let year = parse_year(&e.code).or_else(|| parse_year(&e.label));
            if year.is_none() {
                warn!("ignoring year category '{}' that is not a year", e.code);
            }
            year
        })
        .collect();

    let keys: Vec<SeriesKey> = match (&plan.mode, indicator_pos) {
        (IndicatorMode::Split, Some(pos)) => table
            .category_at(pos)
            .map(|c| {
                c.entries()
                    .iter()
                    .enumerate()
                    .map(|(position, e)| SeriesKey {
                        position,
                        code: e.code.clone(),
                        label: e.label.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        (IndicatorMode::Select { .. }, Some(pos)) => {
            let chosen = pinned[pos]
                .and_then(|i| table.category_at(pos).and_then(|c| c.get(i)).map(|e| (i, e)))
                .map(|(position, e)| SeriesKey {
                    position,
                    code: e.code.clone(),
                    label: e.label.clone(),
                })
                .unwrap_or_default();
            vec![chosen]
        }
        _ => vec![SeriesKey::whole()],
    };

    let empty_years: BTreeMap<u32, YearRecord> = years
        .iter()
        .flatten()
        .map(|&y| (y, YearRecord::new(y)))
        .collect();
    let mut outputs: Vec<BTreeMap<u32, YearRecord>> = vec![empty_years; keys.len()];

    let split_pos = match plan.mode {
        IndicatorMode::Split => indicator_pos,
        _ => None,
    };
    let summing = plan.mode == IndicatorMode::Sum;

    for (index, value) in table.observed_cells() {
        let coords = decode_index(index, &table.size);

        let in_slice = pinned
            .iter()
            .zip(&coords)
            .all(|(pin, c)| pin.map_or(true, |p| p == *c));
        if !in_slice {
            continue;
        }

        let (Some(municipality), Some(year)) =
            (entities[coords[entity_pos]], years[coords[year_pos]])
        else {
            continue;
        };

        let slot = split_pos.map_or(0, |p| coords[p]);
        if let Some(record) = outputs.get_mut(slot).and_then(|o| o.get_mut(&year)) {
            if summing {
                record.accumulate(municipality, value);
            } else {
                record.set(municipality, value);
            }
        }
    }

    Ok(keys
        .into_iter()
        .zip(outputs)
        .map(|(key, records)| (key, TimeSeries::from_records(records.into_values().collect())))
        .collect())
}

fn parse_year(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|&y| y > 0)
}

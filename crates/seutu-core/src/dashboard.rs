use crate::catalog::schema::{Catalog, DatasetDef, SeriesDef};
use crate::error::SeutuError;
use crate::jsonstat::resolve::resolve_preferred_label;
use crate::jsonstat::{decode, SeriesKey, StatisticalTable};
use crate::model::TimeSeries;
use crate::query::TableQuery;
use crate::source::TableSource;
use futures::future::join_all;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// Series names published by the embedded catalog.
pub mod names {
    pub const POPULATION: &str = "population";
    pub const EMPLOYMENT_RATE: &str = "employment_rate";
    pub const UNEMPLOYMENT_RATE: &str = "unemployment_rate";
    pub const DEPENDENCY_RATIO: &str = "dependency_ratio";
    pub const EDUCATION_APPLICANTS: &str = "education_applicants";
    pub const ENTERPRISES: &str = "enterprises";
    pub const BIRTHS: &str = "births";
    pub const PROJECTED_POPULATION: &str = "projected_population";
    pub const PROJECTED_BIRTHS: &str = "projected_births";
    pub const PROJECTED_NET_MIGRATION: &str = "projected_net_migration";
    pub const PROJECTED_POPULATION_CHANGE: &str = "projected_population_change";
    pub const PROJECTED_DEPENDENCY_RATIO: &str = "projected_dependency_ratio";
}

static EMPTY: TimeSeries = TimeSeries::empty();

/// A dataset that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetFailure {
    pub dataset: String,
    pub reason: String,
}

/// Everything one load published.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardData {
    pub series: BTreeMap<String, TimeSeries>,
    pub failures: Vec<DatasetFailure>,
}

impl DashboardData {
    /// The named series, or an empty one if it was not published.
    pub fn series_or_empty(&self, name: &str) -> &TimeSeries {
        self.series.get(name).unwrap_or(&EMPTY)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetch every dataset of the catalog concurrently and publish its series.
///
/// A failed dataset is recorded in `failures` and publishes nothing; the
/// others are unaffected. No retries.
pub async fn load_dashboard(source: &dyn TableSource, catalog: &Catalog) -> DashboardData {
    let loads = catalog.datasets.iter().map(|def| load_dataset(source, def));
    let results = join_all(loads).await;

    let mut data = DashboardData::default();
    for (def, result) in catalog.datasets.iter().zip(results) {
        match result {
            Ok(published) => data.series.extend(published),
            Err(e) => {
                warn!("dataset {} failed: {}", def.name, e);
                data.failures.push(DatasetFailure {
                    dataset: def.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "loaded {} series from {} ({} of {} datasets failed)",
        data.series.len(),
        source.source_name(),
        data.failures.len(),
        catalog.datasets.len()
    );
    data
}

/// Fetch and publish one dataset.
pub async fn load_dataset(
    source: &dyn TableSource,
    def: &DatasetDef,
) -> Result<BTreeMap<String, TimeSeries>, SeutuError> {
    let query = TableQuery::for_dataset(def);
    let table = source.fetch_table(&def.url, &query).await?;
    Ok(publish(def, &table))
}

/// Decode a fetched table and name its series.
///
/// Single-series datasets publish under the dataset name. Split datasets
/// publish one series per pick; a pick that matches nothing publishes an
/// empty series.
pub fn publish(def: &DatasetDef, table: &StatisticalTable) -> BTreeMap<String, TimeSeries> {
    let decoded = decode(table, &def.decode);

    if def.series.is_empty() {
        let series = decoded.into_values().next().unwrap_or_default();
        return BTreeMap::from([(def.name.clone(), series)]);
    }

    def.series
        .iter()
        .map(|pick| {
            let series = match pick_key(&decoded, pick) {
                Some(key) => {
                    debug!("{}: '{}' -> {} ({})", def.name, pick.name, key.code, key.label);
                    decoded[key].clone()
                }
                None => {
                    if !decoded.is_empty() {
                        warn!("{}: no indicator matches series '{}'", def.name, pick.name);
                    }
                    TimeSeries::default()
                }
            };
            (pick.name.clone(), series)
        })
        .collect()
}

fn pick_key<'a>(decoded: &'a BTreeMap<SeriesKey, TimeSeries>, pick: &SeriesDef) -> Option<&'a SeriesKey> {
    if let Some(code) = &pick.code {
        if let Some(key) = decoded.keys().find(|k| k.code == *code) {
            return Some(key);
        }
    }

    let label = resolve_preferred_label(decoded.keys().map(|k| k.label.as_str()), &pick.rules)?;
    decoded.keys().find(|k| k.label == label)
}

/// Identifies one load; see [`DashboardState::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Published dashboard data plus a guard against stale loads.
///
/// Only the most recently begun load may publish. A load that completes
/// after a newer one has begun is discarded.
#[derive(Debug, Default)]
pub struct DashboardState {
    data: DashboardData,
    generation: u64,
    applied: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Publish `data` if `ticket` belongs to the latest load. Returns whether
    /// it was applied.
    pub fn complete(&mut self, ticket: LoadTicket, data: DashboardData) -> bool {
        if ticket.0 != self.generation {
            debug!(
                "discarding stale load {} (latest is {})",
                ticket.0, self.generation
            );
            return false;
        }
        self.data = data;
        self.applied = ticket.0;
        true
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    /// True while the latest begun load has not completed.
    pub fn is_loading(&self) -> bool {
        self.applied != self.generation
    }
}

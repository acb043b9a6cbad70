pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod jsonstat;
pub mod model;
pub mod query;
pub mod series;
pub mod source;
pub mod summary;
pub mod views;

use error::SeutuError;
use jsonstat::{DecodePlan, SeriesKey, StatisticalTable};
use model::TimeSeries;
use std::collections::BTreeMap;

pub use dashboard::{load_dashboard, DashboardData, DashboardState};
pub use source::{HttpTableSource, TableSource};

/// Decode a JSON-stat document held in memory.
///
/// Only an unparseable document is an error. A document that parses but
/// does not fit `plan` yields an empty map, the same as during a dashboard
/// load.
pub fn decode_document(json: &str, plan: &DecodePlan) -> Result<BTreeMap<SeriesKey, TimeSeries>, SeutuError> {
    let table = StatisticalTable::parse(json.trim_start_matches('\u{feff}'))?;
    Ok(jsonstat::decode(&table, plan))
}

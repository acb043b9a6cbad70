//! Decoding of JSON-stat 2.0 tables into per-municipality time series.

pub mod coords;
pub mod decode;
pub mod resolve;
pub mod table;

pub use decode::{decode, decode_single, DecodePlan, DimensionSelector, IndicatorMode, SeriesKey};
pub use resolve::LabelRule;
pub use table::{Category, StatisticalTable};

use serde::Serialize;
use seutu_core::error::SeutuError;
use seutu_core::jsonstat::{DecodePlan, DimensionSelector, IndicatorMode};
use seutu_core::model::TimeSeries;
use std::path::PathBuf;

use crate::output;

#[derive(Serialize)]
struct DecodedSeries<'a> {
    code: &'a str,
    label: &'a str,
    series: &'a TimeSeries,
}

pub fn plan(
    entity: String,
    year: String,
    indicator: Option<String>,
    keywords: Vec<String>,
    split: bool,
    sum: bool,
) -> DecodePlan {
    let mode = if split {
        IndicatorMode::Split
    } else if sum {
        IndicatorMode::Sum
    } else {
        IndicatorMode::Select { keywords }
    };

    DecodePlan {
        entity: DimensionSelector::new(&entity).or_containing(&["alue", "kunta"]),
        year: DimensionSelector::new(&year).or_containing(&["vuosi"]),
        indicator: indicator.map(|code| DimensionSelector::new(&code)),
        mode,
    }
}

pub fn run(input_file: PathBuf, plan: &DecodePlan, output_format: &str) -> Result<(), SeutuError> {
    let json = std::fs::read_to_string(&input_file)?;
    let decoded = seutu_core::decode_document(&json, plan)?;

    if decoded.is_empty() {
        eprintln!(
            "No series decoded from {} (run with -v for details)",
            input_file.display()
        );
        return Ok(());
    }

    match output_format {
        "json" => {
            let rows: Vec<DecodedSeries> = decoded
                .iter()
                .map(|(key, series)| DecodedSeries {
                    code: &key.code,
                    label: &key.label,
                    series,
                })
                .collect();
            output::json::print(&rows)?;
        }
        _ => {
            for (key, series) in &decoded {
                let name = if key.is_whole() {
                    input_file.display().to_string()
                } else {
                    format!("{} ({})", key.label, key.code)
                };
                println!("{}", output::table::format_series(&name, series));
            }
        }
    }

    Ok(())
}

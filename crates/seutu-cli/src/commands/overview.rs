use seutu_core::error::SeutuError;
use seutu_core::views::{RegionalOverview, ViewState};

use crate::commands::{municipalities, LoadArgs};
use crate::output;

pub async fn run(
    load: &LoadArgs,
    year: Option<u32>,
    names: &[String],
    output_format: &str,
) -> Result<(), SeutuError> {
    let selected = municipalities(names)?;
    let data = load.load().await?;

    let mut state = ViewState::for_data(&data);
    state.selected = selected;
    if let Some(year) = year {
        state.year = year;
    }

    let Some(overview) = RegionalOverview::build(&data, &state) else {
        eprintln!("No population data available");
        return Ok(());
    };

    match output_format {
        "json" => output::json::print(&overview)?,
        _ => print!("{}", output::table::format_overview(&overview)),
    }
    Ok(())
}

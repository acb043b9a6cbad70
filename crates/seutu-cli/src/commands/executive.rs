use seutu_core::error::SeutuError;
use seutu_core::views::{ExecutiveView, ViewState};

use crate::commands::{municipality, LoadArgs};
use crate::output;

pub async fn run(
    load: &LoadArgs,
    name: &str,
    year: Option<u32>,
    horizon: usize,
    output_format: &str,
) -> Result<(), SeutuError> {
    let focus = municipality(name)?;
    let data = load.load().await?;

    let mut state = ViewState::for_data(&data);
    state.focus = focus;
    if let Some(year) = year {
        state.year = year;
    }

    let view = ExecutiveView::build(&data, &state, horizon);
    match output_format {
        "json" => output::json::print(&view)?,
        _ => print!("{}", output::table::format_executive(&view)),
    }
    Ok(())
}

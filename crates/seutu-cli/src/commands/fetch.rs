use seutu_core::error::SeutuError;
use std::path::PathBuf;

use crate::commands::LoadArgs;
use crate::output;

pub async fn run(load: &LoadArgs, output_format: &str, output_file: Option<PathBuf>) -> Result<(), SeutuError> {
    let data = load.load().await?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            output::json::write(&data, &path)?;
            eprintln!(
                "Loaded {} series ({} dataset(s) unavailable), written to {}",
                data.series.len(),
                data.failures.len(),
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&data)?,
            _ => print!("{}", output::table::format_dashboard(&data)),
        },
    }

    Ok(())
}

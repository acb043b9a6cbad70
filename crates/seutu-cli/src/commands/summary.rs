use seutu_core::error::SeutuError;
use seutu_core::summary::{summarize_or_fallback, SummaryRequest, UnavailableSummarizer};

use crate::commands::{municipalities, LoadArgs};

pub async fn run(load: &LoadArgs, names: &[String]) -> Result<(), SeutuError> {
    let selected = municipalities(names)?;
    let data = load.load().await?;

    if let Some(request) = SummaryRequest::build(&data, &selected) {
        println!("{}\n", serde_json::to_string_pretty(&request)?);
    }

    let text = summarize_or_fallback(Some(&UnavailableSummarizer), &data, &selected).await;
    println!("{text}");
    Ok(())
}

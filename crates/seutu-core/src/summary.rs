use crate::dashboard::{names, DashboardData};
use crate::error::SeutuError;
use crate::model::Municipality;
use async_trait::async_trait;
use log::warn;
use serde::Serialize;

pub const NO_SELECTION: &str = "Select at least one municipality to see the analysis.";
pub const UNAVAILABLE: &str = "Analysis is not available: no text generator is configured.";
pub const GENERATION_FAILED: &str = "The analysis could not be generated.";
pub const REQUEST_FAILED: &str = "The analysis could not be fetched. Try again later.";

/// Per-municipality figures handed to the text generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MunicipalitySummary {
    pub municipality: Municipality,
    /// Latest population minus the first year's, missing values as zero.
    pub population_change: f64,
    pub latest_employment_rate: Option<f64>,
    pub latest_enterprises: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRequest {
    pub first_year: u32,
    pub last_year: u32,
    pub municipalities: Vec<MunicipalitySummary>,
}

impl SummaryRequest {
    /// `None` when nothing is selected or no population was published.
    pub fn build(data: &DashboardData, selected: &[Municipality]) -> Option<Self> {
        let population = data.series_or_empty(names::POPULATION);
        let employment = data.series_or_empty(names::EMPLOYMENT_RATE);
        let enterprises = data.series_or_empty(names::ENTERPRISES);

        if selected.is_empty() {
            return None;
        }
        let first = population.records().first()?;
        let last_year = population.last_year()?;

        let municipalities = selected
            .iter()
            .map(|&m| {
                let latest = population.last_valid(m).map_or(0.0, |(_, v)| v);
                let initial = first.get(m).unwrap_or(0.0);
                MunicipalitySummary {
                    municipality: m,
                    population_change: latest - initial,
                    latest_employment_rate: employment.last_valid(m).map(|(_, v)| v),
                    latest_enterprises: enterprises.last_valid(m).map(|(_, v)| v),
                }
            })
            .collect();

        Some(SummaryRequest {
            first_year: first.year,
            last_year,
            municipalities,
        })
    }

    pub fn to_json(&self) -> Result<String, SeutuError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Turns a numeric summary into a short narrative.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// `Ok(None)` or an empty string means nothing usable came back.
    async fn summarize(&self, request: &SummaryRequest) -> Result<Option<String>, SeutuError>;

    /// `false` when there is no generator behind this summarizer.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Stand-in used when no generator is configured.
pub struct UnavailableSummarizer;

#[async_trait]
impl Summarizer for UnavailableSummarizer {
    async fn summarize(&self, _request: &SummaryRequest) -> Result<Option<String>, SeutuError> {
        Ok(None)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// The generated text, or a fixed message explaining why there is none.
pub async fn summarize_or_fallback(
    summarizer: Option<&dyn Summarizer>,
    data: &DashboardData,
    selected: &[Municipality],
) -> String {
    let Some(summarizer) = summarizer.filter(|s| s.is_configured()) else {
        return UNAVAILABLE.to_string();
    };
    let Some(request) = SummaryRequest::build(data, selected) else {
        return NO_SELECTION.to_string();
    };

    match summarizer.summarize(&request).await {
        Ok(Some(text)) if !text.trim().is_empty() => text,
        Ok(_) => GENERATION_FAILED.to_string(),
        Err(e) => {
            warn!("summary request failed: {}", e);
            REQUEST_FAILED.to_string()
        }
    }
}

//! Presentation data for the two dashboard views.
//!
//! Everything here is a pure function of the published [`DashboardData`] and
//! an explicit [`ViewState`]. Values are looked up at the selected year, or
//! the latest earlier year with data, but never before [`FIRST_YEAR`].

use crate::dashboard::{names, DashboardData};
use crate::model::{Municipality, TimeSeries, YearRecord};
use crate::series::{
    forecast_chart, merge_historical_and_projected, ChartPoint, DEFAULT_HORIZON,
    DEFAULT_LAST_HISTORICAL_YEAR,
};
use serde::Serialize;

/// Earliest year the views look back to.
pub const FIRST_YEAR: u32 = 2020;

/// Year the executive view reports projections for.
pub const PROJECTION_YEAR: u32 = 2030;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub selected: Vec<Municipality>,
    pub year: u32,
    pub focus: Municipality,
}

impl ViewState {
    /// All municipalities selected, the latest population year, Kaustinen in focus.
    pub fn for_data(data: &DashboardData) -> Self {
        ViewState {
            selected: Municipality::ALL.to_vec(),
            year: data
                .series_or_empty(names::POPULATION)
                .last_year()
                .unwrap_or(DEFAULT_LAST_HISTORICAL_YEAR),
            focus: Municipality::Kaustinen,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn latest(series: &TimeSeries, municipality: Municipality, year: u32) -> Option<f64> {
    series
        .latest_at_or_before(municipality, year, FIRST_YEAR)
        .map(|(_, v)| v)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

// ---------------------------------------------------------------------------
// Regional overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub municipality: Municipality,
    /// Missing population counts as zero.
    pub population: f64,
    pub employment_rate: Option<f64>,
    pub unemployment_rate: Option<f64>,
    pub education_applicants: Option<f64>,
    pub enterprises: Option<f64>,
    pub births: Option<f64>,
}

/// Column totals. Counts are sums with missing values as zero; the two rates
/// are plain means over the municipalities that have a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewTotals {
    pub population: f64,
    pub employment_rate: Option<f64>,
    pub unemployment_rate: Option<f64>,
    pub education_applicants: f64,
    pub enterprises: f64,
    pub births: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub year: u32,
    pub population: f64,
    pub first_year: u32,
    pub first_population: f64,
    /// Change since `first_year`, in percent, one decimal.
    pub percent_change: f64,
    pub largest: Municipality,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalOverview {
    pub year: u32,
    /// Sorted by population, largest first.
    pub rows: Vec<OverviewRow>,
    pub totals: OverviewTotals,
    pub headline: Headline,
}

impl RegionalOverview {
    /// `None` when nothing is selected or no population was published.
    pub fn build(data: &DashboardData, state: &ViewState) -> Option<Self> {
        let population = data.series_or_empty(names::POPULATION);
        let &first_selected = state.selected.first()?;
        let first = population.records().first()?;

        let employment = data.series_or_empty(names::EMPLOYMENT_RATE);
        let unemployment = data.series_or_empty(names::UNEMPLOYMENT_RATE);
        let education = data.series_or_empty(names::EDUCATION_APPLICANTS);
        let enterprises = data.series_or_empty(names::ENTERPRISES);
        let births = data.series_or_empty(names::BIRTHS);

        let year = state.year;
        let mut rows: Vec<OverviewRow> = state
            .selected
            .iter()
            .map(|&m| OverviewRow {
                municipality: m,
                population: latest(population, m, year).unwrap_or(0.0),
                employment_rate: latest(employment, m, year),
                unemployment_rate: latest(unemployment, m, year),
                education_applicants: latest(education, m, year),
                enterprises: latest(enterprises, m, year),
                births: latest(births, m, year),
            })
            .collect();

        let sum = |f: fn(&OverviewRow) -> Option<f64>| rows.iter().filter_map(f).sum::<f64>();
        let totals = OverviewTotals {
            population: rows.iter().map(|r| r.population).sum(),
            employment_rate: mean(rows.iter().filter_map(|r| r.employment_rate)),
            unemployment_rate: mean(rows.iter().filter_map(|r| r.unemployment_rate)),
            education_applicants: sum(|r| r.education_applicants),
            enterprises: sum(|r| r.enterprises),
            births: sum(|r| r.births),
        };

        // The headline compares exact years: the selected one (or the first
        // published year if it is absent) against the first published year.
        let current = population.record(year).unwrap_or(first);
        let value = |record: &YearRecord, m| record.get(m).unwrap_or(0.0);
        let current_total: f64 = state.selected.iter().map(|&m| value(current, m)).sum();
        let first_total: f64 = state.selected.iter().map(|&m| value(first, m)).sum();
        let percent_change = if first_total > 0.0 {
            round1((current_total - first_total) / first_total * 100.0)
        } else {
            0.0
        };
        let largest = state
            .selected
            .iter()
            .copied()
            .fold(first_selected, |best, m| {
                if value(current, m) > value(current, best) {
                    m
                } else {
                    best
                }
            });

        rows.sort_by(|a, b| b.population.total_cmp(&a.population));

        Some(RegionalOverview {
            year,
            rows,
            totals,
            headline: Headline {
                year: current.year,
                population: current_total,
                first_year: first.year,
                first_population: first_total,
                percent_change,
                largest,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Executive view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendUnit {
    Percent,
    PercentagePoints,
}

/// Change from the previous available year to the current one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub value: f64,
    pub unit: TrendUnit,
    pub year: u32,
    pub previous_year: u32,
}

impl Trend {
    /// "vs 2023 (%)", or "2023 vs 2022 (pp)" when the current value is not
    /// from the selected year.
    pub fn label(&self, selected_year: u32) -> String {
        let unit = match self.unit {
            TrendUnit::Percent => "(%)",
            TrendUnit::PercentagePoints => "(pp)",
        };
        if self.year == selected_year {
            format!("vs {} {}", self.previous_year, unit)
        } else {
            format!("{} vs {} {}", self.year, self.previous_year, unit)
        }
    }
}

/// Current value of one indicator for the focus municipality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub value: Option<f64>,
    /// Year the value comes from.
    pub year: Option<u32>,
    pub trend: Option<Trend>,
}

impl Indicator {
    fn build(series: &TimeSeries, municipality: Municipality, year: u32, unit: TrendUnit) -> Self {
        let Some((cur_year, cur)) = series.latest_at_or_before(municipality, year, FIRST_YEAR) else {
            return Indicator {
                value: None,
                year: None,
                trend: None,
            };
        };

        let trend = cur_year
            .checked_sub(1)
            .and_then(|y| series.latest_at_or_before(municipality, y, FIRST_YEAR))
            .filter(|&(_, prev)| prev != 0.0 && cur != 0.0)
            .map(|(prev_year, prev)| Trend {
                value: match unit {
                    TrendUnit::Percent => round1((cur - prev) / prev * 100.0),
                    TrendUnit::PercentagePoints => round1(cur - prev),
                },
                unit,
                year: cur_year,
                previous_year: prev_year,
            });

        Indicator {
            value: Some(cur),
            year: Some(cur_year),
            trend,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatePoint {
    pub year: u32,
    pub employment_rate: Option<f64>,
    pub unemployment_rate: Option<f64>,
}

/// Population projection for the focus municipality in [`PROJECTION_YEAR`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub year: u32,
    pub population: Option<f64>,
    pub births: Option<f64>,
    pub net_migration: Option<f64>,
    pub population_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveView {
    pub municipality: Municipality,
    pub year: u32,
    pub population: Indicator,
    pub employment_rate: Indicator,
    pub unemployment_rate: Indicator,
    pub enterprises: Indicator,
    /// Observed enterprise counts with a linear forecast.
    pub enterprise_chart: Vec<ChartPoint>,
    /// Employment and unemployment over the historical years.
    pub rates: Vec<RatePoint>,
    pub projection: Projection,
}

impl ExecutiveView {
    pub fn build(data: &DashboardData, state: &ViewState, horizon: usize) -> Self {
        let m = state.focus;
        let year = state.year;
        let population = data.series_or_empty(names::POPULATION);
        let employment = data.series_or_empty(names::EMPLOYMENT_RATE);
        let unemployment = data.series_or_empty(names::UNEMPLOYMENT_RATE);
        let enterprises = data.series_or_empty(names::ENTERPRISES);

        let rates = population
            .years()
            .filter(|&y| y <= DEFAULT_LAST_HISTORICAL_YEAR)
            .map(|y| RatePoint {
                year: y,
                employment_rate: employment.value_at(y, m),
                unemployment_rate: unemployment.value_at(y, m),
            })
            .collect();

        let projected = |name| data.series_or_empty(name).value_at(PROJECTION_YEAR, m);

        ExecutiveView {
            municipality: m,
            year,
            population: Indicator::build(population, m, year, TrendUnit::Percent),
            employment_rate: Indicator::build(employment, m, year, TrendUnit::PercentagePoints),
            unemployment_rate: Indicator::build(unemployment, m, year, TrendUnit::PercentagePoints),
            enterprises: Indicator::build(enterprises, m, year, TrendUnit::Percent),
            enterprise_chart: forecast_chart(enterprises, m, horizon),
            rates,
            projection: Projection {
                year: PROJECTION_YEAR,
                population: projected(names::PROJECTED_POPULATION),
                births: projected(names::PROJECTED_BIRTHS),
                net_migration: projected(names::PROJECTED_NET_MIGRATION),
                population_change: projected(names::PROJECTED_POPULATION_CHANGE),
            },
        }
    }

    pub fn with_default_horizon(data: &DashboardData, state: &ViewState) -> Self {
        Self::build(data, state, DEFAULT_HORIZON)
    }
}

/// Historical population followed by the projection years after it.
pub fn combined_population(data: &DashboardData) -> TimeSeries {
    merge_historical_and_projected(
        data.series_or_empty(names::POPULATION),
        data.series_or_empty(names::PROJECTED_POPULATION),
    )
}

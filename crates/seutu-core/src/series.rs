use crate::model::{ForecastPoint, Municipality, TimeSeries};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Assumed last historical year when there is no history to look at.
pub const DEFAULT_LAST_HISTORICAL_YEAR: u32 = 2024;

/// Default number of years a linear forecast extends.
pub const DEFAULT_HORIZON: usize = 5;

/// Longest forecast produced; larger horizons are capped.
pub const MAX_HORIZON: usize = 50;

/// Append projected years after the last historical year.
///
/// Projections for years the history already covers are dropped, so a
/// historical value is never replaced by a projected one.
pub fn merge_historical_and_projected(historical: &TimeSeries, projected: &TimeSeries) -> TimeSeries {
    let max_hist_year = historical.last_year().unwrap_or(DEFAULT_LAST_HISTORICAL_YEAR);

    let records = historical
        .records()
        .iter()
        .chain(projected.records().iter().filter(|r| r.year > max_hist_year))
        .cloned()
        .collect();

    TimeSeries::from_records(records)
}

/// Ordinary least squares fit over one municipality's observations,
/// extrapolated `horizon` years past its last observed year.
///
/// Values are rounded to whole numbers and never negative. Fewer than two
/// observations, or a degenerate fit, give an empty forecast. The horizon is
/// capped at [`MAX_HORIZON`].
pub fn linear_forecast(
    series: &TimeSeries,
    municipality: Municipality,
    horizon: usize,
) -> Vec<ForecastPoint> {
    let points = series.points(municipality);
    let Some(&(last_year, _)) = points.last() else {
        return Vec::new();
    };
    if points.len() < 2 {
        return Vec::new();
    }

    let n = points.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_xx) =
        points
            .iter()
            .fold((0.0, 0.0, 0.0, 0.0), |(sx, sy, sxy, sxx), &(year, y)| {
                let x = f64::from(year);
                (sx + x, sy + y, sxy + x * y, sxx + x * x)
            });

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Vec::new();
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    let horizon = u32::try_from(horizon.min(MAX_HORIZON)).unwrap_or(0);
    (1..=horizon)
        .map_while(|i| last_year.checked_add(i))
        .map(|year| {
            let predicted = (slope * f64::from(year) + intercept).round();
            ForecastPoint {
                year,
                value: predicted.max(0.0),
            }
        })
        .collect()
}

/// One year of a chart with separate observed and forecast lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub year: u32,
    pub observed: Option<f64>,
    pub forecast: Option<f64>,
}

/// Observed values followed by a linear forecast, for a connected chart.
///
/// The last observed year carries its value in both channels so the two
/// lines meet; later years only appear in the forecast channel. Years are
/// unique and ascending: a trailing year with no observation takes the
/// forecast for that year.
pub fn forecast_chart(
    series: &TimeSeries,
    municipality: Municipality,
    horizon: usize,
) -> Vec<ChartPoint> {
    let forecast = linear_forecast(series, municipality, horizon);
    let bridge = series.last_valid(municipality);

    let mut chart: BTreeMap<u32, ChartPoint> = series
        .records()
        .iter()
        .map(|r| {
            let bridged = match bridge {
                Some((year, value)) if year == r.year && !forecast.is_empty() => Some(value),
                _ => None,
            };
            let point = ChartPoint {
                year: r.year,
                observed: r.get(municipality),
                forecast: bridged,
            };
            (r.year, point)
        })
        .collect();

    for p in forecast {
        chart
            .entry(p.year)
            .or_insert(ChartPoint {
                year: p.year,
                observed: None,
                forecast: None,
            })
            .forecast = Some(p.value);
    }

    chart.into_values().collect()
}

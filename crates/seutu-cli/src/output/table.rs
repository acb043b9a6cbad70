use seutu_core::dashboard::DashboardData;
use seutu_core::model::{Municipality, TimeSeries};
use seutu_core::series::ChartPoint;
use seutu_core::views::{ExecutiveView, Indicator, RegionalOverview};
use std::fmt::Write;

/// Whole numbers without decimals, everything else with one.
pub fn value(v: Option<f64>) -> String {
    match v {
        None => "-".to_string(),
        Some(v) if v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) => format!("{:.1}", v),
    }
}

fn signed(v: Option<f64>) -> String {
    match v {
        Some(v) if v > 0.0 => format!("+{}", value(Some(v))),
        other => value(other),
    }
}

/// Years down, municipalities across.
pub fn format_series(name: &str, series: &TimeSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===\n", name);

    if series.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return out;
    }

    let _ = write!(out, "  {:<6}", "Year");
    for m in Municipality::ALL {
        let _ = write!(out, "  {:>10}", m.name());
    }
    let _ = writeln!(out);

    for record in series.records() {
        let _ = write!(out, "  {:<6}", record.year);
        for m in Municipality::ALL {
            let _ = write!(out, "  {:>10}", value(record.get(m)));
        }
        let _ = writeln!(out);
    }
    out
}

pub fn format_dashboard(data: &DashboardData) -> String {
    let mut out = String::new();
    for (name, series) in &data.series {
        out.push_str(&format_series(name, series));
        out.push('\n');
    }

    if !data.failures.is_empty() {
        let _ = writeln!(out, "Unavailable datasets:");
        for f in &data.failures {
            let _ = writeln!(out, "  {}: {}", f.dataset, f.reason);
        }
    }
    out
}

pub fn format_overview(overview: &RegionalOverview) -> String {
    let mut out = String::new();
    let h = &overview.headline;
    let _ = writeln!(out, "=== Regional overview {} ===\n", overview.year);
    let _ = writeln!(
        out,
        "  Population {}: {} ({:+.1} % vs {}), largest: {}\n",
        h.year,
        value(Some(h.population)),
        h.percent_change,
        h.first_year,
        h.largest
    );

    let header = [
        "Population",
        "Employed %",
        "Unempl. %",
        "Education",
        "Enterprises",
        "Births",
    ];
    let _ = write!(out, "  {:<12}", "Municipality");
    for col in header {
        let _ = write!(out, "  {:>11}", col);
    }
    let _ = writeln!(out);

    for row in &overview.rows {
        let cells = [
            Some(row.population),
            row.employment_rate,
            row.unemployment_rate,
            row.education_applicants,
            row.enterprises,
            row.births,
        ];
        let _ = write!(out, "  {:<12}", row.municipality.name());
        for cell in cells {
            let _ = write!(out, "  {:>11}", value(cell));
        }
        let _ = writeln!(out);
    }

    let t = &overview.totals;
    let totals = [
        value(Some(t.population)),
        value(t.employment_rate.map(|v| (v * 10.0).round() / 10.0)),
        value(t.unemployment_rate.map(|v| (v * 10.0).round() / 10.0)),
        value(Some(t.education_applicants)),
        value(Some(t.enterprises)),
        value(Some(t.births)),
    ];
    let _ = write!(out, "  {:<12}", "Total");
    for cell in totals {
        let _ = write!(out, "  {:>11}", cell);
    }
    let _ = writeln!(out);
    out
}

fn indicator_line(out: &mut String, name: &str, indicator: &Indicator, selected_year: u32) {
    let year = indicator
        .year
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    let trend = indicator
        .trend
        .as_ref()
        .map(|t| format!("  {:+.1} {}", t.value, t.label(selected_year)))
        .unwrap_or_default();
    let _ = writeln!(out, "  {:<14} {:>8}{}{}", name, value(indicator.value), year, trend);
}

fn chart_line(out: &mut String, point: &ChartPoint) {
    let _ = writeln!(
        out,
        "  {:<6}  {:>10}  {:>10}",
        point.year,
        value(point.observed),
        value(point.forecast)
    );
}

pub fn format_executive(view: &ExecutiveView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} {} ===\n", view.municipality, view.year);

    indicator_line(&mut out, "Population", &view.population, view.year);
    indicator_line(&mut out, "Employment %", &view.employment_rate, view.year);
    indicator_line(&mut out, "Unemployment %", &view.unemployment_rate, view.year);
    indicator_line(&mut out, "Enterprises", &view.enterprises, view.year);

    let p = &view.projection;
    let _ = writeln!(out, "\n  Projection {}:", p.year);
    let _ = writeln!(out, "    Population         {:>8}", value(p.population));
    let _ = writeln!(out, "    Population change  {:>8}", signed(p.population_change));
    let _ = writeln!(out, "    Net migration      {:>8}", signed(p.net_migration));
    let _ = writeln!(out, "    Births             {:>8}", value(p.births));

    let _ = writeln!(out, "\n  Enterprises:");
    let _ = writeln!(out, "  {:<6}  {:>10}  {:>10}", "Year", "Observed", "Forecast");
    for point in &view.enterprise_chart {
        chart_line(&mut out, point);
    }

    let _ = writeln!(out, "\n  Employment / unemployment:");
    for r in &view.rates {
        let _ = writeln!(
            out,
            "  {:<6}  {:>10}  {:>10}",
            r.year,
            value(r.employment_rate),
            value(r.unemployment_rate)
        );
    }
    out
}

//! Integration tests for load_dashboard() end-to-end.
//!
//! Uses a MockSource that answers each dataset URL with a canned JSON-stat
//! document, so these tests run without network access.

use async_trait::async_trait;
use seutu_core::catalog::builtin::load_preset;
use seutu_core::catalog::schema::Catalog;
use seutu_core::dashboard::names;
use seutu_core::error::SeutuError;
use seutu_core::jsonstat::coords::decode_index;
use seutu_core::jsonstat::{DecodePlan, DimensionSelector, IndicatorMode, StatisticalTable};
use seutu_core::model::Municipality::{self, *};
use seutu_core::query::TableQuery;
use seutu_core::views::{ExecutiveView, RegionalOverview, ViewState};
use seutu_core::{decode_document, load_dashboard, DashboardState, TableSource};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;

enum Reply {
    Table(String),
    Status(u16),
}

struct MockSource {
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<(String, TableQuery)>>,
}

impl MockSource {
    fn new() -> Self {
        MockSource {
            replies: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn reply(mut self, catalog: &Catalog, dataset: &str, reply: Reply) -> Self {
        let url = catalog.dataset(dataset).unwrap().url.clone();
        self.replies.insert(url, reply);
        self
    }

    fn query_for(&self, url: &str) -> TableQuery {
        let requests = self.requests.lock().unwrap();
        requests.iter().find(|(u, _)| u == url).unwrap().1.clone()
    }
}

#[async_trait]
impl TableSource for MockSource {
    async fn fetch_table(&self, url: &str, query: &TableQuery) -> Result<StatisticalTable, SeutuError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), query.clone()));
        match self.replies.get(url) {
            Some(Reply::Table(json)) => StatisticalTable::parse(json),
            Some(Reply::Status(status)) => Err(SeutuError::HttpStatus {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(SeutuError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    fn source_name(&self) -> &str {
        "mock"
    }
}

type Dim<'a> = (&'a str, &'a [(&'a str, &'a str)]);

/// Build a JSON-stat document; `cell` gives the value at each coordinate.
fn table(dims: &[Dim], cell: impl Fn(&[usize]) -> Option<f64>) -> String {
    let id: Vec<&str> = dims.iter().map(|(code, _)| *code).collect();
    let size: Vec<usize> = dims.iter().map(|(_, cats)| cats.len()).collect();

    let mut dimension = Map::new();
    for (code, cats) in dims {
        let index: Map<String, Value> = cats
            .iter()
            .enumerate()
            .map(|(i, (c, _))| (c.to_string(), json!(i)))
            .collect();
        let label: Map<String, Value> = cats
            .iter()
            .map(|(c, l)| (c.to_string(), json!(l)))
            .collect();
        dimension.insert(
            code.to_string(),
            json!({ "category": { "index": index, "label": label } }),
        );
    }

    let cells: usize = size.iter().product();
    let value: Vec<Option<f64>> = (0..cells).map(|i| cell(&decode_index(i, &size))).collect();

    json!({
        "version": "2.0",
        "class": "dataset",
        "id": id,
        "size": size,
        "dimension": dimension,
        "value": value
    })
    .to_string()
}

fn key_figures() -> String {
    table(
        &[
            ("Alue", &[("KU074", "Halsua"), ("KU236", "Kaustinen")]),
            (
                "Tiedot",
                &[
                    ("M411", "Väkiluku"),
                    ("M180", "Työllisyysaste, %"),
                    ("M181", "Työllisyysaste 18-64-vuotiaat, %"),
                    ("M478", "Työttömien osuus työvoimasta, %"),
                    ("M137", "Väestöllinen huoltosuhde"),
                ],
            ),
            ("Vuosi", &[("2023", "2023"), ("2024", "2024")]),
        ],
        |c| match (c[0], c[1], c[2]) {
            (a, 0, y) => Some([[1160.0, 1150.0], [4280.0, 4262.0]][a][y]),
            (_, 1, _) => Some(70.0),
            (_, 2, y) => Some(74.0 + y as f64),
            (0, 3, 1) => None,
            (_, 3, _) => Some(8.0),
            _ => Some(70.5),
        },
    )
}

fn education() -> String {
    table(
        &[
            ("Vuosi", &[("2023", "2023"), ("2024", "2024")]),
            ("Oppilaitoksen sijaintialue", &[("KU236", "Kaustinen")]),
            (
                "Jatko-opinnot",
                &[("1", "a"), ("2", "b"), ("5", "c"), ("8", "d"), ("9", "e")],
            ),
        ],
        |c| if c[0] == 1 && c[2] == 4 { None } else { Some(10.0) },
    )
}

fn enterprises() -> String {
    table(
        &[
            (
                "Vuosi",
                &[("2021", "2021"), ("2022", "2022"), ("2023", "2023"), ("2024", "2024")],
            ),
            ("Kunta", &[("KU236", "Kaustinen")]),
            (
                "Tiedot",
                &[("henk", "Henkilöstö"), ("yrit", "Yritysten lukumäärä")],
            ),
        ],
        |c| Some(if c[2] == 1 { 400.0 + 10.0 * c[0] as f64 } else { 9999.0 }),
    )
}

fn births() -> String {
    table(
        &[
            ("Vuosi", &[("2024", "2024")]),
            ("Alue", &[("KU236", "Kaustinen")]),
            ("Tiedot", &[("vm01", "Elävänä syntyneet")]),
        ],
        |_| Some(40.0),
    )
}

fn projections() -> String {
    table(
        &[
            ("Alue", &[("KU236", "Kaustinen")]),
            (
                "Vuosi",
                &[("2024", "2024"), ("2025", "2025"), ("2030", "2030"), ("2045", "2045")],
            ),
            ("Sukupuoli", &[("SSS", "Yhteensä"), ("1", "Miehet"), ("2", "Naiset")]),
            (
                "Tiedot",
                &[
                    ("vm01_e24", "Elävänä syntyneet"),
                    ("vm4243_e24", "Nettomuutto"),
                    ("valisays_e24", "Väestönlisäys"),
                    ("vaesto_e24", "Väestö 31.12."),
                ],
            ),
        ],
        |c| {
            if c[2] != 0 {
                return Some(1.0);
            }
            Some(match c[3] {
                0 => 35.0,
                1 => -10.0,
                2 => -20.0,
                _ => [4262.0, 4240.0, 4100.0, 3800.0][c[1]],
            })
        },
    )
}

fn projected_dependency() -> String {
    table(
        &[
            ("Alue", &[("KU236", "Kaustinen")]),
            ("Vuosi", &[("2024", "2024"), ("2030", "2030")]),
            ("Tiedot", &[("hs", "Väestöllinen huoltosuhde")]),
        ],
        |c| Some(75.0 + c[1] as f64),
    )
}

fn full_source(catalog: &Catalog) -> MockSource {
    MockSource::new()
        .reply(catalog, "key_figures", Reply::Table(key_figures()))
        .reply(catalog, "education_applicants", Reply::Table(education()))
        .reply(catalog, "enterprises", Reply::Table(enterprises()))
        .reply(catalog, "births", Reply::Table(births()))
        .reply(catalog, "projections", Reply::Table(projections()))
        .reply(catalog, "projected_dependency_ratio", Reply::Table(projected_dependency()))
}

fn value(data: &seutu_core::DashboardData, name: &str, year: u32, m: Municipality) -> Option<f64> {
    data.series_or_empty(name).value_at(year, m)
}

// ---------------------------------------------------------------------------
// Test 1: Every dataset answers, every series is published
// ---------------------------------------------------------------------------
#[tokio::test]
async fn full_load_publishes_all_series() {
    let catalog = load_preset("statfin").unwrap();
    let source = full_source(&catalog);

    let data = load_dashboard(&source, &catalog).await;

    assert!(data.failures.is_empty());
    let mut published: Vec<&str> = data.series.keys().map(String::as_str).collect();
    let mut expected = catalog.published_names();
    published.sort_unstable();
    expected.sort_unstable();
    assert_eq!(published, expected);
    assert_eq!(published.len(), 12);
}

// ---------------------------------------------------------------------------
// Test 2: Indicator picks follow the label rules
// ---------------------------------------------------------------------------
#[tokio::test]
async fn key_figures_split_by_label_rules() {
    let catalog = load_preset("statfin").unwrap();
    let data = load_dashboard(&full_source(&catalog), &catalog).await;

    assert_eq!(value(&data, names::POPULATION, 2024, Kaustinen), Some(4262.0));
    assert_eq!(value(&data, names::POPULATION, 2023, Halsua), Some(1160.0));
    // The 18-64 rate wins over the plain one.
    assert_eq!(value(&data, names::EMPLOYMENT_RATE, 2024, Kaustinen), Some(75.0));
    assert_eq!(value(&data, names::UNEMPLOYMENT_RATE, 2024, Halsua), None);
    assert_eq!(value(&data, names::UNEMPLOYMENT_RATE, 2024, Kaustinen), Some(8.0));
    assert_eq!(value(&data, names::DEPENDENCY_RATIO, 2023, Halsua), Some(70.5));
    // Not in the response at all.
    assert_eq!(value(&data, names::POPULATION, 2024, Veteli), None);
}

// ---------------------------------------------------------------------------
// Test 3: Education applicants are summed across the selected programmes
// ---------------------------------------------------------------------------
#[tokio::test]
async fn education_applicants_are_summed() {
    let catalog = load_preset("statfin").unwrap();
    let data = load_dashboard(&full_source(&catalog), &catalog).await;

    assert_eq!(value(&data, names::EDUCATION_APPLICANTS, 2023, Kaustinen), Some(50.0));
    assert_eq!(value(&data, names::EDUCATION_APPLICANTS, 2024, Kaustinen), Some(40.0));
}

// ---------------------------------------------------------------------------
// Test 4: Projections are pinned to the total sex and split by code
// ---------------------------------------------------------------------------
#[tokio::test]
async fn projections_pin_total_and_split_by_code() {
    let catalog = load_preset("statfin").unwrap();
    let data = load_dashboard(&full_source(&catalog), &catalog).await;

    assert_eq!(value(&data, names::PROJECTED_POPULATION, 2030, Kaustinen), Some(4100.0));
    assert_eq!(value(&data, names::PROJECTED_BIRTHS, 2045, Kaustinen), Some(35.0));
    assert_eq!(value(&data, names::PROJECTED_NET_MIGRATION, 2030, Kaustinen), Some(-10.0));
    assert_eq!(value(&data, names::PROJECTED_POPULATION_CHANGE, 2025, Kaustinen), Some(-20.0));
    assert_eq!(value(&data, names::PROJECTED_DEPENDENCY_RATIO, 2030, Kaustinen), Some(76.0));
    assert_eq!(value(&data, names::ENTERPRISES, 2024, Kaustinen), Some(430.0));
    assert_eq!(value(&data, names::BIRTHS, 2024, Kaustinen), Some(40.0));
}

// ---------------------------------------------------------------------------
// Test 5: One failed dataset does not affect the others
// ---------------------------------------------------------------------------
#[tokio::test]
async fn failed_dataset_is_isolated() {
    let catalog = load_preset("statfin").unwrap();
    let source = full_source(&catalog).reply(&catalog, "enterprises", Reply::Status(503));

    let data = load_dashboard(&source, &catalog).await;

    assert_eq!(data.failures.len(), 1);
    assert_eq!(data.failures[0].dataset, "enterprises");
    assert!(data.failures[0].reason.contains("503"));
    assert!(!data.series.contains_key(names::ENTERPRISES));
    assert_eq!(data.series.len(), 11);
    assert_eq!(value(&data, names::POPULATION, 2024, Kaustinen), Some(4262.0));

    // Views still build, with an empty enterprise chart.
    let state = ViewState::for_data(&data);
    let exec = ExecutiveView::build(&data, &state, 5);
    assert!(exec.enterprise_chart.is_empty());
    assert_eq!(exec.enterprises.value, None);
}

// ---------------------------------------------------------------------------
// Test 6: A table of the wrong shape degrades to an empty series
// ---------------------------------------------------------------------------
#[tokio::test]
async fn wrong_shape_gives_empty_series_not_failure() {
    let catalog = load_preset("statfin").unwrap();
    let no_year = table(
        &[
            ("Alue", &[("KU236", "Kaustinen")]),
            ("Tiedot", &[("vm01", "Elävänä syntyneet")]),
        ],
        |_| Some(40.0),
    );
    let source = full_source(&catalog).reply(&catalog, "births", Reply::Table(no_year));

    let data = load_dashboard(&source, &catalog).await;

    assert!(data.failures.is_empty());
    assert!(data.series[names::BIRTHS].is_empty());
}

// ---------------------------------------------------------------------------
// Test 7: Every dataset is requested with its own query
// ---------------------------------------------------------------------------
#[tokio::test]
async fn queries_follow_catalog() {
    let catalog = load_preset("statfin").unwrap();
    let source = full_source(&catalog);
    load_dashboard(&source, &catalog).await;

    assert_eq!(source.requests.lock().unwrap().len(), catalog.datasets.len());

    let edu = source.query_for(&catalog.dataset("education_applicants").unwrap().url);
    let codes: Vec<&str> = edu.query.iter().map(|q| q.code.as_str()).collect();
    assert_eq!(codes, vec!["Oppilaitoksen sijaintialue", "Vuosi", "Jatko-opinnot"]);
    assert_eq!(edu.query[2].selection.values, vec!["1", "2", "5", "8", "9"]);

    let births = source.query_for(&catalog.dataset("births").unwrap().url);
    assert_eq!(births.query[1].selection.values, vec!["2024"]);
}

// ---------------------------------------------------------------------------
// Test 8: A slow load finishing after a newer one is discarded
// ---------------------------------------------------------------------------
#[tokio::test]
async fn stale_load_does_not_overwrite_newer() {
    let catalog = load_preset("statfin").unwrap();
    let mut state = DashboardState::new();

    let slow = state.begin_load();
    let fast = state.begin_load();

    let fresh = load_dashboard(&full_source(&catalog), &catalog).await;
    let failing = MockSource::new();
    let stale = load_dashboard(&failing, &catalog).await;
    assert_eq!(stale.failures.len(), catalog.datasets.len());

    assert!(state.complete(fast, fresh));
    assert!(!state.complete(slow, stale));
    assert!(state.data().is_complete());
    assert!(!state.is_loading());
}

// ---------------------------------------------------------------------------
// Test 9: Views over a full load
// ---------------------------------------------------------------------------
#[tokio::test]
async fn views_over_full_load() {
    let catalog = load_preset("statfin").unwrap();
    let data = load_dashboard(&full_source(&catalog), &catalog).await;
    let state = ViewState::for_data(&data);
    assert_eq!(state.year, 2024);

    let overview = RegionalOverview::build(&data, &state).unwrap();
    assert_eq!(overview.rows[0].municipality, Kaustinen);
    assert_eq!(overview.rows[0].education_applicants, Some(40.0));
    assert_eq!(overview.totals.population, 4262.0 + 1150.0);
    assert_eq!(overview.headline.largest, Kaustinen);

    let exec = ExecutiveView::build(&data, &state, 5);
    assert_eq!(exec.enterprise_chart.len(), 4 + 5);
    assert_eq!(exec.enterprise_chart.last().unwrap().forecast, Some(480.0));
    assert_eq!(exec.projection.population, Some(4100.0));
    assert_eq!(exec.projection.population_change, Some(-20.0));
}

// ---------------------------------------------------------------------------
// Test 10: Decoding a document with a byte order mark
// ---------------------------------------------------------------------------
#[test]
fn decode_document_with_bom() {
    let json = format!("\u{feff}{}", births());
    let plan = DecodePlan {
        entity: DimensionSelector::new("Alue"),
        year: DimensionSelector::new("Vuosi"),
        indicator: Some(DimensionSelector::new("Tiedot")),
        mode: IndicatorMode::Split,
    };

    let decoded = decode_document(&json, &plan).unwrap();
    assert_eq!(decoded.len(), 1);
    let (key, series) = decoded.iter().next().unwrap();
    assert_eq!(key.code, "vm01");
    assert_eq!(series.value_at(2024, Kaustinen), Some(40.0));
}

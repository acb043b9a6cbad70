use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The five municipalities of the Kaustinen sub-region tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Municipality {
    Halsua,
    Kaustinen,
    #[serde(rename = "Lestijärvi")]
    Lestijarvi,
    Toholampi,
    Veteli,
}

impl Municipality {
    pub const ALL: [Municipality; 5] = [
        Municipality::Halsua,
        Municipality::Kaustinen,
        Municipality::Lestijarvi,
        Municipality::Toholampi,
        Municipality::Veteli,
    ];

    /// Statistics Finland area code, as used in the `Alue`/`Kunta` dimensions.
    pub fn code(&self) -> &'static str {
        match self {
            Municipality::Halsua => "KU074",
            Municipality::Kaustinen => "KU236",
            Municipality::Lestijarvi => "KU421",
            Municipality::Toholampi => "KU849",
            Municipality::Veteli => "KU924",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Municipality::Halsua => "Halsua",
            Municipality::Kaustinen => "Kaustinen",
            Municipality::Lestijarvi => "Lestijärvi",
            Municipality::Toholampi => "Toholampi",
            Municipality::Veteli => "Veteli",
        }
    }

    pub fn from_code(code: &str) -> Option<Municipality> {
        let code = code.trim();
        Self::ALL.into_iter().find(|m| m.code() == code)
    }

    /// Match a category label such as "Lestijärvi" or "KU421 Lestijärvi".
    pub fn from_label(label: &str) -> Option<Municipality> {
        let lower = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|m| {
            let name = m.name().to_lowercase();
            lower == name || lower.split_whitespace().any(|w| w == name)
        })
    }

    /// Resolve user input: a name (with or without the umlaut) or an area code.
    pub fn from_str_loose(s: &str) -> Option<Municipality> {
        if let Some(m) = Self::from_code(&s.trim().to_uppercase()) {
            return Some(m);
        }
        let lower = s.trim().to_lowercase().replace('ä', "a");
        Self::ALL
            .into_iter()
            .find(|m| m.name().to_lowercase().replace('ä', "a") == lower)
    }
}

impl fmt::Display for Municipality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One calendar year of observations. A municipality missing from `values`
/// is unknown for that year, which is not the same as a recorded zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: u32,
    pub values: BTreeMap<Municipality, f64>,
}

impl YearRecord {
    pub fn new(year: u32) -> Self {
        Self {
            year,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, municipality: Municipality) -> Option<f64> {
        self.values.get(&municipality).copied()
    }

    pub fn set(&mut self, municipality: Municipality, value: f64) {
        self.values.insert(municipality, value);
    }

    /// Add to the existing value, starting from zero on the first contribution.
    pub fn accumulate(&mut self, municipality: Municipality, value: f64) {
        *self.values.entry(municipality).or_insert(0.0) += value;
    }
}

/// Year-ordered observations for one indicator. Records are strictly
/// increasing by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries {
    records: Vec<YearRecord>,
}

impl TimeSeries {
    pub const fn empty() -> Self {
        TimeSeries {
            records: Vec::new(),
        }
    }

    /// Build a series from records in any order. When a year repeats, the
    /// first record for that year is kept.
    pub fn from_records(mut records: Vec<YearRecord>) -> Self {
        records.sort_by_key(|r| r.year);
        records.dedup_by_key(|r| r.year);
        Self { records }
    }

    pub fn records(&self) -> &[YearRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<YearRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn years(&self) -> impl Iterator<Item = u32> + '_ {
        self.records.iter().map(|r| r.year)
    }

    pub fn first_year(&self) -> Option<u32> {
        self.records.first().map(|r| r.year)
    }

    pub fn last_year(&self) -> Option<u32> {
        self.records.last().map(|r| r.year)
    }

    pub fn record(&self, year: u32) -> Option<&YearRecord> {
        self.records
            .binary_search_by_key(&year, |r| r.year)
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn value_at(&self, year: u32, municipality: Municipality) -> Option<f64> {
        self.record(year).and_then(|r| r.get(municipality))
    }

    /// Observed (year, value) pairs for one municipality, ascending by year.
    pub fn points(&self, municipality: Municipality) -> Vec<(u32, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.get(municipality).map(|v| (r.year, v)))
            .collect()
    }

    /// Latest observation in `floor..=year`, searching backwards from `year`.
    pub fn latest_at_or_before(
        &self,
        municipality: Municipality,
        year: u32,
        floor: u32,
    ) -> Option<(u32, f64)> {
        self.records
            .iter()
            .rev()
            .filter(|r| r.year <= year && r.year >= floor)
            .find_map(|r| r.get(municipality).map(|v| (r.year, v)))
    }

    /// Latest observation anywhere in the series.
    pub fn last_valid(&self, municipality: Municipality) -> Option<(u32, f64)> {
        self.records
            .iter()
            .rev()
            .find_map(|r| r.get(municipality).map(|v| (r.year, v)))
    }
}

/// A forecast value for one year. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub year: u32,
    pub value: f64,
}

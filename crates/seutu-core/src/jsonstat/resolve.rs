use crate::jsonstat::table::Category;
use log::debug;
use serde::{Deserialize, Serialize};

/// Category codes PxWeb tables use for "all categories combined".
const TOTAL_CODES: &[&str] = &["SSS", "S", "YHT", "0000"];

/// Label fragments marking an aggregate category ("total", "all").
const TOTAL_FRAGMENTS: &[&str] = &["yhteensä", "kaikki", "total"];

/// Labels that are aggregates without saying so.
const TOTAL_LABELS: &[&str] = &["koko toimiala"];

/// Pick the category representing the whole population of an incidental
/// dimension (sex, sector, ...).
///
/// Order: a sentinel aggregate code, then an aggregate-sounding label, then
/// the first category. The last step is a best-effort guess; a table whose
/// incidental dimension has no recognisable total is decoded against its
/// first category without any error.
pub fn resolve_total_index(category: &Category) -> usize {
    let entries = category.entries();

    if let Some(i) = entries.iter().position(|e| TOTAL_CODES.contains(&e.code.as_str())) {
        return i;
    }

    let by_label = entries.iter().position(|e| {
        let label = e.label.to_lowercase();
        TOTAL_FRAGMENTS.iter().any(|f| label.contains(f)) || TOTAL_LABELS.contains(&label.as_str())
    });

    match by_label {
        Some(i) => i,
        None => {
            debug!(
                "no total category among {:?}, using first category",
                entries.iter().map(|e| e.code.as_str()).collect::<Vec<_>>()
            );
            0
        }
    }
}

/// Pick the indicator whose label contains any of `keywords`
/// (case-insensitive). Falls back to the first category when nothing
/// matches, with the same best-effort caveat as [`resolve_total_index`].
pub fn resolve_indicator_index(category: &Category, keywords: &[String]) -> usize {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let found = category.entries().iter().position(|e| {
        let label = e.label.to_lowercase();
        keywords.iter().any(|k| label.contains(k.as_str()))
    });

    match found {
        Some(i) => i,
        None => {
            debug!("no indicator label matches {:?}, using first category", keywords);
            0
        }
    }
}

/// One predicate over an indicator label. All set parts must hold.
///
/// Matching is case-insensitive. A rule with no parts set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRule {
    /// The whole label must equal this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<String>,
    /// Every term must appear in the label.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<String>,
    /// At least one term must appear in the label.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<String>,
    /// No term may appear in the label.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub none_of: Vec<String>,
}

impl LabelRule {
    pub fn exact(label: &str) -> Self {
        LabelRule {
            exact: Some(label.to_string()),
            ..Default::default()
        }
    }

    pub fn all_of(terms: &[&str]) -> Self {
        LabelRule {
            all_of: terms.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn any_of(mut self, terms: &[&str]) -> Self {
        self.any_of = terms.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn none_of(mut self, terms: &[&str]) -> Self {
        self.none_of = terms.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_none() && self.all_of.is_empty() && self.any_of.is_empty()
    }

    pub fn matches(&self, label: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        let label = label.to_lowercase();
        let contains = |term: &String| label.contains(&term.to_lowercase());

        if let Some(ref exact) = self.exact {
            if label != exact.to_lowercase() {
                return false;
            }
        }
        if !self.all_of.iter().all(contains) {
            return false;
        }
        if !self.any_of.is_empty() && !self.any_of.iter().any(contains) {
            return false;
        }
        !self.none_of.iter().any(contains)
    }
}

/// Choose among near-duplicate indicator labels.
///
/// Rules are tried in priority order; the first rule matching any label
/// decides, and its first matching label is returned.
pub fn resolve_preferred_label<'a, I>(labels: I, rules: &[LabelRule]) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let labels = labels.into_iter();
    rules
        .iter()
        .find_map(|rule| labels.clone().find(|label| rule.matches(label)))
}

/// [`resolve_preferred_label`] over a dimension, returning the category code.
pub fn resolve_preferred_code<'a>(category: &'a Category, rules: &[LabelRule]) -> Option<&'a str> {
    let label = resolve_preferred_label(category.labels(), rules)?;
    category
        .entries()
        .iter()
        .find(|e| e.label == label)
        .map(|e| e.code.as_str())
}

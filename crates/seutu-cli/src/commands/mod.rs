pub mod catalog;
pub mod decode;
pub mod executive;
pub mod fetch;
pub mod overview;
pub mod summary;

use clap::Args;
use seutu_core::catalog::builtin::{load_preset, DEFAULT_PRESET};
use seutu_core::catalog::load_catalog;
use seutu_core::catalog::schema::Catalog;
use seutu_core::error::SeutuError;
use seutu_core::model::Municipality;
use seutu_core::{load_dashboard, DashboardData, HttpTableSource};
use std::path::PathBuf;
use std::time::Duration;

/// Options shared by every command that loads from the table service.
#[derive(Args)]
pub struct LoadArgs {
    /// Custom JSON catalog file (default: the embedded statfin catalog)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,
}

impl LoadArgs {
    pub fn catalog(&self) -> Result<Catalog, SeutuError> {
        match &self.catalog {
            Some(path) => load_catalog(path),
            None => load_preset(DEFAULT_PRESET),
        }
    }

    /// Load the dashboard, reporting failed datasets on stderr.
    pub async fn load(&self) -> Result<DashboardData, SeutuError> {
        let catalog = self.catalog()?;
        let source = HttpTableSource::new(Duration::from_secs(self.timeout))?;
        let data = load_dashboard(&source, &catalog).await;
        for failure in &data.failures {
            eprintln!("  warning: {} unavailable: {}", failure.dataset, failure.reason);
        }
        Ok(data)
    }
}

/// Parse municipality names or codes; none means all five.
pub fn municipalities(names: &[String]) -> Result<Vec<Municipality>, SeutuError> {
    if names.is_empty() {
        return Ok(Municipality::ALL.to_vec());
    }
    names.iter().map(String::as_str).map(municipality).collect()
}

pub fn municipality(name: &str) -> Result<Municipality, SeutuError> {
    Municipality::from_str_loose(name).ok_or_else(|| SeutuError::UnknownMunicipality(name.to_string()))
}

use crate::error::SeutuError;
use crate::jsonstat::StatisticalTable;
use crate::query::TableQuery;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const BOM: char = '\u{feff}';

/// A remote statistical table service.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Post `query` to the table at `url` and return the decoded document.
    async fn fetch_table(&self, url: &str, query: &TableQuery) -> Result<StatisticalTable, SeutuError>;

    /// Name of this source (e.g. "pxweb").
    fn source_name(&self) -> &str;
}

/// PxWeb over HTTP: `POST <url>` with a JSON query, JSON-stat 2.0 back.
pub struct HttpTableSource {
    client: Client,
}

impl HttpTableSource {
    pub fn new(timeout: Duration) -> Result<Self, SeutuError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpTableSource { client })
    }
}

#[async_trait]
impl TableSource for HttpTableSource {
    async fn fetch_table(&self, url: &str, query: &TableQuery) -> Result<StatisticalTable, SeutuError> {
        debug!("POST {} ({} selections)", url, query.query.len());

        let response = self.client.post(url).json(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SeutuError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_body(&body)
    }

    fn source_name(&self) -> &str {
        "pxweb"
    }
}

/// PxWeb prefixes some responses with a byte order mark.
fn parse_body(body: &str) -> Result<StatisticalTable, SeutuError> {
    StatisticalTable::parse(body.trim_start_matches(BOM))
}

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SeutuError {
    #[error("failed to load catalog from {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("invalid catalog: {0}")]
    CatalogInvalid(String),

    #[error("table service returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("unexpected table format: {0}")]
    Format(String),

    #[error("unknown municipality '{0}'. Known: Halsua, Kaustinen, Lestijärvi, Toholampi, Veteli")]
    UnknownMunicipality(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a run. Label and vocabulary lookups never fail; they
/// degrade to a fallback value instead.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to retrieve schema from {url}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("failed to read schema file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("schema is not valid JSON")]
    Parse(#[from] serde_json::Error),
    #[error("schema document is empty")]
    Empty,
    #[error("locale '{0}' not found in schema")]
    MissingLocale(String),
}

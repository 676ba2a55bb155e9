use std::{fs, path::PathBuf, str::FromStr, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

use crate::{error::SchemaError, schema::Schema};

pub const DEFAULT_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/zotero/zotero-schema/master/schema.json";

#[derive(Clone, Debug, PartialEq)]
/// Where the schema comes from, which can either be
///
/// - a remote document, or
/// - a local copy of it.
pub enum Source {
    Url(Url),
    File(PathBuf),
}

impl FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Is this a path?
        if let Ok(path) = fs::canonicalize(s) {
            Ok(Source::File(path))
        }
        // No? Must be a URL then!
        else {
            let url = Url::parse(s).map_err(|e| format!("neither a file nor a URL: {e}"))?;
            match url.scheme() {
                "http" | "https" => Ok(Source::Url(url)),
                other => Err(format!("unsupported URL scheme '{other}'")),
            }
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url.as_str()),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Source {
    /// Retrieve and parse the schema. Nothing here is retried.
    pub fn load(&self, timeout: Duration) -> Result<Schema, SchemaError> {
        let body = match self {
            Source::Url(url) => fetch(url, timeout)?,
            Source::File(path) => fs::read_to_string(path).map_err(|source| SchemaError::Read {
                path: path.clone(),
                source,
            })?,
        };
        log::debug!("read {} bytes of schema from {self}", body.len());
        Schema::from_json(&body)
    }
}

fn fetch(url: &Url, timeout: Duration) -> Result<String, SchemaError> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("fetching {url}"));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let cfg = ureq::Agent::config_builder()
        .timeout_connect(Some(timeout))
        .timeout_global(Some(timeout))
        .build();
    let agent = ureq::Agent::new_with_config(cfg);
    let res = agent
        .get(url.as_str())
        .header("User-Agent", concat!("csl-map/", env!("CARGO_PKG_VERSION")))
        .header("Accept", "application/json")
        .call()
        .and_then(|res| res.into_body().read_to_string());
    spinner.finish_and_clear();

    res.map_err(|e| SchemaError::Transport {
        url: url.to_string(),
        source: Box::new(e),
    })
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::source::{DEFAULT_SCHEMA_URL, Source};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Cross-reference the Zotero schema with CSL variables.
pub struct Cli {
    /// Schema to read: an existing file, or an http(s) URL
    #[arg(long, value_name = "SRC", default_value = DEFAULT_SCHEMA_URL, global = true)]
    pub from: Source,

    /// Locale used for labels
    #[arg(long, default_value = "en-US", global = true)]
    pub locale: String,

    /// Seconds to wait for the schema download
    #[arg(long, value_name = "SECS", default_value_t = 10, global = true)]
    pub timeout: u64,

    /// Look FIELD up in the CSL table as KEY instead (repeatable)
    #[arg(long, value_name = "FIELD=KEY", value_parser = parse_redirect, global = true)]
    pub redirect: Vec<(String, String)>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the report to stdout (the default)
    Text,
    /// Write the report as a single HTML page
    Html {
        #[arg(short, long, value_name = "PATH", default_value = "zotero-csl-mapping.html")]
        output: PathBuf,
    },
}

fn parse_redirect(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, key)) if !field.is_empty() && !key.is_empty() => {
            Ok((field.to_string(), key.to_string()))
        }
        _ => Err(format!("expected FIELD=KEY, got '{s}'")),
    }
}

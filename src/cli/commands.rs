//! CLI commands and argument parsing

use crate::config::{ENV_BASE_URL, ENV_PASSWORD, ENV_USERNAME};
use crate::pagination::{DEFAULT_ITERATE_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use crate::types::{QueryParams, QueryValue};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DHIS2 CLI for metadata, analytics and data value sets
#[derive(Parser, Debug)]
#[command(name = "dhis2kit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connection profile (YAML); flags and environment override it
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// DHIS2 API base URL, e.g. http://localhost:8080/api
    #[arg(long, global = true, env = ENV_BASE_URL)]
    pub base_url: Option<String>,

    /// Username
    #[arg(long, global = true, env = ENV_USERNAME)]
    pub user: Option<String>,

    /// Password
    #[arg(long, global = true, env = ENV_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// HTTP timeout in seconds [default: 30]
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List one page of a metadata collection
    List {
        /// Resource name, e.g. dataElements, organisationUnits, dataSets
        resource: String,

        /// Comma-separated fields
        #[arg(long, default_value = "id,displayName")]
        fields: String,

        /// Page number (1-based)
        #[arg(long)]
        page: Option<u32>,

        /// Page size
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Ask the server to include total page metadata
        #[arg(long)]
        total_pages: bool,

        /// Key the items are nested under (defaults to the resource name)
        #[arg(long)]
        collection_key: Option<String>,

        /// Additional key=value parameters (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, QueryValue)>,
    },

    /// Walk every page of a collection, printing one item per line
    Iterate {
        /// Resource name
        resource: String,

        /// Comma-separated fields
        #[arg(long, default_value = "id,displayName")]
        fields: String,

        /// Page size
        #[arg(long, default_value_t = DEFAULT_ITERATE_PAGE_SIZE)]
        page_size: u32,

        /// First page to fetch
        #[arg(long, default_value_t = 1)]
        start_page: u32,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// Stop after this many items
        #[arg(long)]
        limit: Option<usize>,

        /// Key the items are nested under (defaults to the resource name)
        #[arg(long)]
        collection_key: Option<String>,

        /// Additional key=value parameters (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, QueryValue)>,
    },

    /// Get a single metadata object by UID
    Get {
        /// Resource name
        resource: String,

        /// Object UID
        uid: String,

        /// Comma-separated fields
        #[arg(long, default_value = "id,displayName")]
        fields: String,

        /// Additional key=value parameters (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, QueryValue)>,
    },

    /// Run an analytics query
    Analytics {
        /// Dimension(s), repeatable or comma-separated, e.g. dx:Uvn6LCg7dVU,pe:LAST_12_MONTHS
        #[arg(long)]
        dimension: Vec<String>,

        /// Filter, e.g. ou:ImspTQPwCqd
        #[arg(long)]
        filter: Option<String>,

        /// Additional key=value parameters (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, QueryValue)>,
    },

    /// Export data value sets
    PullDvs {
        /// Data set UID
        #[arg(long)]
        data_set: Option<String>,

        /// Period, e.g. 202201
        #[arg(long)]
        period: Option<String>,

        /// Organisation unit UID
        #[arg(long)]
        org_unit: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Additional key=value parameters (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, QueryValue)>,
    },

    /// Import data value sets from a JSON file
    PushDvs {
        /// Path to the JSON payload
        file: PathBuf,
    },

    /// List a few data elements and walk two pages of organisation units
    Demo,
}

/// Parse `key=value`, coercing the value
pub fn parse_param(raw: &str) -> Result<(String, QueryValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Expected key=value, got: {raw}"))?;
    if key.is_empty() {
        return Err(format!("Empty parameter name in: {raw}"));
    }
    Ok((key.to_string(), QueryValue::coerce(value)))
}

/// Collect parsed `--param` pairs; later pairs win
pub fn params_map(pairs: &[(String, QueryValue)]) -> QueryParams {
    pairs.iter().cloned().collect()
}

/// Split a comma-separated list, dropping empty entries
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

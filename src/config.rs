// Command-line and environment configuration, read once at startup.

use crate::api::{DateRange, DEFAULT_STATUSES};
use crate::flow::Query;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api-eu.syrve.live";

#[derive(Parser, Debug, Clone)]
#[command(version)]
/// Lists orders placed on selected restaurant tables.
pub struct Config {
    /// API login exchanged for an access token.
    #[arg(long, env = "API_LOGIN", hide_env_values = true, default_value = "")]
    pub api_login: String,

    /// Base URL of the POS cloud API.
    #[arg(long, env = "SYRVE_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Start of the order window, sent as-is.
    #[arg(long, env = "ORDERS_DATE_FROM", default_value = "2025-01-01 00:00:00.000")]
    pub date_from: String,

    /// End of the order window, sent as-is.
    #[arg(long, env = "ORDERS_DATE_TO", default_value = "2025-01-13 23:59:59.999")]
    pub date_to: String,

    /// Order statuses to include.
    #[arg(long = "status", value_delimiter = ',', num_args = 1..)]
    pub statuses: Vec<String>,

    /// File that receives the run log; appended to, never truncated.
    #[arg(long, env = "ORDERS_LOG_FILE", default_value = "script.log")]
    pub log_file: PathBuf,

    /// Hide the progress spinner during requests.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Config {
    /// Fixed inputs of the interactive run.
    pub fn query(&self) -> Query {
        let statuses = if self.statuses.is_empty() {
            DEFAULT_STATUSES.iter().map(|s| s.to_string()).collect()
        } else {
            self.statuses.clone()
        };
        Query {
            api_login: self.api_login.clone(),
            range: DateRange {
                from: self.date_from.clone(),
                to: self.date_to.clone(),
            },
            statuses,
        }
    }
}

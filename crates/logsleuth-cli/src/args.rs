use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "logsleuth")]
#[command(about = "Run a CloudWatch Logs Insights query, optionally seeded from an X-Ray trace", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a file containing the query text
    #[arg(long)]
    pub query: PathBuf,

    /// Name of a log group to query; repeat for multiple groups.
    /// Required unless --trace-id discovers the groups.
    #[arg(long = "log-group")]
    pub log_groups: Vec<String>,

    /// Seed log groups, query window and filter clause by walking the
    /// trace graph reachable from this trace id
    #[arg(long)]
    pub trace_id: Option<String>,

    /// Inclusive start of the query window, RFC3339
    #[arg(long, value_parser = parse_rfc3339)]
    pub start: Option<DateTime<Utc>>,

    /// Inclusive end of the query window, RFC3339
    #[arg(long, value_parser = parse_rfc3339)]
    pub end: Option<DateTime<Utc>>,

    /// Window length in seconds, used to default whichever of
    /// --start/--end is missing
    #[arg(long, default_value_t = 300)]
    pub duration: u64,

    /// Cap on returned rows, overriding any limit clause in the query text
    #[arg(long)]
    pub limit: Option<i32>,

    /// Overall deadline in seconds; the running query is cancelled when it
    /// fires
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Where to write the final statistics snapshot (default: stderr)
    #[arg(long)]
    pub stat: Option<PathBuf>,

    /// Where to write result rows as JSON lines (default: stdout)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Log verbosity: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("not an RFC3339 timestamp: {}", err))
}

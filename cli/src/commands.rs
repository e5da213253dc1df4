pub mod expand;
pub mod scan;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use fronter_common::config;

#[derive(Parser)]
#[command(name = "fronter")]
#[command(about = "Finds addresses fronting a domain-bound endpoint.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe a candidate list and persist the ranked results
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Parse an input file and print the expanded candidate list
    #[command(alias = "e")]
    Expand(ExpandArgs),
}

#[derive(Args)]
pub struct ScanArgs {
    /// Domain the probed endpoint is bound to
    pub domain: String,

    /// File with one IP address or CIDR block per line
    #[arg(short, long, default_value = "ip.txt")]
    pub input: PathBuf,

    /// Output CSV path (defaults to a timestamped filename)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file mapping datacenter codes to display names
    #[arg(long, default_value = "datacenters.json")]
    pub datacenters: PathBuf,

    /// Literal expected in a successful response body
    #[arg(long, default_value = config::DEFAULT_MARKER)]
    pub marker: String,

    /// Geolocation endpoint template; `{ip}` is substituted per candidate
    #[arg(long)]
    pub geo_endpoint: Option<String>,

    /// Proxy-capability endpoint template; `{ip}` is substituted per candidate
    #[arg(long)]
    pub proxy_endpoint: Option<String>,

    /// Simultaneous connectivity probes
    #[arg(long, default_value_t = config::DEFAULT_HTTP_CONCURRENCY)]
    pub concurrency: usize,

    /// Candidates per rate-limited enrichment batch
    #[arg(long, default_value_t = config::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Seconds to pause between enrichment batches
    #[arg(long, default_value_t = 11)]
    pub batch_delay: u64,

    /// HTTP timeout in seconds for every probe request
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// ICMP echoes per candidate
    #[arg(long, default_value_t = config::DEFAULT_PING_COUNT)]
    pub ping_count: usize,
}

#[derive(Args)]
pub struct ExpandArgs {
    /// File with one IP address or CIDR block per line
    #[arg(default_value = "ip.txt")]
    pub input: PathBuf,

    /// Largest accepted expansion of a single network line
    #[arg(long, default_value_t = config::DEFAULT_MAX_NETWORK_SIZE)]
    pub max_network_size: usize,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

use std::time::Duration;

/// HTTP probe concurrency. Lower is more precise, higher is faster.
pub const DEFAULT_HTTP_CONCURRENCY: usize = 1000;
pub const DEFAULT_GEO_CONCURRENCY: usize = 20;
pub const DEFAULT_PROXY_CONCURRENCY: usize = 20;
pub const DEFAULT_LATENCY_CONCURRENCY: usize = 20;

/// The geolocation API allows 45 requests per minute; 9 per batch with an
/// 11 second pause keeps the steady-state rate under the ceiling.
pub const DEFAULT_BATCH_SIZE: usize = 9;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(11);

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_PING_COUNT: usize = 3;

/// Largest network expansion accepted from a single input line (a /24).
pub const DEFAULT_MAX_NETWORK_SIZE: usize = 256;

pub const DEFAULT_MARKER: &str = "Hello World!";
pub const DEFAULT_GEO_ENDPOINT: &str =
    "http://ip-api.com/json/{ip}?fields=status,message,country,regionName,city,isp";
pub const DEFAULT_PROXY_ENDPOINT: &str = "https://check.proxyip.cmliussss.net/check?proxyip={ip}";

/// Run parameters for a full probing pass.
///
/// The CLI fills this from arguments; defaults match the tuning above.
#[derive(Debug, Clone)]
pub struct Config {
    /// Domain the probed endpoint is bound to.
    pub domain: String,
    /// Literal expected in a successful response body.
    pub marker: String,
    /// Geolocation endpoint template; `{ip}` is substituted per candidate.
    pub geo_endpoint: String,
    /// Proxy-capability endpoint template; `{ip}` is substituted per candidate.
    pub proxy_endpoint: String,

    pub http_timeout: Duration,
    pub ping_timeout: Duration,
    pub ping_count: usize,

    pub http_concurrency: usize,
    pub geo_concurrency: usize,
    pub proxy_concurrency: usize,
    pub latency_concurrency: usize,

    pub batch_size: usize,
    pub batch_delay: Duration,

    pub max_network_size: usize,
}

impl Config {
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            marker: DEFAULT_MARKER.to_string(),
            geo_endpoint: DEFAULT_GEO_ENDPOINT.to_string(),
            proxy_endpoint: DEFAULT_PROXY_ENDPOINT.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            ping_timeout: DEFAULT_PING_TIMEOUT,
            ping_count: DEFAULT_PING_COUNT,
            http_concurrency: DEFAULT_HTTP_CONCURRENCY,
            geo_concurrency: DEFAULT_GEO_CONCURRENCY,
            proxy_concurrency: DEFAULT_PROXY_CONCURRENCY,
            latency_concurrency: DEFAULT_LATENCY_CONCURRENCY,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            max_network_size: DEFAULT_MAX_NETWORK_SIZE,
        }
    }

    /// URL of the probed endpoint.
    pub fn probe_url(&self) -> String {
        format!("https://{}/", self.domain)
    }

    /// URL of the edge trace endpoint, served by the same forced destination.
    pub fn trace_url(&self) -> String {
        format!("https://{}/cdn-cgi/trace", self.domain)
    }
}

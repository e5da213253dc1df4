//! Result records produced by the probing pipeline.
//!
//! Every probe is total: it yields one of these records for every input,
//! with documented sentinel values standing in for anything it could not
//! measure. Failures travel as data, never as errors across stage
//! boundaries.

use crate::candidate::Candidate;

/// Longest diagnostic carried inside a failure-variant record.
pub const MAX_DIAGNOSTIC_LEN: usize = 100;

/// Sentinel for string fields no probe could fill.
pub const UNKNOWN_FIELD: &str = "N/A";

/// Truncates a diagnostic message to a bounded length.
pub fn bounded_diagnostic(message: impl AsRef<str>) -> String {
    let message = message.as_ref();
    if message.len() <= MAX_DIAGNOSTIC_LEN {
        return message.to_string();
    }
    let mut cut = MAX_DIAGNOSTIC_LEN;
    while !message.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &message[..cut])
}

/// Outcome of the forced-destination HTTP probe for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityResult {
    pub candidate: Candidate,
    pub reachable: bool,
    /// Observed status, or 0 when the request failed at the transport layer.
    pub http_status: u16,
    /// First characters of a successful response body.
    pub response_snippet: String,
}

impl ConnectivityResult {
    pub fn unreachable(candidate: Candidate, http_status: u16) -> Self {
        Self {
            candidate,
            reachable: false,
            http_status,
            response_snippet: String::new(),
        }
    }
}

/// Geolocation lookup outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoResult {
    pub candidate: Candidate,
    pub outcome: GeoOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoOutcome {
    Known {
        country: String,
        region: String,
        city: String,
        isp: String,
    },
    /// Network error, malformed body, or a logical failure reported by the
    /// service; carries a bounded diagnostic.
    Failed { message: String },
}

impl GeoResult {
    pub fn failed(candidate: Candidate, message: impl AsRef<str>) -> Self {
        Self {
            candidate,
            outcome: GeoOutcome::Failed {
                message: bounded_diagnostic(message),
            },
        }
    }
}

/// Proxy-capability check outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResult {
    pub candidate: Candidate,
    pub available: bool,
    /// Remote port the proxy serves on; -1 when unknown.
    pub port: i32,
    /// Point-of-presence code reported by the service.
    pub datacenter_code: String,
    /// Service-reported response time in milliseconds; -1 when unknown.
    pub response_time_ms: f64,
}

impl ProxyResult {
    pub fn unavailable(candidate: Candidate) -> Self {
        Self {
            candidate,
            available: false,
            port: -1,
            datacenter_code: UNKNOWN_FIELD.to_string(),
            response_time_ms: -1.0,
        }
    }
}

/// ICMP round-trip measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyResult {
    pub candidate: Candidate,
    /// Mean of the successful round trips in milliseconds;
    /// `f64::INFINITY` when none succeeded.
    pub avg_ms: f64,
}

impl LatencyResult {
    pub fn unmeasured(candidate: Candidate) -> Self {
        Self {
            candidate,
            avg_ms: f64::INFINITY,
        }
    }
}

/// Edge trace outcome: the point-of-presence code the endpoint itself
/// reported, when the trace path is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeTrace {
    pub candidate: Candidate,
    pub colo: Option<String>,
}

/// The join of every probe's output for one reachable candidate.
///
/// Built exactly once per reachable candidate; absent enrichments appear
/// as their sentinel values.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRecord {
    pub candidate: Candidate,
    pub http_status: u16,
    pub response_snippet: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub isp: String,
    pub avg_latency_ms: f64,
    pub proxy_available: bool,
    pub proxy_port: i32,
    pub datacenter_code: String,
    pub datacenter_name: String,
    pub proxy_response_time_ms: f64,
}

/// Summary statistics for a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub total_tested: usize,
    pub reachable: usize,
    /// Percentage of candidates that passed the connectivity probe.
    pub success_rate: f64,
    /// Mean latency over records with a finite measurement.
    pub avg_latency_ms: Option<f64>,
    pub proxies_available: usize,
    /// Mean service-reported response time over proxy-capable records.
    pub avg_proxy_response_ms: Option<f64>,
}

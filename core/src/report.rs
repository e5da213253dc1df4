//! Aggregation, ranking and run statistics.
//!
//! Joins the per-candidate probe outputs by candidate key into one
//! [`CombinedRecord`] per reachable candidate. Arrival order of the probe
//! results is irrelevant; absent enrichments degrade to their documented
//! sentinels.

use std::collections::HashMap;

use fronter_common::candidate::Candidate;
use fronter_common::datacenter::DatacenterTable;
use fronter_common::record::{
    CombinedRecord, ConnectivityResult, EdgeTrace, GeoOutcome, GeoResult, LatencyResult,
    ProxyResult, RunStats, UNKNOWN_FIELD,
};

/// Country column value when the geolocation lookup failed outright.
const GEO_FAILED: &str = "lookup failed";

/// Joins probe outputs into one record per reachable candidate, in
/// connectivity order.
pub fn combine(
    connectivity: &[ConnectivityResult],
    geo: Vec<GeoResult>,
    proxy: Vec<ProxyResult>,
    latency: Vec<LatencyResult>,
    traces: Vec<EdgeTrace>,
    table: &DatacenterTable,
) -> Vec<CombinedRecord> {
    let mut geo_map: HashMap<Candidate, GeoResult> =
        geo.into_iter().map(|r| (r.candidate, r)).collect();
    let mut proxy_map: HashMap<Candidate, ProxyResult> =
        proxy.into_iter().map(|r| (r.candidate, r)).collect();
    let mut latency_map: HashMap<Candidate, LatencyResult> =
        latency.into_iter().map(|r| (r.candidate, r)).collect();
    let mut trace_map: HashMap<Candidate, EdgeTrace> =
        traces.into_iter().map(|r| (r.candidate, r)).collect();

    connectivity
        .iter()
        .filter(|result| result.reachable)
        .map(|result| {
            let candidate = result.candidate;

            let (country, region, city, isp) = match geo_map.remove(&candidate) {
                Some(GeoResult {
                    outcome: GeoOutcome::Known {
                        country,
                        region,
                        city,
                        isp,
                    },
                    ..
                }) => (country, region, city, isp),
                Some(GeoResult {
                    outcome: GeoOutcome::Failed { message },
                    ..
                }) => (
                    GEO_FAILED.to_string(),
                    message,
                    UNKNOWN_FIELD.to_string(),
                    UNKNOWN_FIELD.to_string(),
                ),
                None => (
                    UNKNOWN_FIELD.to_string(),
                    UNKNOWN_FIELD.to_string(),
                    UNKNOWN_FIELD.to_string(),
                    UNKNOWN_FIELD.to_string(),
                ),
            };

            let proxy = proxy_map
                .remove(&candidate)
                .unwrap_or_else(|| ProxyResult::unavailable(candidate));

            let avg_latency_ms = latency_map
                .remove(&candidate)
                .map(|r| r.avg_ms)
                .unwrap_or(f64::INFINITY);

            // The capability service's colo wins; the edge trace fills in
            // when the service reported nothing.
            let datacenter_code = if proxy.datacenter_code == UNKNOWN_FIELD {
                trace_map
                    .remove(&candidate)
                    .and_then(|t| t.colo)
                    .unwrap_or(proxy.datacenter_code)
            } else {
                proxy.datacenter_code
            };
            let datacenter_name = table.display_name(&datacenter_code);

            CombinedRecord {
                candidate,
                http_status: result.http_status,
                response_snippet: result.response_snippet.clone(),
                country,
                region,
                city,
                isp,
                avg_latency_ms,
                proxy_available: proxy.available,
                proxy_port: proxy.port,
                datacenter_code,
                datacenter_name,
                proxy_response_time_ms: proxy.response_time_ms,
            }
        })
        .collect()
}

/// Ranks records ascending by latency; unmeasured (infinite, or NaN from a
/// poisoned measurement) sorts last. Stable under ties.
pub fn rank(records: &mut [CombinedRecord]) {
    records.sort_by(|a, b| a.avg_latency_ms.total_cmp(&b.avg_latency_ms));
}

/// Summary statistics over a finished run.
pub fn statistics(total_tested: usize, records: &[CombinedRecord]) -> RunStats {
    let reachable = records.len();
    let success_rate = if total_tested == 0 {
        0.0
    } else {
        reachable as f64 / total_tested as f64 * 100.0
    };

    let finite: Vec<f64> = records
        .iter()
        .map(|r| r.avg_latency_ms)
        .filter(|ms| ms.is_finite())
        .collect();
    let avg_latency_ms = (!finite.is_empty())
        .then(|| finite.iter().sum::<f64>() / finite.len() as f64);

    let proxies: Vec<&CombinedRecord> = records.iter().filter(|r| r.proxy_available).collect();
    let avg_proxy_response_ms = (!proxies.is_empty()).then(|| {
        proxies.iter().map(|r| r.proxy_response_time_ms).sum::<f64>() / proxies.len() as f64
    });

    RunStats {
        total_tested,
        reachable,
        success_rate,
        avg_latency_ms,
        proxies_available: proxies.len(),
        avg_proxy_response_ms,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

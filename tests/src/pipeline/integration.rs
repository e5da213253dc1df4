#![cfg(test)]
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use fronter_common::candidate::Candidate;
use fronter_common::config::Config;
use fronter_common::datacenter::DatacenterTable;
use fronter_common::record::{
    CombinedRecord, ConnectivityResult, EdgeTrace, GeoOutcome, GeoResult, LatencyResult,
    ProxyResult,
};
use fronter_common::sink::NoopProgress;
use fronter_core::pipeline::Pipeline;
use fronter_core::probe::{
    ConnectivityCheck, EdgeTraceLookup, GeoLookup, LatencyMeasure, ProxyCheck,
};

fn candidate(s: &str) -> Candidate {
    s.parse().expect("test candidate")
}

type CallLog = Arc<Mutex<Vec<Candidate>>>;

/// Connectivity fake: candidates in `reachable` pass, everything else is
/// refused with a 403.
struct ScriptedConnectivity {
    reachable: HashSet<Candidate>,
    calls: CallLog,
}

#[async_trait]
impl ConnectivityCheck for ScriptedConnectivity {
    async fn check(&self, candidate: Candidate) -> ConnectivityResult {
        self.calls.lock().unwrap().push(candidate);
        if self.reachable.contains(&candidate) {
            ConnectivityResult {
                candidate,
                reachable: true,
                http_status: 200,
                response_snippet: "Hello World!".to_string(),
            }
        } else {
            ConnectivityResult::unreachable(candidate, 403)
        }
    }
}

struct ScriptedGeo {
    known: HashSet<Candidate>,
    calls: CallLog,
}

#[async_trait]
impl GeoLookup for ScriptedGeo {
    async fn lookup(&self, candidate: Candidate) -> GeoResult {
        self.calls.lock().unwrap().push(candidate);
        if self.known.contains(&candidate) {
            GeoResult {
                candidate,
                outcome: GeoOutcome::Known {
                    country: "Germany".to_string(),
                    region: "Hesse".to_string(),
                    city: "Frankfurt".to_string(),
                    isp: "Example GmbH".to_string(),
                },
            }
        } else {
            GeoResult::failed(candidate, "scripted failure")
        }
    }
}

struct ScriptedProxy {
    capable: HashSet<Candidate>,
    calls: CallLog,
}

#[async_trait]
impl ProxyCheck for ScriptedProxy {
    async fn check(&self, candidate: Candidate) -> ProxyResult {
        self.calls.lock().unwrap().push(candidate);
        if self.capable.contains(&candidate) {
            ProxyResult {
                candidate,
                available: true,
                port: 443,
                datacenter_code: "HKG".to_string(),
                response_time_ms: 12.0,
            }
        } else {
            ProxyResult::unavailable(candidate)
        }
    }
}

struct ScriptedLatency {
    measured: HashMap<Candidate, f64>,
    calls: CallLog,
}

#[async_trait]
impl LatencyMeasure for ScriptedLatency {
    async fn measure(&self, candidate: Candidate) -> LatencyResult {
        self.calls.lock().unwrap().push(candidate);
        match self.measured.get(&candidate) {
            Some(avg_ms) => LatencyResult {
                candidate,
                avg_ms: *avg_ms,
            },
            None => LatencyResult::unmeasured(candidate),
        }
    }
}

struct ScriptedTrace;

#[async_trait]
impl EdgeTraceLookup for ScriptedTrace {
    async fn trace(&self, candidate: Candidate) -> EdgeTrace {
        EdgeTrace {
            candidate,
            colo: None,
        }
    }
}

struct Fixture {
    pipeline: Pipeline,
    connectivity_calls: CallLog,
    geo_calls: CallLog,
    proxy_calls: CallLog,
    latency_calls: CallLog,
}

fn fixture(
    config: Config,
    reachable: &[Candidate],
    enriched: &[Candidate],
    latencies: HashMap<Candidate, f64>,
) -> Fixture {
    let connectivity_calls: CallLog = Arc::default();
    let geo_calls: CallLog = Arc::default();
    let proxy_calls: CallLog = Arc::default();
    let latency_calls: CallLog = Arc::default();

    let pipeline = Pipeline::with_probes(
        config,
        Arc::new(ScriptedConnectivity {
            reachable: reachable.iter().copied().collect(),
            calls: connectivity_calls.clone(),
        }),
        Arc::new(ScriptedGeo {
            known: enriched.iter().copied().collect(),
            calls: geo_calls.clone(),
        }),
        Arc::new(ScriptedProxy {
            capable: enriched.iter().copied().collect(),
            calls: proxy_calls.clone(),
        }),
        Arc::new(ScriptedLatency {
            measured: latencies,
            calls: latency_calls.clone(),
        }),
        Arc::new(ScriptedTrace),
        Arc::new(NoopProgress),
    );

    Fixture {
        pipeline,
        connectivity_calls,
        geo_calls,
        proxy_calls,
        latency_calls,
    }
}

fn test_config() -> Config {
    let mut config = Config::for_domain("front.example.com");
    config.batch_size = 2;
    config.batch_delay = Duration::ZERO;
    config
}

#[tokio::test]
async fn every_candidate_probed_once_and_enrichment_runs_only_for_reachable() {
    let all: Vec<Candidate> = (1..=5).map(|i| candidate(&format!("10.0.0.{i}"))).collect();
    let reachable = vec![all[0], all[2], all[4]];

    let fixture = fixture(test_config(), &reachable, &reachable, HashMap::new());
    let report = fixture
        .pipeline
        .run(all.clone(), &DatacenterTable::default())
        .await
        .expect("pipeline run");

    // Exactly one connectivity probe per candidate.
    let mut probed = fixture.connectivity_calls.lock().unwrap().clone();
    probed.sort();
    let mut expected = all.clone();
    expected.sort();
    assert_eq!(probed, expected);

    // Every enrichment probe ran for the reachable set and nothing else.
    let reachable_set: HashSet<Candidate> = reachable.iter().copied().collect();
    for calls in [
        &fixture.geo_calls,
        &fixture.proxy_calls,
        &fixture.latency_calls,
    ] {
        let seen: HashSet<Candidate> = calls.lock().unwrap().iter().copied().collect();
        assert_eq!(seen, reachable_set);
        assert_eq!(calls.lock().unwrap().len(), reachable.len());
    }

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.stats.total_tested, 5);
    assert_eq!(report.stats.reachable, 3);
}

#[tokio::test]
async fn mixed_outcomes_rank_the_all_unknown_record_last() {
    let unreachable = candidate("10.0.0.1");
    let healthy = candidate("10.0.0.2");
    let degraded = candidate("10.0.0.3");

    let mut latencies = HashMap::new();
    latencies.insert(healthy, 12.5);

    let fixture = fixture(
        test_config(),
        &[healthy, degraded],
        &[healthy],
        latencies,
    );
    let report = fixture
        .pipeline
        .run(
            vec![unreachable, healthy, degraded],
            &DatacenterTable::default(),
        )
        .await
        .expect("pipeline run");

    assert_eq!(report.records.len(), 2);

    let first: &CombinedRecord = &report.records[0];
    assert_eq!(first.candidate, healthy);
    assert_eq!(first.country, "Germany");
    assert!(first.proxy_available);
    assert_eq!(first.proxy_port, 443);
    assert_eq!(first.avg_latency_ms, 12.5);

    // The degraded candidate keeps only sentinel enrichment values and
    // sorts last on its infinite latency.
    let second: &CombinedRecord = &report.records[1];
    assert_eq!(second.candidate, degraded);
    assert_eq!(second.country, "lookup failed");
    assert!(!second.proxy_available);
    assert_eq!(second.proxy_port, -1);
    assert_eq!(second.datacenter_code, "N/A");
    assert_eq!(second.avg_latency_ms, f64::INFINITY);

    assert_eq!(report.stats.total_tested, 3);
    assert_eq!(report.stats.reachable, 2);
    assert_eq!(report.stats.proxies_available, 1);
    assert_eq!(report.stats.avg_latency_ms, Some(12.5));
}

#[tokio::test]
async fn empty_candidate_list_is_a_setup_error() {
    let fixture = fixture(test_config(), &[], &[], HashMap::new());
    let result = fixture
        .pipeline
        .run(Vec::new(), &DatacenterTable::default())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unreachable_everything_yields_an_empty_report() {
    let all = vec![candidate("10.0.0.1"), candidate("10.0.0.2")];

    let fixture = fixture(test_config(), &[], &[], HashMap::new());
    let report = fixture
        .pipeline
        .run(all, &DatacenterTable::default())
        .await
        .expect("pipeline run");

    assert!(report.records.is_empty());
    assert_eq!(report.stats.total_tested, 2);
    assert_eq!(report.stats.reachable, 0);
    assert_eq!(report.stats.success_rate, 0.0);

    // No enrichment probe may run without a reachable candidate.
    assert!(fixture.geo_calls.lock().unwrap().is_empty());
    assert!(fixture.proxy_calls.lock().unwrap().is_empty());
    assert!(fixture.latency_calls.lock().unwrap().is_empty());
}

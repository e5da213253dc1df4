//! # Probing Pipeline
//!
//! Implements the full "probe a candidate set" use case.
//!
//! Stage 1 fans the connectivity probe out over every candidate under its
//! own governor. Stage 2 takes the reachable survivors through one
//! rate-limited batch pass; within each batch the geolocation, proxy,
//! latency and edge-trace probes run concurrently, each gated by its own
//! governor, and the batch fully drains before the inter-batch delay.
//! Stage 3 joins everything into ranked records.
//!
//! All probe I/O multiplexes on the one event loop: the fan-outs are
//! plain futures joined in place, never spawned tasks. Results pair with
//! their candidate by key, so completion order is free to vary.

use std::sync::Arc;

use anyhow::ensure;
use futures::future::join_all;
use tracing::info;

use fronter_common::candidate::Candidate;
use fronter_common::config::Config;
use fronter_common::datacenter::DatacenterTable;
use fronter_common::record::{
    CombinedRecord, ConnectivityResult, EdgeTrace, GeoResult, LatencyResult, ProxyResult, RunStats,
};
use fronter_common::sink::ProgressSink;

use crate::batch::Batcher;
use crate::governor::Governor;
use crate::probe::{
    ConnectivityCheck, EdgeTraceLookup, EdgeTraceProbe, GeoLookup, GeoLookupProbe,
    HttpConnectivityProbe, IcmpLatencyProbe, LatencyMeasure, ProxyCapabilityProbe, ProxyCheck,
};
use crate::report;

/// The ranked dataset and its summary, ready for the result sink.
#[derive(Debug)]
pub struct ProbeReport {
    pub records: Vec<CombinedRecord>,
    pub stats: RunStats,
}

/// Orchestrates one full probing run.
///
/// The probes are held behind their seams so the pipeline can be driven
/// with fakes; [`Pipeline::new`] wires up the real ones.
pub struct Pipeline {
    config: Config,
    connectivity: Arc<dyn ConnectivityCheck>,
    geo: Arc<dyn GeoLookup>,
    proxy: Arc<dyn ProxyCheck>,
    latency: Arc<dyn LatencyMeasure>,
    trace: Arc<dyn EdgeTraceLookup>,
    progress: Arc<dyn ProgressSink>,
}

impl Pipeline {
    pub fn new(config: Config, progress: Arc<dyn ProgressSink>) -> anyhow::Result<Self> {
        Ok(Self {
            connectivity: Arc::new(HttpConnectivityProbe::new(&config)),
            geo: Arc::new(GeoLookupProbe::new(&config)?),
            proxy: Arc::new(ProxyCapabilityProbe::new(&config)?),
            latency: Arc::new(IcmpLatencyProbe::new(&config)),
            trace: Arc::new(EdgeTraceProbe::new(&config)),
            config,
            progress,
        })
    }

    /// Assembles a pipeline from explicit probe implementations.
    pub fn with_probes(
        config: Config,
        connectivity: Arc<dyn ConnectivityCheck>,
        geo: Arc<dyn GeoLookup>,
        proxy: Arc<dyn ProxyCheck>,
        latency: Arc<dyn LatencyMeasure>,
        trace: Arc<dyn EdgeTraceLookup>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            config,
            connectivity,
            geo,
            proxy,
            latency,
            trace,
            progress,
        }
    }

    /// Runs the full pipeline over `candidates`.
    ///
    /// Every candidate yields exactly one connectivity result; enrichment
    /// runs only for the reachable ones. Per-candidate failures never
    /// abort the run.
    pub async fn run(
        &self,
        candidates: Vec<Candidate>,
        table: &DatacenterTable,
    ) -> anyhow::Result<ProbeReport> {
        ensure!(!candidates.is_empty(), "no valid candidate addresses");

        let total = candidates.len();
        info!("testing {total} candidate addresses");

        let connectivity = self.check_connectivity(&candidates).await;
        let reachable: Vec<Candidate> = connectivity
            .iter()
            .filter(|result| result.reachable)
            .map(|result| result.candidate)
            .collect();

        if reachable.is_empty() {
            info!("no working candidates found");
            return Ok(ProbeReport {
                records: Vec::new(),
                stats: report::statistics(total, &[]),
            });
        }

        info!(
            "found {} working candidates, enriching in batches",
            reachable.len()
        );
        let (geo, proxy, latency, traces) = self.enrich(reachable).await;

        let mut records = report::combine(&connectivity, geo, proxy, latency, traces, table);
        for record in &records {
            self.progress.record_combined(record);
        }
        report::rank(&mut records);
        let stats = report::statistics(total, &records);

        Ok(ProbeReport { records, stats })
    }

    async fn check_connectivity(&self, candidates: &[Candidate]) -> Vec<ConnectivityResult> {
        self.progress.stage_started("connectivity", candidates.len());
        let governor = Governor::new(self.config.http_concurrency);

        let probes = candidates.iter().map(|&candidate| {
            let governor = governor.clone();
            async move {
                let _slot = governor.admit().await;
                let result = self.connectivity.check(candidate).await;
                self.progress.connectivity_result(&result);
                result
            }
        });

        join_all(probes).await
    }

    async fn enrich(
        &self,
        reachable: Vec<Candidate>,
    ) -> (
        Vec<GeoResult>,
        Vec<ProxyResult>,
        Vec<LatencyResult>,
        Vec<EdgeTrace>,
    ) {
        self.progress.stage_started("enrichment", reachable.len());

        let batcher = Batcher::new(self.config.batch_size, self.config.batch_delay);
        let total_batches = batcher.batch_count(reachable.len());

        let geo_governor = Governor::new(self.config.geo_concurrency);
        let proxy_governor = Governor::new(self.config.proxy_concurrency);
        let latency_governor = Governor::new(self.config.latency_concurrency);
        let trace_governor = Governor::new(self.config.http_concurrency);

        let outputs = batcher
            .run(reachable, |index, batch| {
                self.progress
                    .batch_started(index + 1, total_batches, batch.len());

                let geo_governor = geo_governor.clone();
                let proxy_governor = proxy_governor.clone();
                let latency_governor = latency_governor.clone();
                let trace_governor = trace_governor.clone();

                async move {
                    let geo_batch = join_all(batch.iter().map(|&candidate| {
                        let governor = geo_governor.clone();
                        async move {
                            let _slot = governor.admit().await;
                            self.geo.lookup(candidate).await
                        }
                    }));
                    let proxy_batch = join_all(batch.iter().map(|&candidate| {
                        let governor = proxy_governor.clone();
                        async move {
                            let _slot = governor.admit().await;
                            self.proxy.check(candidate).await
                        }
                    }));
                    let latency_batch = join_all(batch.iter().map(|&candidate| {
                        let governor = latency_governor.clone();
                        async move {
                            let _slot = governor.admit().await;
                            self.latency.measure(candidate).await
                        }
                    }));
                    let trace_batch = join_all(batch.iter().map(|&candidate| {
                        let governor = trace_governor.clone();
                        async move {
                            let _slot = governor.admit().await;
                            self.trace.trace(candidate).await
                        }
                    }));

                    let (geo, proxy, latency, traces) =
                        tokio::join!(geo_batch, proxy_batch, latency_batch, trace_batch);

                    geo.into_iter()
                        .zip(proxy)
                        .zip(latency)
                        .zip(traces)
                        .map(|(((g, p), l), t)| (g, p, l, t))
                        .collect::<Vec<_>>()
                }
            })
            .await;

        let mut geo = Vec::with_capacity(outputs.len());
        let mut proxy = Vec::with_capacity(outputs.len());
        let mut latency = Vec::with_capacity(outputs.len());
        let mut traces = Vec::with_capacity(outputs.len());
        for (g, p, l, t) in outputs {
            geo.push(g);
            proxy.push(p);
            latency.push(l);
            traces.push(t);
        }
        (geo, proxy, latency, traces)
    }
}

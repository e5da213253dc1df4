//! The central **abstractions** for the probe classes.
//!
//! Each probe class gets its own seam so the pipeline can be driven with
//! fakes in tests and so each class carries its own governor. Every probe
//! is total: it returns a result (success or documented failure variant)
//! for every candidate and never propagates an error past this boundary.

use async_trait::async_trait;

use fronter_common::candidate::Candidate;
use fronter_common::record::{
    ConnectivityResult, EdgeTrace, GeoResult, LatencyResult, ProxyResult,
};

mod connectivity;
mod geo;
mod latency;
mod proxy;
mod trace;

pub use connectivity::HttpConnectivityProbe;
pub use geo::GeoLookupProbe;
pub use latency::IcmpLatencyProbe;
pub use proxy::ProxyCapabilityProbe;
pub use trace::EdgeTraceProbe;

/// Classifies a candidate as reachable or not via a forced-destination
/// HTTP request.
#[async_trait]
pub trait ConnectivityCheck: Send + Sync {
    async fn check(&self, candidate: Candidate) -> ConnectivityResult;
}

/// Resolves a candidate's geographic location through an external service.
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn lookup(&self, candidate: Candidate) -> GeoResult;
}

/// Checks whether a candidate is usable as a proxy, and from which
/// point of presence it answers.
#[async_trait]
pub trait ProxyCheck: Send + Sync {
    async fn check(&self, candidate: Candidate) -> ProxyResult;
}

/// Measures a candidate's round-trip latency.
#[async_trait]
pub trait LatencyMeasure: Send + Sync {
    async fn measure(&self, candidate: Candidate) -> LatencyResult;
}

/// Reads the point-of-presence code the endpoint itself reports over the
/// forced connection.
#[async_trait]
pub trait EdgeTraceLookup: Send + Sync {
    async fn trace(&self, candidate: Candidate) -> EdgeTrace;
}

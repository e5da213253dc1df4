//! Forced-destination HTTP connectivity probe.
//!
//! One HTTPS GET per candidate, with the domain's resolution overridden to
//! the candidate address for that connection only. The override lives in a
//! client owned by the single probe call, so concurrent probes can never
//! race on each other's binding. Certificate validation is intentionally
//! disabled.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use fronter_common::candidate::Candidate;
use fronter_common::config::Config;
use fronter_common::record::ConnectivityResult;

use super::ConnectivityCheck;

/// Characters of a successful body kept as the response snippet.
const SNIPPET_LEN: usize = 12;

pub struct HttpConnectivityProbe {
    domain: String,
    url: String,
    marker: String,
    timeout: Duration,
}

impl HttpConnectivityProbe {
    pub fn new(config: &Config) -> Self {
        Self {
            domain: config.domain.clone(),
            url: config.probe_url(),
            marker: config.marker.clone(),
            timeout: config.http_timeout,
        }
    }

    async fn fetch(&self, candidate: Candidate) -> anyhow::Result<(u16, String)> {
        let client = reqwest::Client::builder()
            .resolve(&self.domain, SocketAddr::new(candidate.addr(), 0))
            .danger_accept_invalid_certs(true)
            .timeout(self.timeout)
            .build()?;

        let response = client.get(&self.url).send().await?;
        let status: u16 = response.status().as_u16();
        let body: String = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl ConnectivityCheck for HttpConnectivityProbe {
    async fn check(&self, candidate: Candidate) -> ConnectivityResult {
        match self.fetch(candidate).await {
            Ok((200, body)) if body.contains(&self.marker) => {
                let snippet: String = body.chars().take(SNIPPET_LEN).collect();
                info!("reachable: {candidate} | status 200 | '{snippet}'");
                ConnectivityResult {
                    candidate,
                    reachable: true,
                    http_status: 200,
                    response_snippet: snippet,
                }
            }
            Ok((status, _)) => {
                warn!("unreachable: {candidate} | status {status}");
                ConnectivityResult::unreachable(candidate, status)
            }
            Err(e) => {
                debug!("unreachable: {candidate} | {e}");
                ConnectivityResult::unreachable(candidate, 0)
            }
        }
    }
}

//! Edge trace lookup.
//!
//! Fetches the endpoint's own trace path (`/cdn-cgi/trace`) over the same
//! forced-destination binding as the connectivity probe and extracts the
//! `colo` line. Used as a fallback source for the datacenter code when the
//! proxy-capability service does not report one.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use fronter_common::candidate::Candidate;
use fronter_common::config::Config;
use fronter_common::record::EdgeTrace;

use super::EdgeTraceLookup;

pub struct EdgeTraceProbe {
    domain: String,
    url: String,
    timeout: Duration,
}

impl EdgeTraceProbe {
    pub fn new(config: &Config) -> Self {
        Self {
            domain: config.domain.clone(),
            url: config.trace_url(),
            timeout: config.http_timeout,
        }
    }

    async fn fetch(&self, candidate: Candidate) -> anyhow::Result<String> {
        let client = reqwest::Client::builder()
            .resolve(&self.domain, SocketAddr::new(candidate.addr(), 0))
            .danger_accept_invalid_certs(true)
            .timeout(self.timeout)
            .build()?;

        let response = client.get(&self.url).send().await?;
        anyhow::ensure!(
            response.status().as_u16() == 200,
            "trace returned {}",
            response.status()
        );
        Ok(response.text().await?)
    }
}

#[async_trait]
impl EdgeTraceLookup for EdgeTraceProbe {
    async fn trace(&self, candidate: Candidate) -> EdgeTrace {
        match self.fetch(candidate).await {
            Ok(body) => EdgeTrace {
                candidate,
                colo: parse_colo(&body),
            },
            Err(e) => {
                debug!("edge trace {candidate}: {e}");
                EdgeTrace {
                    candidate,
                    colo: None,
                }
            }
        }
    }
}

/// Pulls the `colo` value out of a `key=value`-per-line trace body.
fn parse_colo(body: &str) -> Option<String> {
    body.lines()
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| *key == "colo")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

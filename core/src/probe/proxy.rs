//! Proxy-capability check.
//!
//! The capability service is loose about content types: JSON bodies arrive
//! declared as `text/plain`, and `application/json` responses are sometimes
//! not JSON at all. The body is therefore read as text and accepted as JSON
//! iff its first non-whitespace character opens an object, regardless of
//! the declared type. Any parse or network failure yields the all-sentinel
//! result.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use fronter_common::candidate::Candidate;
use fronter_common::config::Config;
use fronter_common::record::{ProxyResult, bounded_diagnostic};

use super::ProxyCheck;

pub struct ProxyCapabilityProbe {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ProxyResponse {
    #[serde(default)]
    success: bool,
    #[serde(rename = "portRemote", default = "unknown_port")]
    port_remote: i32,
    #[serde(default = "unknown_colo")]
    colo: String,
    #[serde(rename = "responseTime", default = "unknown_response_time")]
    response_time: f64,
}

fn unknown_port() -> i32 {
    -1
}

fn unknown_colo() -> String {
    "N/A".to_string()
}

fn unknown_response_time() -> f64 {
    -1.0
}

impl ProxyCapabilityProbe {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(config.http_timeout)
                .danger_accept_invalid_certs(true)
                .build()?,
            endpoint: config.proxy_endpoint.clone(),
        })
    }
}

#[async_trait]
impl ProxyCheck for ProxyCapabilityProbe {
    async fn check(&self, candidate: Candidate) -> ProxyResult {
        let url: String = self.endpoint.replace("{ip}", &candidate.bracketed());

        let body = match self.client.get(&url).send().await {
            Ok(response) => match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("proxy check {candidate}: failed reading body: {e}");
                    return ProxyResult::unavailable(candidate);
                }
            },
            Err(e) => {
                warn!("proxy check {candidate}: {e}");
                return ProxyResult::unavailable(candidate);
            }
        };

        parse_payload(candidate, &body)
    }
}

/// Classifies a response body, JSON-object-shaped or not.
fn parse_payload(candidate: Candidate, body: &str) -> ProxyResult {
    let trimmed = body.trim_start();
    if !trimmed.starts_with('{') {
        warn!(
            "proxy check {candidate}: non-JSON response: {}",
            bounded_diagnostic(trimmed)
        );
        return ProxyResult::unavailable(candidate);
    }

    match serde_json::from_str::<ProxyResponse>(trimmed) {
        Ok(parsed) => ProxyResult {
            candidate,
            available: parsed.success,
            port: parsed.port_remote,
            datacenter_code: parsed.colo,
            response_time_ms: parsed.response_time,
        },
        Err(e) => {
            warn!("proxy check {candidate}: JSON decode error: {e}");
            ProxyResult::unavailable(candidate)
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> Candidate {
        "1.1.1.1".parse().unwrap()
    }

    #[test]
    fn json_body_parses_regardless_of_declared_type() {
        // What a text/plain response from the service actually carries.
        let body = r#"{"success":true,"portRemote":443,"colo":"HKG","responseTime":12}"#;
        let result = parse_payload(candidate(), body);

        assert!(result.available);
        assert_eq!(result.port, 443);
        assert_eq!(result.datacenter_code, "HKG");
        assert_eq!(result.response_time_ms, 12.0);
    }

    #[test]
    fn malformed_json_yields_sentinels() {
        let result = parse_payload(candidate(), r#"{"success":true,"portRemote":"#);

        assert!(!result.available);
        assert_eq!(result.port, -1);
        assert_eq!(result.datacenter_code, "N/A");
        assert_eq!(result.response_time_ms, -1.0);
    }

    #[test]
    fn non_json_body_yields_sentinels() {
        let result = parse_payload(candidate(), "error: upstream unavailable");
        assert_eq!(result, ProxyResult::unavailable(candidate()));
    }

    #[test]
    fn leading_whitespace_is_ignored() {
        let body = "\n  {\"success\":false,\"colo\":\"SIN\"}";
        let result = parse_payload(candidate(), body);

        assert!(!result.available);
        assert_eq!(result.datacenter_code, "SIN");
        // Fields the body omits fall back to their sentinels.
        assert_eq!(result.port, -1);
        assert_eq!(result.response_time_ms, -1.0);
    }
}

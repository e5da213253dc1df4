//! Geolocation lookup.
//!
//! Queries a geolocation HTTP API keyed by candidate address. The service
//! reports a `status` field in the body; anything but `success` is a
//! logical failure and its `message` travels in the result.

use async_trait::async_trait;
use serde::Deserialize;

use fronter_common::candidate::Candidate;
use fronter_common::config::Config;
use fronter_common::record::{GeoOutcome, GeoResult, UNKNOWN_FIELD};

use super::GeoLookup;

pub struct GeoLookupProbe {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(rename = "regionName", default)]
    region_name: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    isp: Option<String>,
}

impl GeoLookupProbe {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(config.http_timeout)
                .build()?,
            endpoint: config.geo_endpoint.clone(),
        })
    }

    #[cfg(test)]
    fn with_endpoint(endpoint: String, timeout: std::time::Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("client construction"),
            endpoint,
        }
    }

    async fn query(&self, candidate: Candidate) -> anyhow::Result<GeoResponse> {
        let url: String = self.endpoint.replace("{ip}", &candidate.to_string());
        let response = self.client.get(&url).send().await?;
        Ok(response.json::<GeoResponse>().await?)
    }
}

#[async_trait]
impl GeoLookup for GeoLookupProbe {
    async fn lookup(&self, candidate: Candidate) -> GeoResult {
        match self.query(candidate).await {
            Ok(body) if body.status == "success" => GeoResult {
                candidate,
                outcome: GeoOutcome::Known {
                    country: body.country.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
                    region: body.region_name.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
                    city: body.city.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
                    isp: body.isp.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
                },
            },
            Ok(body) => GeoResult::failed(
                candidate,
                body.message.as_deref().unwrap_or("unknown error"),
            ),
            Err(e) => GeoResult::failed(candidate, e.to_string()),
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

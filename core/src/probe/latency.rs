//! ICMP round-trip measurement.
//!
//! Sends a small number of echoes per candidate and averages the ones
//! that came back. The ICMP client is async-native, so echoes multiplex
//! on the event loop like every other probe; a per-echo timeout bounds
//! each attempt. Requires a raw/ICMP socket capability; without it every
//! echo fails and the candidate reports as unmeasured.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use fronter_common::candidate::Candidate;
use fronter_common::config::Config;
use fronter_common::record::LatencyResult;

use super::LatencyMeasure;

const ECHO_PAYLOAD: [u8; 56] = [0; 56];

pub struct IcmpLatencyProbe {
    count: usize,
    echo_timeout: Duration,
}

impl IcmpLatencyProbe {
    pub fn new(config: &Config) -> Self {
        Self {
            count: config.ping_count.max(1),
            echo_timeout: config.ping_timeout,
        }
    }
}

#[async_trait]
impl LatencyMeasure for IcmpLatencyProbe {
    async fn measure(&self, candidate: Candidate) -> LatencyResult {
        let mut round_trips: Vec<f64> = Vec::with_capacity(self.count);

        for _ in 0..self.count {
            let echo = surge_ping::ping(candidate.addr(), &ECHO_PAYLOAD);
            match tokio::time::timeout(self.echo_timeout, echo).await {
                Ok(Ok((_reply, rtt))) => round_trips.push(rtt.as_secs_f64() * 1000.0),
                Ok(Err(e)) => debug!("echo to {candidate} failed: {e}"),
                Err(_) => debug!("echo to {candidate} timed out"),
            }
        }

        LatencyResult {
            candidate,
            avg_ms: average_round_trips(&round_trips),
        }
    }
}

/// Mean of the successful round trips, rounded to 2 decimal places;
/// infinite when nothing came back.
fn average_round_trips(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return f64::INFINITY;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    (mean * 100.0).round() / 100.0
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

    #[test]
    fn averages_only_successful_round_trips() {
        // Four echoes, one lost: the mean covers the three replies.
        assert_eq!(average_round_trips(&[10.0, 20.0, 30.0]), 20.0);
    }

    #[test]
    fn zero_replies_means_unmeasured() {
        assert_eq!(average_round_trips(&[]), f64::INFINITY);
    }

    #[test]
    fn mean_is_rounded_to_two_decimals() {
        assert_eq!(average_round_trips(&[10.0, 20.0, 30.5]), 20.17);
        assert_eq!(average_round_trips(&[0.333, 0.333, 0.333]), 0.33);
    }

    #[tokio::test]
    #[ignore]
    async fn loopback_echo_measures_finite_latency() {
        let probe = IcmpLatencyProbe {
            count: 3,
            echo_timeout: Duration::from_secs(2),
        };
        let candidate: Candidate = "127.0.0.1".parse().unwrap();
        let result = probe.measure(candidate).await;
        assert!(result.avg_ms.is_finite());
    }
}

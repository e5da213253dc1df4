//! # Candidate Input Model
//!
//! Parses the address list a run is fed with.
//!
//! Each input line can be:
//! * A single IP address (IPv4 or IPv6).
//! * A CIDR block (e.g., `192.168.1.0/24`), expanded up to a size cap.
//!
//! Expansion, capping and deduplication all happen here, before the core
//! pipeline ever sees an address.

use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnetwork::IpNetwork;
use thiserror::Error;
use tracing::warn;

/// An address under evaluation as a possible front for the target domain.
///
/// Identity is the normalized address; duplicates collapse regardless of
/// how the input spelled them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Candidate(IpAddr);

impl Candidate {
    pub fn new(addr: IpAddr) -> Self {
        Self(addr)
    }

    pub fn addr(&self) -> IpAddr {
        self.0
    }

    pub fn is_ipv6(&self) -> bool {
        self.0.is_ipv6()
    }

    /// URL-safe rendering: IPv6 addresses are bracketed.
    pub fn bracketed(&self) -> String {
        match self.0 {
            IpAddr::V4(addr) => addr.to_string(),
            IpAddr::V6(addr) => format!("[{addr}]"),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Candidate {
    type Err = CandidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<IpAddr>()
            .map(Candidate)
            .map_err(|_| CandidateError::Invalid(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CandidateError {
    #[error("invalid address or network: {0}")]
    Invalid(String),
    #[error("{network} expands to {size} addresses (cap is {cap})")]
    NetworkTooLarge {
        network: String,
        size: u128,
        cap: usize,
    },
}

/// Parses one input line into its candidate addresses.
///
/// A bare address yields one candidate; a CIDR block yields its host
/// addresses, provided the block stays within `max_network_size` total
/// addresses. IPv4 network and broadcast addresses are excluded for
/// prefixes shorter than /31.
pub fn parse_line(line: &str, max_network_size: usize) -> Result<Vec<Candidate>, CandidateError> {
    let line = line.trim();

    if !line.contains('/') {
        return line.parse::<Candidate>().map(|c| vec![c]);
    }

    let network: IpNetwork = line
        .parse()
        .map_err(|_| CandidateError::Invalid(line.to_string()))?;

    let size: u128 = match network {
        IpNetwork::V4(net) => u128::from(net.size()),
        IpNetwork::V6(net) => net.size(),
    };
    if size > max_network_size as u128 {
        return Err(CandidateError::NetworkTooLarge {
            network: line.to_string(),
            size,
            cap: max_network_size,
        });
    }

    let candidates: Vec<Candidate> = match network {
        IpNetwork::V4(net) => {
            let network_addr = net.network();
            let broadcast_addr = net.broadcast();
            net.iter()
                .filter(|addr| {
                    net.prefix() >= 31 || (*addr != network_addr && *addr != broadcast_addr)
                })
                .map(|addr| Candidate::new(IpAddr::V4(addr)))
                .collect()
        }
        IpNetwork::V6(net) => net
            .iter()
            .map(|addr| Candidate::new(IpAddr::V6(addr)))
            .collect(),
    };

    Ok(candidates)
}

/// Parses a whole input into a deduplicated, order-preserving candidate list.
///
/// Blank lines are skipped; unparseable or oversized lines are logged and
/// skipped rather than failing the run.
pub fn collect_candidates<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    max_network_size: usize,
) -> Vec<Candidate> {
    let mut seen: HashSet<Candidate> = HashSet::new();
    let mut candidates: Vec<Candidate> = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line, max_network_size) {
            Ok(parsed) => {
                for candidate in parsed {
                    if seen.insert(candidate) {
                        candidates.push(candidate);
                    }
                }
            }
            Err(e) => warn!("skipping input line: {e}"),
        }
    }

    candidates
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
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn parses_single_addresses() {
        assert_eq!(
            parse_line("1.1.1.1", 256),
            Ok(vec![Candidate::new(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)))])
        );
        assert_eq!(
            parse_line("2606:4700::1", 256),
            Ok(vec![Candidate::new(IpAddr::V6(
                "2606:4700::1".parse::<Ipv6Addr>().unwrap()
            ))])
        );
        assert_eq!(
            parse_line("not-an-ip", 256),
            Err(CandidateError::Invalid("not-an-ip".to_string()))
        );
    }

    #[test]
    fn expands_cidr_hosts_only() {
        // A /30 holds 4 addresses; network and broadcast are excluded.
        let hosts = parse_line("10.0.0.0/30", 256).unwrap();
        assert_eq!(
            hosts,
            vec![
                Candidate::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))),
                Candidate::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))),
            ]
        );

        // /31 and /32 keep every address.
        assert_eq!(parse_line("10.0.0.0/31", 256).unwrap().len(), 2);
        assert_eq!(parse_line("10.0.0.1/32", 256).unwrap().len(), 1);
    }

    #[test]
    fn expands_ipv6_networks() {
        let hosts = parse_line("2001:db8::/126", 256).unwrap();
        assert_eq!(hosts.len(), 4);
        assert!(hosts.iter().all(Candidate::is_ipv6));
    }

    #[test]
    fn rejects_oversized_networks() {
        // A /24 (256 addresses) sits exactly on the default cap.
        assert!(parse_line("10.0.0.0/24", 256).is_ok());

        let err = parse_line("10.0.0.0/16", 256).unwrap_err();
        assert!(matches!(
            err,
            CandidateError::NetworkTooLarge { size: 65536, .. }
        ));
    }

    #[test]
    fn collect_deduplicates_preserving_order() {
        let input = "1.1.1.1\n\n10.0.0.0/30\n1.1.1.1\n10.0.0.1\nbogus\n";
        let candidates = collect_candidates(input.lines(), 256);

        let rendered: Vec<String> = candidates.iter().map(Candidate::to_string).collect();
        assert_eq!(rendered, vec!["1.1.1.1", "10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn bracketed_rendering() {
        let v4: Candidate = "1.2.3.4".parse().unwrap();
        let v6: Candidate = "2606:4700::1".parse().unwrap();
        assert_eq!(v4.bracketed(), "1.2.3.4");
        assert_eq!(v6.bracketed(), "[2606:4700::1]");
    }
}

//! Datacenter code → display name table.
//!
//! The proxy-capability service reports a short point-of-presence code
//! (e.g. `HKG`, sometimes `HKG (Hong Kong)`). A JSON mapping file turns
//! those into display names; lookups fall back through progressively
//! looser matches and finally pass the code through unchanged.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{info, warn};

pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Default, Clone)]
pub struct DatacenterTable {
    mapping: HashMap<String, String>,
}

impl DatacenterTable {
    pub fn new(mapping: HashMap<String, String>) -> Self {
        Self { mapping }
    }

    /// Loads the table from a JSON object file.
    ///
    /// A missing or unreadable file is not fatal: the run proceeds with an
    /// empty table and codes pass through unresolved.
    pub fn load(path: &Path) -> Self {
        let mapping = match File::open(path) {
            Ok(file) => match serde_json::from_reader(BufReader::new(file)) {
                Ok(mapping) => mapping,
                Err(e) => {
                    warn!("failed to parse datacenter mapping {}: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(_) => {
                warn!(
                    "datacenter mapping {} not found, codes will pass through",
                    path.display()
                );
                HashMap::new()
            }
        };

        if !mapping.is_empty() {
            info!("loaded {} datacenter code mappings", mapping.len());
        }

        Self { mapping }
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Resolves a code to its display name.
    ///
    /// Match order: the exact code, the code stripped of any parenthetical
    /// suffix, the parenthetical content itself. An unmatched code is
    /// returned unchanged; an absent code resolves to [`UNKNOWN_NAME`].
    pub fn display_name(&self, code: &str) -> String {
        if code.is_empty() || code == "N/A" {
            return UNKNOWN_NAME.to_string();
        }

        if let Some(name) = self.mapping.get(code) {
            return name.clone();
        }

        let stripped = code
            .split(' ')
            .next()
            .unwrap_or(code)
            .split('(')
            .next()
            .unwrap_or(code);
        if let Some(name) = self.mapping.get(stripped) {
            return name.clone();
        }

        if let Some((_, rest)) = code.split_once('(')
            && let Some((inner, _)) = rest.split_once(')')
            && let Some(name) = self.mapping.get(inner)
        {
            return name.clone();
        }

        code.to_string()
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

//! CSV persistence for the ranked dataset.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;

use fronter_common::record::CombinedRecord;
use fronter_common::sink::ResultSink;

const FIELDS: [&str; 14] = [
    "candidate",
    "status",
    "response_snippet",
    "country",
    "region",
    "city",
    "isp",
    "latency_ms",
    "proxy_available",
    "proxy_port",
    "datacenter_code",
    "datacenter_name",
    "proxy_response_time_ms",
    "checked_at",
];

pub struct CsvSink {
    writer: Writer<BufWriter<File>>,
}

impl CsvSink {
    pub fn create(path: &Path) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        Ok(Self {
            writer: Writer::from_writer(BufWriter::new(file)),
        })
    }
}

impl ResultSink for CsvSink {
    fn persist(&mut self, records: &[CombinedRecord]) -> Result<()> {
        self.writer.write_record(FIELDS)?;

        let checked_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        for record in records {
            self.writer.write_record([
                record.candidate.to_string(),
                record.http_status.to_string(),
                record.response_snippet.clone(),
                record.country.clone(),
                record.region.clone(),
                record.city.clone(),
                record.isp.clone(),
                format_latency(record.avg_latency_ms),
                record.proxy_available.to_string(),
                record.proxy_port.to_string(),
                record.datacenter_code.clone(),
                record.datacenter_name.clone(),
                record.proxy_response_time_ms.to_string(),
                checked_at.clone(),
            ])?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

/// Default output path, one fresh file per run.
pub fn timestamped_path() -> PathBuf {
    PathBuf::from(format!(
        "working_ips_{}.csv",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

fn format_latency(ms: f64) -> String {
    if ms.is_finite() {
        format!("{ms:.2}")
    } else {
        "inf".to_string()
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

    #[test]
    fn unmeasured_latency_serializes_as_inf() {
        assert_eq!(format_latency(f64::INFINITY), "inf");
        assert_eq!(format_latency(42.345), "42.35");
    }

    #[test]
    fn default_path_is_timestamped() {
        let path = timestamped_path();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("working_ips_"));
        assert!(name.ends_with(".csv"));
    }
}

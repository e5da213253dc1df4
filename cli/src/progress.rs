//! Console progress reporting for a running probe.
//!
//! The connectivity sweep drives an indicatif counter; everything after it
//! reports through ordinary log lines.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use fronter_common::record::{CombinedRecord, ConnectivityResult};
use fronter_common::sink::ProgressSink;

pub struct ConsoleProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn stage_started(&self, stage: &str, candidates: usize) {
        if stage == "connectivity" {
            let bar = ProgressBar::new(candidates as u64);
            let style = ProgressStyle::with_template("{spinner:.blue} {pos}/{len} probed {msg}")
                .unwrap()
                .tick_strings(&["▁▁▁", "▁▂▁", "▂▄▂", "▄▆▄", "▂▄▂", "▁▂▁"]);
            bar.set_style(style);
            *self.bar.lock().unwrap() = Some(bar);
        } else {
            self.finish();
            info!("enriching {candidates} reachable candidates");
        }
    }

    fn connectivity_result(&self, result: &ConnectivityResult) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.inc(1);
            if result.reachable {
                bar.set_message(format!("(last hit: {})", result.candidate));
            }
        }
    }

    fn batch_started(&self, index: usize, total: usize, size: usize) {
        info!("processing batch {index}/{total} ({size} addresses)");
    }

    fn record_combined(&self, record: &CombinedRecord) {
        let latency = if record.avg_latency_ms.is_finite() {
            format!("{:.2} ms", record.avg_latency_ms)
        } else {
            "unmeasured".to_string()
        };
        let proxy = if record.proxy_available {
            format!("yes (port {})", record.proxy_port)
        } else {
            "no".to_string()
        };

        info!(
            "{} | {}, {}, {} | colo: {} | latency: {} | proxy: {}",
            record.candidate,
            record.country,
            record.region,
            record.city,
            record.datacenter_name,
            latency,
            proxy,
        );
    }
}

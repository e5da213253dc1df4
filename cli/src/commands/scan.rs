use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, ensure};
use colored::*;
use tracing::info;

use fronter_common::candidate::{self, Candidate};
use fronter_common::config::Config;
use fronter_common::datacenter::DatacenterTable;
use fronter_common::record::RunStats;
use fronter_common::sink::ResultSink;
use fronter_core::pipeline::Pipeline;

use crate::commands::ScanArgs;
use crate::output::{self, CsvSink};
use crate::progress::ConsoleProgress;
use crate::terminal::print;

pub async fn scan(args: ScanArgs) -> anyhow::Result<()> {
    let config = build_config(&args);

    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("reading candidate list {}", args.input.display()))?;
    let candidates: Vec<Candidate> =
        candidate::collect_candidates(input.lines(), config.max_network_size);
    ensure!(
        !candidates.is_empty(),
        "no valid addresses in {}",
        args.input.display()
    );
    info!("{} candidate addresses parsed", candidates.len());

    let table = DatacenterTable::load(&args.datacenters);

    let progress = Arc::new(ConsoleProgress::new());
    let pipeline = Pipeline::new(config, progress.clone())?;

    let start_time: Instant = Instant::now();
    let report = pipeline.run(candidates, &table).await?;
    progress.finish();

    print_summary(&report.stats, start_time.elapsed());

    if report.records.is_empty() {
        info!("nothing to persist");
        return Ok(());
    }

    let path = args.output.clone().unwrap_or_else(output::timestamped_path);
    let mut sink = CsvSink::create(&path)?;
    sink.persist(&report.records)?;
    info!("results saved to {}", path.display());

    Ok(())
}

fn build_config(args: &ScanArgs) -> Config {
    let mut config = Config::for_domain(&args.domain);
    config.marker = args.marker.clone();
    config.http_concurrency = args.concurrency;
    config.batch_size = args.batch_size;
    config.batch_delay = Duration::from_secs(args.batch_delay);
    config.http_timeout = Duration::from_secs(args.timeout);
    config.ping_count = args.ping_count;
    if let Some(endpoint) = &args.geo_endpoint {
        config.geo_endpoint = endpoint.clone();
    }
    if let Some(endpoint) = &args.proxy_endpoint {
        config.proxy_endpoint = endpoint.clone();
    }
    config
}

fn print_summary(stats: &RunStats, total_time: Duration) {
    info!("total candidates tested: {}", stats.total_tested);
    info!(
        "working candidates: {} ({:.2}%)",
        stats.reachable, stats.success_rate
    );
    if let Some(avg) = stats.avg_latency_ms {
        info!("average latency: {avg:.2} ms");
    }
    if stats.proxies_available > 0 {
        info!("available proxies: {}", stats.proxies_available);
        if let Some(avg) = stats.avg_proxy_response_ms {
            info!("average proxy response time: {avg:.2} ms");
        }
    }

    let reachable: ColoredString = format!("{} working addresses", stats.reachable)
        .bold()
        .green();
    let elapsed: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Probe complete: {reachable} identified in {elapsed}");

    print::fat_separator();
    print::centerln(&output);
}

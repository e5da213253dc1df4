use std::fs;

use anyhow::{Context, ensure};
use tracing::info;

use fronter_common::candidate::{self, Candidate};

use crate::commands::ExpandArgs;

/// Dry run of the candidate source: parse, expand, dedup, print.
pub fn expand(args: ExpandArgs) -> anyhow::Result<()> {
    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("reading candidate list {}", args.input.display()))?;

    let candidates: Vec<Candidate> =
        candidate::collect_candidates(input.lines(), args.max_network_size);
    ensure!(
        !candidates.is_empty(),
        "no valid addresses in {}",
        args.input.display()
    );

    for candidate in &candidates {
        println!("{candidate}");
    }
    info!("{} candidate addresses", candidates.len());

    Ok(())
}

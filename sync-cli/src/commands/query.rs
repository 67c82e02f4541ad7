//! Replay a trace silently and print the states of a few paths.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use synctrack_core::{StatusTree, SyncState};

use super::replay::apply_events;
use crate::config::Config;
use crate::trace;

/// Run the query command.
///
/// Harvests still happen at the configured cadence, so paths that became
/// terminal before the last harvest report `NotFound`.
pub async fn run<W: Write>(
    trace_path: &Path,
    paths: &[String],
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let events = trace::read(trace_path).await?;

    let mut tree = StatusTree::new();
    let harvests = apply_events(&mut tree, &events, config.replay.harvest_every);
    tracing::debug!("Discarded {} harvests", harvests.len());

    for state in query(&tree, paths) {
        let json = if config.replay.pretty {
            state.to_json_pretty()
        } else {
            state.to_json()
        }
        .with_context(|| format!("Failed to serialize state of {}", state.path))?;
        writeln!(out, "{json}").context("Failed to write output")?;
    }
    Ok(())
}

fn query(tree: &StatusTree, paths: &[String]) -> Vec<SyncState> {
    paths.iter().map(|path| tree.get_sync_state(path)).collect()
}

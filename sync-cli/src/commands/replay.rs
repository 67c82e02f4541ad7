//! Replay a trace and print harvested changes.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use synctrack_core::{StatusTree, SyncEvent, SyncState};

use crate::config::Config;
use crate::trace;

/// One drained batch of changes.
#[derive(Debug, Serialize)]
pub struct HarvestRecord {
    /// 1-based harvest number.
    pub harvest: usize,
    /// Number of events applied before this harvest.
    pub after_event: usize,
    /// States that changed since the previous harvest.
    pub changes: Vec<SyncState>,
}

/// What is left once the trace is exhausted.
#[derive(Debug, Serialize)]
pub struct Summary {
    /// Files still tracked.
    pub file_count: usize,
    /// States of the queried paths, in query order.
    pub states: Vec<SyncState>,
}

/// Apply `events` to `tree`, harvesting after every `harvest_every`
/// events. `0` never harvests.
///
/// Empty harvests are not recorded but still count towards numbering.
pub fn apply_events(
    tree: &mut StatusTree,
    events: &[SyncEvent],
    harvest_every: usize,
) -> Vec<HarvestRecord> {
    let mut records = Vec::new();
    let mut harvests = 0;

    for (index, event) in events.iter().enumerate() {
        tree.apply(event);

        let applied = index + 1;
        if harvest_every > 0 && applied % harvest_every == 0 {
            harvests += 1;
            let changes = tree.get_changes_and_clean();
            if !changes.is_empty() {
                records.push(HarvestRecord {
                    harvest: harvests,
                    after_event: applied,
                    changes,
                });
            }
        }
    }

    if let Some(last) = records.last() {
        tracing::debug!("{} harvests, last after event {}", harvests, last.after_event);
    }
    records
}

/// Replay `events` then drain whatever changed since the last periodic
/// harvest.
pub fn replay(
    events: &[SyncEvent],
    harvest_every: usize,
    queries: &[String],
) -> (Vec<HarvestRecord>, Summary) {
    let mut tree = StatusTree::new();
    let mut records = apply_events(&mut tree, events, harvest_every);

    let changes = tree.get_changes_and_clean();
    if !changes.is_empty() {
        let harvest = match harvest_every {
            0 => 1,
            n => events.len() / n + 1,
        };
        records.push(HarvestRecord {
            harvest,
            after_event: events.len(),
            changes,
        });
    }

    let summary = Summary {
        file_count: tree.get_file_count(),
        states: queries.iter().map(|path| tree.get_sync_state(path)).collect(),
    };
    (records, summary)
}

/// Serialize one output record.
fn write_record<W: Write, T: Serialize>(
    out: &mut W,
    record: &T,
    pretty: bool,
) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(record)
    } else {
        serde_json::to_string(record)
    }
    .context("Failed to serialize output")?;
    writeln!(out, "{json}").context("Failed to write output")?;
    Ok(())
}

/// Run the replay command.
pub async fn run<W: Write>(
    trace_path: &Path,
    harvest_every: Option<usize>,
    queries: &[String],
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let events = trace::read(trace_path).await?;
    let harvest_every = harvest_every.unwrap_or(config.replay.harvest_every);

    let (records, summary) = replay(&events, harvest_every, queries);
    for record in &records {
        write_record(out, record, config.replay.pretty)?;
    }
    write_record(out, &summary, config.replay.pretty)?;

    tracing::info!(
        "Replayed {} events into {} harvests, {} files still tracked",
        events.len(),
        records.len(),
        summary.file_count
    );
    Ok(())
}

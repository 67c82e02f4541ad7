//! Reading recorded event traces.
//!
//! A trace is a JSON-lines file with one [`SyncEvent`] per line. Blank
//! lines and lines starting with `#` are skipped.

use anyhow::{Context, Result};
use std::path::Path;
use synctrack_types::SyncEvent;

/// Read and parse the trace at `path`.
pub async fn read(path: &Path) -> Result<Vec<SyncEvent>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read trace {}", path.display()))?;
    let events = parse(&contents).with_context(|| format!("Invalid trace {}", path.display()))?;

    tracing::debug!("Read {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Parse trace contents. Errors name the 1-based line number.
pub fn parse(contents: &str) -> Result<Vec<SyncEvent>> {
    let mut events = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = SyncEvent::from_json(line)
            .with_context(|| format!("line {}: not a sync event", index + 1))?;
        events.push(event);
    }
    Ok(events)
}

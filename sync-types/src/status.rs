//! Sync status reported per tracked path.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// Sync status of a path.
///
/// Folders never carry a status of their own; theirs is rolled up from
/// their children using [`SyncStatus::precedence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// The path is not in the tracker. Never stored.
    NotFound,
    /// Waiting to be transferred.
    Queued,
    /// Transfer running.
    InProgress,
    /// Transfer finished.
    Completed,
    /// Transfer failed.
    Error,
    /// The item that lived here was re-pointed to another path.
    Moved,
}

impl SyncStatus {
    /// Rank used when rolling children up into a folder status.
    ///
    /// `Error > InProgress > Queued > Completed > Moved > NotFound`.
    pub fn precedence(&self) -> u8 {
        match self {
            SyncStatus::NotFound => 0,
            SyncStatus::Moved => 1,
            SyncStatus::Completed => 2,
            SyncStatus::Queued => 3,
            SyncStatus::InProgress => 4,
            SyncStatus::Error => 5,
        }
    }

    /// Whether nothing more is expected to happen at this path.
    ///
    /// Terminal nodes are removed by the next harvest.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncStatus::Completed | SyncStatus::Moved)
    }

    /// Short lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::NotFound => "not_found",
            SyncStatus::Queued => "queued",
            SyncStatus::InProgress => "in_progress",
            SyncStatus::Completed => "completed",
            SyncStatus::Error => "error",
            SyncStatus::Moved => "moved",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The externally visible state of one path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    /// Own status for a file, rolled-up status for a folder.
    pub status: SyncStatus,
    /// Fraction of bytes transferred, in `[0, 1]`.
    pub progress: f32,
    /// Path this state belongs to.
    pub path: String,
}

impl SyncState {
    /// Create a new state.
    pub fn new(status: SyncStatus, progress: f32, path: impl Into<String>) -> Self {
        Self {
            status,
            progress,
            path: path.into(),
        }
    }

    /// State reported for a path the tracker does not know.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(SyncStatus::NotFound, 0.0, path)
    }

    /// Serialize to a single-line JSON string.
    pub fn to_json(&self) -> Result<String, TypesError> {
        serde_json::to_string(self).map_err(TypesError::Serialization)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, TypesError> {
        serde_json::to_string_pretty(self).map_err(TypesError::Serialization)
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({:.1}%)",
            self.path,
            self.status,
            self.progress * 100.0
        )
    }
}

//! Reports sent by the sync engine to the tracker.
//!
//! Each variant maps one-to-one onto a tracker mutator. Events are plain
//! data so they can be queued, logged, or replayed from a trace file.

use serde::{Deserialize, Serialize};

use crate::{ItemId, TypesError};

/// A single sync progress report for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncEvent {
    /// The item is waiting to be transferred.
    Queued {
        /// Item identity.
        id: ItemId,
        /// Current path of the item.
        path: String,
        /// Size of the item in bytes.
        total_bytes: u64,
    },
    /// The item is being transferred.
    InProgress {
        /// Item identity.
        id: ItemId,
        /// Current path of the item.
        path: String,
        /// Bytes transferred so far.
        transferred_bytes: u64,
        /// Size of the item in bytes.
        total_bytes: u64,
    },
    /// The item finished transferring.
    Completed {
        /// Item identity.
        id: ItemId,
        /// Path of the finished item.
        path: String,
    },
    /// The item failed to transfer.
    Error {
        /// Item identity.
        id: ItemId,
        /// Current path of the item.
        path: String,
    },
}

impl SyncEvent {
    /// Identity of the item this event is about.
    pub fn id(&self) -> ItemId {
        match self {
            SyncEvent::Queued { id, .. }
            | SyncEvent::InProgress { id, .. }
            | SyncEvent::Completed { id, .. }
            | SyncEvent::Error { id, .. } => *id,
        }
    }

    /// Path this event is about.
    pub fn path(&self) -> &str {
        match self {
            SyncEvent::Queued { path, .. }
            | SyncEvent::InProgress { path, .. }
            | SyncEvent::Completed { path, .. }
            | SyncEvent::Error { path, .. } => path,
        }
    }

    /// Serialize to a single-line JSON string.
    pub fn to_json(&self) -> Result<String, TypesError> {
        serde_json::to_string(self).map_err(TypesError::Serialization)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, TypesError> {
        serde_json::from_str(json).map_err(TypesError::Deserialization)
    }
}

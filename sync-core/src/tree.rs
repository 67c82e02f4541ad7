//! Hierarchical sync status tree.
//!
//! The tree holds one leaf per file the sync engine reports on, plus the
//! folders leading to it. Folder states are rolled up from their children
//! on every mutation:
//! - progress is the sum of credited bytes over the sum of total bytes
//! - status follows `Error > InProgress > Queued > Completed > Moved`
//!
//! A consumer polls [`StatusTree::get_changes_and_clean`] to receive only
//! the paths whose state changed since the last poll. The same call drops
//! every node whose work is over (completed or moved away), so terminal
//! states are seen exactly once before the path reports `NotFound`.
//!
//! Files are keyed by a caller-assigned [`ItemId`]. Reporting a known id at
//! a new path is a rename: the old path turns `Moved` until the next poll.

use std::collections::HashMap;

use synctrack_types::{ItemId, SyncEvent, SyncState, SyncStatus};

use crate::node::{Leaf, Node};
use crate::path::TreePath;

/// Outcome of checking whether a file may be placed at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Allowed,
    /// The path is a folder; folder states are derived, never set.
    Folder,
    /// The path runs through a tracked file.
    UnderFile,
}

/// Live sync status of a file tree.
///
/// Single-threaded and synchronous: every call runs to completion and no
/// call fails or panics on its input. Malformed paths and calls that make
/// no sense for the current tree are ignored. Callers sharing a tree
/// across threads wrap the whole tree in one lock.
#[derive(Debug, Default)]
pub struct StatusTree {
    root: Node,
    /// Where each tracked item currently lives. Not an owner of nodes.
    index: HashMap<ItemId, TreePath>,
}

impl StatusTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that `id` at `path` is waiting to be transferred.
    pub fn set_queued(&mut self, id: ItemId, path: &str, total_bytes: u64) {
        self.place(id, path, "set_queued", SyncStatus::Queued, 0, Some(total_bytes));
    }

    /// Report transfer progress of `id` at `path`.
    ///
    /// `transferred_bytes` is clamped to `total_bytes`.
    pub fn set_in_progress(
        &mut self,
        id: ItemId,
        path: &str,
        transferred_bytes: u64,
        total_bytes: u64,
    ) {
        self.place(
            id,
            path,
            "set_in_progress",
            SyncStatus::InProgress,
            transferred_bytes.min(total_bytes),
            Some(total_bytes),
        );
    }

    /// Report that the file at `path` finished syncing.
    ///
    /// Only a file currently tracked at `path` can complete. Folders,
    /// moved paths and unknown paths are left alone.
    pub fn set_completed(&mut self, id: ItemId, path: &str) {
        let Some(path) = Self::parse(path, "set_completed") else {
            return;
        };

        let completed = self.root.update_leaf(path.segments(), |leaf| {
            if leaf.status == SyncStatus::Moved || leaf.status == SyncStatus::Completed {
                return false;
            }
            leaf.status = SyncStatus::Completed;
            leaf.transferred_bytes = leaf.total_bytes;
            true
        });

        if !completed {
            tracing::debug!(
                "Ignoring set_completed for {:?} at {}: no tracked file there",
                id,
                path
            );
        }
    }

    /// Report that `id` at `path` failed to sync.
    ///
    /// The file keeps its known size so folders still count it as work to
    /// do, but it no longer contributes transferred bytes.
    pub fn set_error(&mut self, id: ItemId, path: &str) {
        self.place(id, path, "set_error", SyncStatus::Error, 0, None);
    }

    /// Apply one event from the sync engine.
    pub fn apply(&mut self, event: &SyncEvent) {
        tracing::trace!("Applying event for {:?} at {}", event.id(), event.path());
        match event {
            SyncEvent::Queued {
                id,
                path,
                total_bytes,
            } => self.set_queued(*id, path, *total_bytes),
            SyncEvent::InProgress {
                id,
                path,
                transferred_bytes,
                total_bytes,
            } => self.set_in_progress(*id, path, *transferred_bytes, *total_bytes),
            SyncEvent::Completed { id, path } => self.set_completed(*id, path),
            SyncEvent::Error { id, path } => self.set_error(*id, path),
        }
    }

    /// Current state of `path`.
    ///
    /// Files report their own state, folders their rolled-up state. Paths
    /// the tree does not hold, or cannot parse, are `NotFound`. The
    /// returned state carries `path` exactly as given.
    pub fn get_sync_state(&self, path: &str) -> SyncState {
        let Ok(parsed) = TreePath::parse(path) else {
            return SyncState::not_found(path);
        };
        match self.root.find(parsed.segments()) {
            Some(node) if node.is_present() => node.state(path),
            _ => SyncState::not_found(path),
        }
    }

    /// Number of files currently tracked under an id.
    ///
    /// Moved paths no longer hold an id and are not counted.
    pub fn get_file_count(&self) -> usize {
        self.index.len()
    }

    /// Whether the tree holds no node at all.
    pub fn is_empty(&self) -> bool {
        !self.root.is_present()
    }

    /// Drain the states that changed since the previous call, then drop
    /// every completed or moved subtree.
    ///
    /// States are returned parent first, siblings in path order. A node
    /// whose state changed and changed back in between is not returned.
    /// The states reflect the tree before anything was dropped; dropped
    /// paths report `NotFound` from now on. Calling again without
    /// mutating in between returns nothing.
    pub fn get_changes_and_clean(&mut self) -> Vec<SyncState> {
        let mut changes = Vec::new();
        self.root.harvest("", &mut changes);
        self.collect_garbage();

        tracing::trace!(
            "Harvested {} changes, {} files still tracked",
            changes.len(),
            self.index.len()
        );
        changes
    }

    fn parse(path: &str, operation: &str) -> Option<TreePath> {
        match TreePath::parse(path) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!("Ignoring {} for malformed path: {}", operation, e);
                None
            }
        }
    }

    /// Put a file for `id` at `path`, moving it away from its previous
    /// path if it had one.
    ///
    /// `total_bytes` of `None` keeps the size already known for the item.
    fn place(
        &mut self,
        id: ItemId,
        path: &str,
        operation: &str,
        status: SyncStatus,
        transferred_bytes: u64,
        total_bytes: Option<u64>,
    ) {
        let Some(path) = Self::parse(path, operation) else {
            return;
        };

        match self.placement(id, &path) {
            Placement::Allowed => {}
            Placement::Folder => {
                tracing::debug!("Ignoring {} for {:?}: {} is a folder", operation, id, path);
                return;
            }
            Placement::UnderFile => {
                tracing::debug!(
                    "Ignoring {} for {:?}: {} lies below a tracked file",
                    operation,
                    id,
                    path
                );
                return;
            }
        }

        let total_bytes = total_bytes.unwrap_or_else(|| self.known_total(id, &path));

        if let Some(old_path) = self.index.get(&id).cloned() {
            if old_path != path {
                self.mark_moved(id, &old_path);
            }
        }

        let leaf = Leaf {
            id: Some(id),
            status,
            transferred_bytes,
            total_bytes,
        };
        let mut displaced = Vec::new();
        self.root.upsert(path.segments(), leaf, &mut displaced);
        for old_id in displaced {
            tracing::trace!("{:?} replaced by {:?} at {}", old_id, id, path);
            self.index.remove(&old_id);
        }
        self.index.insert(id, path);
    }

    fn placement(&self, id: ItemId, path: &TreePath) -> Placement {
        let mut node = &self.root;
        for segment in path.segments() {
            // The item's own file may sit on the way; it is about to move.
            if node.tracked_id().is_some_and(|owner| owner != id) {
                return Placement::UnderFile;
            }
            match node.children.get(segment) {
                Some(child) => node = child,
                None => return Placement::Allowed,
            }
        }
        if node.is_folder() && !self.vacates_folder(id, path, node) {
            Placement::Folder
        } else {
            Placement::Allowed
        }
    }

    /// Whether `id` is moving up into a folder that only exists because of
    /// its own file below `path`.
    fn vacates_folder(&self, id: ItemId, path: &TreePath, folder: &Node) -> bool {
        self.index
            .get(&id)
            .is_some_and(|old_path| old_path != path && old_path.starts_with(path))
            && folder.is_vacated_by(id)
    }

    /// Size to keep for `id` when the report does not carry one.
    fn known_total(&self, id: ItemId, path: &TreePath) -> u64 {
        let leaf_at = |path: &TreePath| {
            self.root
                .find(path.segments())
                .and_then(|node| node.leaf.as_ref())
                .map(|leaf| leaf.total_bytes)
        };
        self.index
            .get(&id)
            .and_then(leaf_at)
            .or_else(|| leaf_at(path))
            .unwrap_or(0)
    }

    /// Turn the file `id` left at `old_path` into a `Moved` marker.
    ///
    /// Folders left with nothing but moved files roll up to `Moved` too.
    fn mark_moved(&mut self, id: ItemId, old_path: &TreePath) {
        let moved = self.root.update_leaf(old_path.segments(), |leaf| {
            if leaf.id != Some(id) {
                return false;
            }
            leaf.id = None;
            leaf.status = SyncStatus::Moved;
            leaf.transferred_bytes = 0;
            true
        });
        if moved {
            tracing::trace!("{:?} moved away from {}", id, old_path);
        }
        self.index.remove(&id);
    }

    fn collect_garbage(&mut self) {
        if !self.root.is_present() {
            return;
        }

        if self.root.status.is_terminal() {
            tracing::debug!(
                "All work finished, dropping tree with {} tracked files",
                self.index.len()
            );
            self.root = Node::default();
            self.index.clear();
            return;
        }

        let mut dropped = Vec::new();
        let removed = self.root.prune(&mut dropped);
        for id in &dropped {
            self.index.remove(id);
        }
        if removed > 0 {
            tracing::debug!(
                "Dropped {} finished nodes ({} tracked files)",
                removed,
                dropped.len()
            );
        }
    }
}

#[cfg(test)]
impl StatusTree {
    pub(crate) fn root_node(&self) -> &Node {
        &self.root
    }

    pub(crate) fn index(&self) -> &HashMap<ItemId, TreePath> {
        &self.index
    }
}

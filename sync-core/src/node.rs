//! Tree vertices and their byte aggregation.
//!
//! A node is either a file (it carries a [`Leaf`]) or a folder (it has
//! children). A file that took over its own old folder keeps the moved
//! markers below it until the next prune. A folder's status and byte counts are recomputed from its
//! direct children every time something below it changes, so reading a
//! node never walks its subtree.

use std::collections::BTreeMap;

use synctrack_types::{ItemId, SyncState, SyncStatus};

/// Per-file data held by a leaf node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Leaf {
    /// Owning item; `None` once the item moved elsewhere.
    pub id: Option<ItemId>,
    pub status: SyncStatus,
    pub transferred_bytes: u64,
    pub total_bytes: u64,
}

impl Leaf {
    /// Bytes credited towards progress.
    fn numerator(&self) -> u64 {
        match self.status {
            SyncStatus::Completed => self.total_bytes,
            SyncStatus::InProgress => self.transferred_bytes.min(self.total_bytes),
            SyncStatus::Queued | SyncStatus::Error | SyncStatus::Moved | SyncStatus::NotFound => 0,
        }
    }

    /// Bytes counted as work to do. A moved file's bytes follow it.
    fn denominator(&self) -> u64 {
        match self.status {
            SyncStatus::Moved | SyncStatus::NotFound => 0,
            _ => self.total_bytes,
        }
    }
}

/// What a consumer can observe about a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Snapshot {
    pub status: SyncStatus,
    pub progress: f32,
}

#[derive(Debug)]
pub(crate) struct Node {
    pub leaf: Option<Leaf>,
    pub children: BTreeMap<String, Node>,
    /// Effective status: the leaf's own, or rolled up from children.
    pub status: SyncStatus,
    pub numerator: u64,
    pub denominator: u64,
    /// Completed bytes of pruned children, still counted here.
    pub retired_bytes: Option<u64>,
    /// Observable state may have changed since the last harvest.
    pub dirty: bool,
    /// Last snapshot handed out by a harvest.
    pub reported: Option<Snapshot>,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            leaf: None,
            children: BTreeMap::new(),
            status: SyncStatus::NotFound,
            numerator: 0,
            denominator: 0,
            retired_bytes: None,
            dirty: false,
            reported: None,
        }
    }
}

impl Node {
    /// Whether the node is part of the tree at all.
    ///
    /// Only the root can be empty; every other node is removed as soon as
    /// it stops having content.
    pub fn is_present(&self) -> bool {
        self.leaf.is_some() || !self.children.is_empty()
    }

    pub fn is_folder(&self) -> bool {
        self.leaf.is_none() && !self.children.is_empty()
    }

    /// Whether the subtree holds nothing but `id`'s own file and moved
    /// markers.
    pub fn is_vacated_by(&self, id: ItemId) -> bool {
        self.retired_bytes.is_none()
            && self
                .leaf
                .as_ref()
                .map_or(true, |leaf| leaf.id.is_none() || leaf.id == Some(id))
            && self.children.values().all(|child| child.is_vacated_by(id))
    }

    /// Id of the item tracked at this node, if it is a live file.
    pub fn tracked_id(&self) -> Option<ItemId> {
        self.leaf.as_ref().and_then(|leaf| leaf.id)
    }

    pub fn progress(&self) -> f32 {
        match self.status {
            SyncStatus::Completed => 1.0,
            SyncStatus::Moved | SyncStatus::NotFound => 0.0,
            _ if self.denominator == 0 => 0.0,
            _ => (self.numerator as f64 / self.denominator as f64) as f32,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            progress: self.progress(),
        }
    }

    pub fn state(&self, path: impl Into<String>) -> SyncState {
        SyncState::new(self.status, self.progress(), path)
    }

    /// Recompute status and byte counts from the leaf or the children.
    ///
    /// Marks the node dirty when the observable state changes.
    pub fn recompute(&mut self) {
        let before = self.snapshot();

        let (status, numerator, denominator) = match &self.leaf {
            Some(leaf) => (leaf.status, leaf.numerator(), leaf.denominator()),
            None => self.fold_children(),
        };
        self.status = status;
        self.numerator = numerator;
        self.denominator = denominator;

        if self.snapshot() != before {
            self.dirty = true;
        }
    }

    fn fold_children(&self) -> (SyncStatus, u64, u64) {
        let (mut status, mut numerator, mut denominator) = match self.retired_bytes {
            Some(bytes) => (SyncStatus::Completed, bytes, bytes),
            None => (SyncStatus::NotFound, 0, 0),
        };

        for child in self.children.values() {
            if child.status.precedence() > status.precedence() {
                status = child.status;
            }
            numerator = numerator.saturating_add(child.numerator);
            denominator = denominator.saturating_add(child.denominator);
        }

        (status, numerator, denominator)
    }

    pub fn find(&self, segments: &[String]) -> Option<&Node> {
        match segments.split_first() {
            None => Some(self),
            Some((head, rest)) => self.children.get(head)?.find(rest),
        }
    }

    /// Put `leaf` at `segments`, creating folders on the way down.
    ///
    /// Ids that stop occupying a node are pushed to `displaced`.
    pub fn upsert(&mut self, segments: &[String], leaf: Leaf, displaced: &mut Vec<ItemId>) {
        match segments.split_first() {
            None => {
                let new_id = leaf.id;
                if let Some(old_id) = self.leaf.replace(leaf).and_then(|old| old.id) {
                    if Some(old_id) != new_id {
                        displaced.push(old_id);
                    }
                }
            }
            Some((head, rest)) => {
                // A file cannot have children; a moved one becomes a folder.
                if let Some(old) = self.leaf.take() {
                    displaced.extend(old.id);
                }
                self.children
                    .entry(head.clone())
                    .or_default()
                    .upsert(rest, leaf, displaced);
            }
        }
        self.recompute();
    }

    /// Apply `update` to the leaf at `segments`, if there is one.
    ///
    /// `update` returns whether it changed the leaf; the result is that
    /// value, or `false` when no leaf lives at `segments`.
    pub fn update_leaf<F>(&mut self, segments: &[String], update: F) -> bool
    where
        F: FnOnce(&mut Leaf) -> bool,
    {
        let changed = match segments.split_first() {
            None => self.leaf.as_mut().is_some_and(update),
            Some((head, rest)) => match self.children.get_mut(head) {
                Some(child) => child.update_leaf(rest, update),
                None => false,
            },
        };
        if changed {
            self.recompute();
        }
        changed
    }

    /// Depth-first, parent before children, path-ordered siblings.
    pub fn harvest(&mut self, path: &str, changes: &mut Vec<SyncState>) {
        if self.dirty {
            self.dirty = false;
            let snapshot = self.snapshot();
            if self.is_present() && self.reported != Some(snapshot) {
                self.reported = Some(snapshot);
                let display = if path.is_empty() { "/" } else { path };
                changes.push(self.state(display));
            }
        }

        for (segment, child) in self.children.iter_mut() {
            let child_path = format!("{path}/{segment}");
            child.harvest(&child_path, changes);
        }
    }

    /// Remove every terminal child subtree below this (non-terminal) node.
    ///
    /// Completed bytes of removed children are retired into the node that
    /// held them, so no surviving node's observable state changes.
    pub fn prune(&mut self, dropped: &mut Vec<ItemId>) -> usize {
        let mut removed = 0;
        let mut retired = 0u64;
        let mut retired_any = false;

        self.children.retain(|_, child| {
            if child.status.is_terminal() {
                if child.status == SyncStatus::Completed {
                    retired = retired.saturating_add(child.denominator);
                    retired_any = true;
                }
                removed += child.collect_ids(dropped);
                false
            } else {
                removed += child.prune(dropped);
                true
            }
        });

        if retired_any {
            let total = self.retired_bytes.unwrap_or(0).saturating_add(retired);
            self.retired_bytes = Some(total);
        }
        if removed > 0 {
            self.recompute();
        }
        removed
    }

    /// Push ids held in this subtree and return how many nodes it has.
    fn collect_ids(&self, ids: &mut Vec<ItemId>) -> usize {
        ids.extend(self.tracked_id());
        1 + self
            .children
            .values()
            .map(|child| child.collect_ids(ids))
            .sum::<usize>()
    }
}

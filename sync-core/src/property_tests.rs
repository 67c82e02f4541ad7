//! Property-based tests for the status tree.

use std::collections::HashMap;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use crate::node::Node;
use crate::{ItemId, StatusTree, SyncState, SyncStatus, TreePath};

#[derive(Debug, Clone)]
enum Op {
    Queued(u64, String, u64),
    InProgress(u64, String, u64, u64),
    Completed(u64, String),
    Error(u64, String),
    Harvest,
}

/// Short paths over a tiny alphabet so that files collide, nest and move.
fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just("a"), Just("b"), Just("c")], 0..4)
        .prop_map(|segments| format!("/{}", segments.join("/")))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u64..5, path_strategy(), 0u64..200)
            .prop_map(|(id, path, total)| Op::Queued(id, path, total)),
        4 => (0u64..5, path_strategy(), 0u64..250, 0u64..200)
            .prop_map(|(id, path, transferred, total)| Op::InProgress(id, path, transferred, total)),
        3 => (0u64..5, path_strategy()).prop_map(|(id, path)| Op::Completed(id, path)),
        1 => (0u64..5, path_strategy()).prop_map(|(id, path)| Op::Error(id, path)),
        2 => Just(Op::Harvest),
    ]
}

/// Every node with its canonical path, parent first.
fn walk<'a>(node: &'a Node, path: &str, out: &mut Vec<(String, &'a Node)>) {
    let display = if path.is_empty() { "/" } else { path };
    out.push((display.to_string(), node));
    for (segment, child) in &node.children {
        walk(child, &format!("{path}/{segment}"), out);
    }
}

fn nodes(tree: &StatusTree) -> Vec<(String, &Node)> {
    let mut out = Vec::new();
    walk(tree.root_node(), "", &mut out);
    out
}

/// State a node should have, computed from its own leaf or its children.
fn expected_rollup(node: &Node) -> (SyncStatus, u64, u64) {
    if let Some(leaf) = &node.leaf {
        let numerator = match leaf.status {
            SyncStatus::Completed => leaf.total_bytes,
            SyncStatus::InProgress => leaf.transferred_bytes,
            _ => 0,
        };
        let denominator = match leaf.status {
            SyncStatus::Moved | SyncStatus::NotFound => 0,
            _ => leaf.total_bytes,
        };
        return (leaf.status, numerator, denominator);
    }

    let mut status = SyncStatus::NotFound;
    let (mut numerator, mut denominator) = (0, 0);
    if let Some(bytes) = node.retired_bytes {
        status = SyncStatus::Completed;
        numerator += bytes;
        denominator += bytes;
    }
    for child in node.children.values() {
        if child.status.precedence() > status.precedence() {
            status = child.status;
        }
        numerator += child.numerator;
        denominator += child.denominator;
    }
    (status, numerator, denominator)
}

fn check_tree(tree: &StatusTree) -> Result<(), TestCaseError> {
    let mut leaf_ids: HashMap<ItemId, TreePath> = HashMap::new();

    for (path, node) in nodes(tree) {
        if path != "/" {
            prop_assert!(node.is_present(), "empty node left at {}", path);
        }

        let (status, numerator, denominator) = expected_rollup(node);
        prop_assert_eq!(node.status, status, "status of {}", &path);
        prop_assert_eq!(node.numerator, numerator, "numerator of {}", &path);
        prop_assert_eq!(node.denominator, denominator, "denominator of {}", &path);
        prop_assert!(node.numerator <= node.denominator);

        let state = tree.get_sync_state(&path);
        prop_assert!((0.0..=1.0).contains(&state.progress));
        if node.is_present() {
            prop_assert_eq!(&state, &node.state(path.as_str()));
        }

        if let Some(leaf) = &node.leaf {
            prop_assert!(leaf.transferred_bytes <= leaf.total_bytes);
            for child in node.children.values() {
                prop_assert_eq!(child.status, SyncStatus::Moved, "live file below {}", &path);
            }
            if let Some(id) = leaf.id {
                let parsed =
                    TreePath::parse(&path).map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert!(leaf_ids.insert(id, parsed).is_none(), "{:?} held twice", id);
            }
        }
    }

    prop_assert_eq!(&leaf_ids, tree.index());
    prop_assert_eq!(tree.get_file_count(), leaf_ids.len());
    Ok(())
}

/// Harvest and check the batch against the states last handed out.
fn check_harvest(
    tree: &mut StatusTree,
    seen: &mut HashMap<String, SyncState>,
) -> Result<(), TestCaseError> {
    let mut expected: Vec<SyncState> = nodes(tree)
        .into_iter()
        .filter(|(_, node)| node.is_present())
        .map(|(path, node)| node.state(path))
        .filter(|state| seen.get(&state.path) != Some(state))
        .collect();
    expected.sort_by(|a, b| a.path.cmp(&b.path));

    let mut changes = tree.get_changes_and_clean();
    changes.sort_by(|a, b| a.path.cmp(&b.path));
    prop_assert_eq!(&changes, &expected);

    for state in changes {
        seen.insert(state.path.clone(), state);
    }

    let mut present = Vec::new();
    for (path, node) in nodes(tree) {
        if node.is_present() {
            prop_assert!(
                !node.status.is_terminal(),
                "{} is {} after a harvest",
                &path,
                node.status
            );
            present.push(path);
        }
    }
    seen.retain(|path, _| present.contains(path));

    prop_assert!(tree.get_changes_and_clean().is_empty());
    Ok(())
}

proptest! {
    /// Rollups, the id index and harvests stay consistent for any sequence
    /// of reports.
    #[test]
    fn tree_invariants_hold_for_any_event_sequence(
        ops in prop::collection::vec(op_strategy(), 1..60)
    ) {
        let mut tree = StatusTree::new();
        let mut seen = HashMap::new();

        for op in ops {
            match op {
                Op::Queued(id, path, total) => tree.set_queued(ItemId::new(id), &path, total),
                Op::InProgress(id, path, transferred, total) => {
                    tree.set_in_progress(ItemId::new(id), &path, transferred, total)
                }
                Op::Completed(id, path) => tree.set_completed(ItemId::new(id), &path),
                Op::Error(id, path) => tree.set_error(ItemId::new(id), &path),
                Op::Harvest => check_harvest(&mut tree, &mut seen)?,
            }
            check_tree(&tree)?;
        }

        check_harvest(&mut tree, &mut seen)?;
        check_tree(&tree)?;
    }

    /// Harvesting until nothing is in flight always empties the tree.
    #[test]
    fn completing_every_file_empties_tree(
        files in prop::collection::vec((path_strategy(), 1u64..100), 1..12)
    ) {
        let mut tree = StatusTree::new();
        for (id, (path, total)) in files.iter().enumerate() {
            tree.set_in_progress(ItemId::new(id as u64), path, 0, *total);
        }
        for (id, (path, _)) in files.iter().enumerate() {
            tree.set_completed(ItemId::new(id as u64), path);
        }
        tree.get_changes_and_clean();

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.get_file_count(), 0);
    }
}

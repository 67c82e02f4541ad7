//! # sync-core
//!
//! Pure logic for synctrack (no I/O, instant tests).
//!
//! This crate implements the hierarchical sync status tree: a live,
//! in-memory index of the sync state of every path the sync engine reports
//! on, with folder states rolled up from their files.
//!
//! ## Design Philosophy
//!
//! Everything here is **pure** and synchronous - calls take input and
//! update the tree without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same events → same tree)
//! - Total functions: no call panics or fails on caller input
//!
//! Receiving events and rendering progress are left to the caller, which
//! feeds [`StatusTree`] and drains it with
//! [`StatusTree::get_changes_and_clean`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod node;
pub mod path;
pub mod tree;

#[cfg(test)]
mod property_tests;

pub use path::{PathError, TreePath};
pub use synctrack_types::{ItemId, SyncEvent, SyncState, SyncStatus};
pub use tree::StatusTree;

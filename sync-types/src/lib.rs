//! # sync-types
//!
//! Shared vocabulary for the synctrack file-sync status tracker.
//!
//! This crate provides the foundational types used across all synctrack crates:
//! - [`ItemId`] - Caller-assigned identity of one being-synced item
//! - [`SyncStatus`], [`SyncState`] - What the tracker reports per path
//! - [`SyncEvent`] - Reports coming from the sync engine
//! - [`TypesError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod events;
mod ids;
mod status;

pub use error::TypesError;
pub use events::SyncEvent;
pub use ids::ItemId;
pub use status::{SyncState, SyncStatus};

//! Path keys for the status tree.
//!
//! Tracked paths are absolute and slash-separated (`/Docs/report.pdf`).
//! Repeated slashes and `.` segments are ignored; parent (`..`) segments
//! and relative paths are rejected.

use std::fmt;

use thiserror::Error;

/// Why a path cannot be used as a tree key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path is an empty string.
    #[error("path is empty")]
    Empty,
    /// The path does not start with `/`.
    #[error("path is not absolute: {0}")]
    NotAbsolute(String),
    /// The path contains a `..` segment.
    #[error("path contains a parent component: {0}")]
    ParentComponent(String),
}

/// A parsed absolute path, stored as its segments from the root down.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreePath {
    segments: Vec<String>,
}

impl TreePath {
    /// Parse an absolute path.
    ///
    /// `/`, `//` and `////` all address the root.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if !path.starts_with('/') {
            return Err(PathError::NotAbsolute(path.to_string()));
        }

        let mut segments = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(PathError::ParentComponent(path.to_string())),
                other => segments.push(other.to_string()),
            }
        }
        Ok(Self { segments })
    }

    /// Segments from the root down; empty for the root.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether `self` is `other` or lies below it.
    pub fn starts_with(&self, other: &TreePath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

//! Changed-file types as reported by the change-request host.

use serde::{Deserialize, Serialize};
use strum::Display;

/// How a file was changed within the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Renamed,
    Removed,
    /// Anything else the host reports (copied, type-changed, unchanged).
    #[serde(other)]
    Other,
}

impl std::str::FromStr for ChangeKind {
    type Err = std::convert::Infallible;

    /// Host status strings map losslessly where known; everything else
    /// collapses into [`ChangeKind::Other`] rather than failing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "added" => ChangeKind::Added,
            "modified" | "changed" => ChangeKind::Modified,
            "renamed" => ChangeKind::Renamed,
            "removed" | "deleted" => ChangeKind::Removed,
            _ => ChangeKind::Other,
        })
    }
}

impl ChangeKind {
    /// Whether files of this kind are candidates for analysis.
    ///
    /// Removed files have no current content to reason about, and the
    /// remaining kinds carry no reviewable change.
    pub fn is_analyzable(self) -> bool {
        matches!(
            self,
            ChangeKind::Added | ChangeKind::Modified | ChangeKind::Renamed
        )
    }
}

/// A single file touched by the change request.
///
/// Identity is the path within one request. Instances are rebuilt from the
/// host's change listing on every invocation and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path relative to the repository root (the new path for renames).
    pub path: String,
    /// The kind of change.
    pub kind: ChangeKind,
    /// Unified-diff patch text, when the host provides one.
    /// Binary files and very large changes come without a patch.
    pub patch: Option<String>,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, kind: ChangeKind, patch: Option<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            patch,
        }
    }
}

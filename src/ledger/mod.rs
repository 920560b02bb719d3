//! Reconstructs which paths have already been fully analyzed.
//!
//! The ledger is never stored anywhere: it is rebuilt on every invocation
//! by scanning the bodies of the comments already posted on the change
//! request for the full-content marker that [`crate::report`] emits. Its
//! lifetime is exactly one invocation.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::Comment;

/// Matches the full-content marker line, capturing the path.
///
/// Anchored to a whole line so paths mentioned inside diff bodies or
/// prose can't register, and shaped so the diff-only marker never
/// matches.
static CONTENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^- 📄 `([^`\n]+)` \(full content analyzed\)$")
        .expect("content marker regex is valid")
});

/// Collect every path whose full content appeared in a prior comment.
///
/// Robust to multiple markers per comment and to unrelated comments from
/// other authors (the marker shape is ours alone).
pub fn analyzed_paths(comments: &[Comment]) -> HashSet<String> {
    let mut paths = HashSet::new();
    for comment in comments {
        for capture in CONTENT_MARKER.captures_iter(&comment.body) {
            paths.insert(capture[1].to_string());
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{content_marker, diff_marker};

    #[test]
    fn empty_history_yields_empty_ledger() {
        assert!(analyzed_paths(&[]).is_empty());
    }

    #[test]
    fn recognises_marker_emitted_by_report() {
        let body = format!("intro\n{}\ntail\n", content_marker("src/app.ts"));
        let ledger = analyzed_paths(&[Comment::new("parley[bot]", body)]);
        assert!(ledger.contains("src/app.ts"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn multiple_markers_in_one_comment() {
        let body = format!(
            "{}\n{}\n",
            content_marker("src/a.rs"),
            content_marker("src/b.rs"),
        );
        let ledger = analyzed_paths(&[Comment::new("parley[bot]", body)]);
        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains("src/a.rs"));
        assert!(ledger.contains("src/b.rs"));
    }

    #[test]
    fn markers_accumulate_across_comments() {
        let comments = vec![
            Comment::new("parley[bot]", content_marker("src/a.rs")),
            Comment::new("alice", "looks good to me"),
            Comment::new("parley[bot]", content_marker("src/b.rs")),
        ];
        let ledger = analyzed_paths(&comments);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn diff_marker_never_feeds_the_ledger() {
        let body = format!(
            "{}\n{}\n",
            content_marker("src/a.rs"),
            diff_marker("src/b.rs"),
        );
        let ledger = analyzed_paths(&[Comment::new("parley[bot]", body)]);
        assert!(ledger.contains("src/a.rs"));
        assert!(!ledger.contains("src/b.rs"));
    }

    #[test]
    fn paths_inside_diff_bodies_are_ignored() {
        // A quoted diff that happens to mention a path in marker-like prose
        let body = "```diff\n+ see - 📄 `src/fake.rs` (full content analyzed)\n```\n";
        let ledger = analyzed_paths(&[Comment::new("alice", body)]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn marker_requires_exact_shape() {
        let almost = "- 📄 src/no_backticks.rs (full content analyzed)\n\
                      - 📄 `src/wrong_suffix.rs` (diff only)\n";
        let ledger = analyzed_paths(&[Comment::new("parley[bot]", almost)]);
        assert!(ledger.is_empty());
    }
}

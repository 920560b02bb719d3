//! Comment body composition.
//!
//! Wraps the analysis service's answer together with a summary of what
//! was analyzed. Pure string composition; the response text is passed
//! through verbatim.
//!
//! The per-file summary lines double as the ledger's source of truth: the
//! full-content marker emitted here is what [`crate::ledger`] recognises
//! on the next invocation. The diff-only marker is a deliberately
//! different shape so it can never feed the ledger; collapsing the two
//! would permanently suppress content for files that were only ever
//! diffed.

use crate::changeset::ChangeSet;
use crate::constants::APP_NAME;

/// Summary line for a file whose full content was analyzed.
pub fn content_marker(path: &str) -> String {
    format!("- 📄 `{path}` (full content analyzed)")
}

/// Summary line for a file analyzed through its diff only.
pub fn diff_marker(path: &str) -> String {
    format!("- 🔀 `{path}` (diff only)")
}

/// Compose the comment body posted back to the change request.
pub fn format_comment(response: &str, request_number: u64, set: &ChangeSet) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "## 🤖 {APP_NAME} analysis for #{request_number}\n\n"
    ));
    body.push_str(&format!(
        "Analyzed {} with full content and {} through {}.\n\n",
        count(set.code_blocks.len(), "file"),
        count(set.diff_blocks.len(), "file"),
        if set.diff_blocks.len() == 1 {
            "its diff"
        } else {
            "their diffs"
        },
    ));

    body.push_str("### Analyzed changes\n\n");
    // Every fully analyzed file gets its content marker, even when the
    // host served no patch for it; the ledger depends on these lines.
    for path in set.code_blocks.keys() {
        body.push_str(&content_marker(path));
        body.push('\n');
    }
    for path in set.diff_blocks.keys() {
        if !set.code_blocks.contains_key(path) {
            body.push_str(&diff_marker(path));
            body.push('\n');
        }
    }
    body.push('\n');

    body.push_str("### Analysis\n\n");
    body.push_str(response);
    if !response.ends_with('\n') {
        body.push('\n');
    }

    body
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

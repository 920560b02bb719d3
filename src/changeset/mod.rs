//! Change-set construction: scope filtering and content collection.
//!
//! Classifies each changed file, filters through the exclusion rules, and
//! decides per file whether the prompt gets its full content or only its
//! diff. Content is fetched only for paths the ledger has not seen; files
//! already analyzed ride along as diffs so the conversation stays
//! incremental without resending unchanged context.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::host::ChangeRequestHost;
use crate::models::{ChangedFile, RequestRef};
use crate::scope::ExcludeRules;

/// Maximum concurrent content fetches.
const MAX_CONCURRENT_FETCHES: usize = 8;

/// The blocks feeding the prompt assembler, keyed by path in the host's
/// listing order.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Full content for files the ledger has not seen.
    pub code_blocks: IndexMap<String, String>,
    /// Diff text for every in-scope file that has one.
    pub diff_blocks: IndexMap<String, String>,
}

impl ChangeSet {
    /// True when there is nothing to analyze; the invocation becomes a
    /// no-op (no service call, no comment).
    pub fn is_empty(&self) -> bool {
        self.code_blocks.is_empty() && self.diff_blocks.is_empty()
    }
}

/// Build the change set for one invocation.
///
/// Content fetches fan out concurrently and join before returning; a
/// failed fetch demotes that file to diff-only with a warning instead of
/// aborting the run. Output order always follows the input listing, so
/// the same inputs produce the same change set.
pub async fn build(
    host: Arc<dyn ChangeRequestHost>,
    request: &RequestRef,
    files: &[ChangedFile],
    rules: &ExcludeRules,
    ledger: &HashSet<String>,
) -> ChangeSet {
    let in_scope: Vec<&ChangedFile> = files
        .iter()
        .filter(|f| f.kind.is_analyzable() && !rules.is_excluded(&f.path))
        .collect();

    // Fan out the content fetches for paths the ledger hasn't seen.
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_FETCHES));
    let mut join_set = JoinSet::new();

    for file in &in_scope {
        if ledger.contains(&file.path) {
            continue;
        }

        let host = Arc::clone(&host);
        let sem = Arc::clone(&semaphore);
        let request = request.clone();
        let path = file.path.clone();

        join_set.spawn(async move {
            let _permit = sem.acquire().await.expect("semaphore closed");
            let result = host.fetch_content(&request, &path).await;
            (path, result)
        });
    }

    // Join barrier: every fetch completes (or fails on its own) before
    // assembly starts.
    let mut contents: IndexMap<String, String> = IndexMap::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((path, Ok(content))) => {
                contents.insert(path, content);
            }
            Ok((path, Err(e))) => {
                eprintln!("Warning: could not fetch content of {path}: {e}");
            }
            Err(e) => {
                eprintln!("Warning: content fetch task panicked: {e}");
            }
        }
    }

    // Assemble in listing order from the joined results.
    let mut set = ChangeSet::default();
    for file in &in_scope {
        if let Some(content) = contents.shift_remove(&file.path) {
            set.code_blocks.insert(file.path.clone(), content);
        }
        if let Some(ref patch) = file.patch {
            set.diff_blocks.insert(file.path.clone(), patch.clone());
        }
    }

    set
}

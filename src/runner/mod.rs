//! The single-invocation pipeline.
//!
//! One trigger event, one run to completion: classify the event, then
//! either terminate the service session or collect the change set, send
//! one prompt, and post the answer. All state lives in this call; nothing
//! persists between invocations except what the host itself stores.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::analysis::AnalysisService;
use crate::changeset;
use crate::config::Config;
use crate::host::ChangeRequestHost;
use crate::ledger;
use crate::models::{Action, RequestRef, SessionIdentity, TriggerEvent};
use crate::prompt;
use crate::report;
use crate::scope::ExcludeRules;

/// How the invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Closure event: the service session was terminated, nothing posted.
    SessionTerminated,
    /// Every changed file was filtered out; nothing sent, nothing posted.
    NothingToAnalyze,
    /// Dry run: the prompt was printed instead of sent.
    DryRun { prompt_chars: usize },
    /// The analysis was posted as a comment.
    Posted {
        content_files: usize,
        diff_files: usize,
    },
}

/// Execute one invocation.
///
/// `repo_root` is the checked-out working tree, consulted only for the
/// repository ignore file. Fatal errors (host, service) propagate; the
/// caller turns them into the process failure signal.
pub async fn execute(
    config: &Config,
    event: TriggerEvent,
    request: &RequestRef,
    repo_root: &Path,
    host: Arc<dyn ChangeRequestHost>,
    service: Arc<dyn AnalysisService>,
    dry_run: bool,
) -> Result<Outcome> {
    let mut session = SessionIdentity::for_request(request, config.memory_prefix());
    if let Some(ref key) = config.memory.key {
        session.memory_key = Some(key.clone());
    }

    if config.debug {
        eprintln!(
            "debug: event={event} request={}/{}#{} session={}",
            request.owner, request.repo, request.number, session.session_key,
        );
    }

    // Classified once; no string comparisons downstream.
    match event.action() {
        Action::Terminate => {
            service
                .end_session(&session)
                .await
                .context("failed to end the analysis session")?;
            return Ok(Outcome::SessionTerminated);
        }
        Action::Analyze => {}
    }

    let files = host
        .list_changed_files(request)
        .await
        .context("failed to list changed files")?;
    let comments = host
        .list_comments(request)
        .await
        .context("failed to list comments")?;

    let analyzed = ledger::analyzed_paths(&comments);
    let rules = load_rules(config, repo_root).await;

    if config.debug {
        eprintln!(
            "debug: {} changed file(s), {} in ledger, {} exclusion pattern(s)",
            files.len(),
            analyzed.len(),
            rules.len(),
        );
    }

    let set = changeset::build(Arc::clone(&host), request, &files, &rules, &analyzed).await;
    if set.is_empty() {
        return Ok(Outcome::NothingToAnalyze);
    }

    let prompt = prompt::assemble(
        &set.code_blocks,
        &set.diff_blocks,
        &config.analysis.instruction,
    );

    if dry_run {
        println!("{prompt}");
        return Ok(Outcome::DryRun {
            prompt_chars: prompt.chars().count(),
        });
    }

    let response = service
        .invoke(&session, &prompt)
        .await
        .context("analysis request failed")?;

    let body = report::format_comment(&response, request.number, &set);
    host.post_comment(request, &body)
        .await
        .context("failed to post the analysis comment")?;

    Ok(Outcome::Posted {
        content_files: set.code_blocks.len(),
        diff_files: set.diff_blocks.len(),
    })
}

/// Merge configured patterns with the repository ignore file, when one
/// exists in the working tree.
async fn load_rules(config: &Config, repo_root: &Path) -> ExcludeRules {
    let ignore_path = repo_root.join(&config.scope.ignore_file);
    let ignore_contents = match tokio::fs::read_to_string(&ignore_path).await {
        Ok(contents) => Some(contents),
        Err(_) => None,
    };
    ExcludeRules::from_sources(&config.scope.ignore_patterns, ignore_contents.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_rules_reads_ignore_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".parleyignore"), "dist/\n*.lock\n").unwrap();

        let config = Config::default();
        let rules = load_rules(&config, dir.path()).await;
        assert!(rules.is_excluded("dist/bundle.js"));
        assert!(rules.is_excluded("Cargo.lock"));
        assert!(!rules.is_excluded("src/main.rs"));
    }

    #[tokio::test]
    async fn load_rules_without_ignore_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.scope.ignore_patterns = vec!["*.md".to_string()];

        let rules = load_rules(&config, dir.path()).await;
        assert!(rules.is_excluded("README.md"));
        assert!(!rules.is_excluded("src/main.rs"));
    }
}

//! Trigger events, request identity, and session key derivation.
//!
//! The invocation is driven by a single host event. The event kind is
//! parsed once into a closed enum; everything downstream matches on it
//! instead of re-comparing action strings.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Immutable coordinates of the change request being analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRef {
    /// Repository owner (user or organisation login).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Human-facing request number (`#42`).
    pub number: u64,
    /// Internal numeric identity assigned by the host. Reopening keeps
    /// it; a newly opened request never reuses one.
    pub id: u64,
    /// Head commit of the request at trigger time. Used to pin content
    /// fetches to the version being analyzed; never part of identity.
    pub head_sha: String,
}

/// The event that triggered this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// The request was opened.
    Opened,
    /// New commits were pushed to the request.
    Synchronized,
    /// The request was reopened.
    Reopened,
    /// The request was closed (merged or not).
    Closed { merged: bool },
}

/// What an invocation should do for a given trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Build the change set and run the analysis.
    Analyze,
    /// Tell the analysis service to end the session; no analysis, no comment.
    Terminate,
}

impl TriggerEvent {
    /// Parse a host action string. `merged` is only meaningful for `closed`.
    pub fn parse(action: &str, merged: bool) -> Option<Self> {
        match action {
            "opened" => Some(TriggerEvent::Opened),
            "synchronize" => Some(TriggerEvent::Synchronized),
            "reopened" => Some(TriggerEvent::Reopened),
            "closed" => Some(TriggerEvent::Closed { merged }),
            _ => None,
        }
    }

    /// Classify the event once, up front.
    pub fn action(self) -> Action {
        match self {
            TriggerEvent::Opened | TriggerEvent::Synchronized | TriggerEvent::Reopened => {
                Action::Analyze
            }
            TriggerEvent::Closed { .. } => Action::Terminate,
        }
    }
}

impl std::fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerEvent::Opened => write!(f, "opened"),
            TriggerEvent::Synchronized => write!(f, "synchronize"),
            TriggerEvent::Reopened => write!(f, "reopened"),
            TriggerEvent::Closed { merged: true } => write!(f, "closed (merged)"),
            TriggerEvent::Closed { merged: false } => write!(f, "closed"),
        }
    }
}

/// Identifiers handed to the analysis service so repeated triggers on the
/// same request continue one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Stable per-request conversation key.
    pub session_key: String,
    /// Optional long-lived memory key.
    pub memory_key: Option<String>,
}

impl SessionIdentity {
    /// Derive the session identity for a request.
    ///
    /// The session key combines the internal numeric identity with the
    /// human-facing number. Either alone would in theory collide (id reuse
    /// on the host side, numbers repeating across repositories); together
    /// they are unique per request and identical across every invocation
    /// on it. Mutable attributes (title, branch) and the invocation's own
    /// run identity must never feed into this.
    ///
    /// `memory_prefix` enables the memory key: it is scoped to the request
    /// by a truncated content hash so a reopened request keeps its memory
    /// while distinct requests never share one.
    pub fn for_request(request: &RequestRef, memory_prefix: Option<&str>) -> Self {
        let session_key = format!("pr-{}-{}", request.id, request.number);
        let memory_key = memory_prefix.map(|prefix| {
            let mut hasher = Sha256::new();
            hasher.update(format!("{}/{}#{}", request.owner, request.repo, request.id));
            let digest = hex::encode(hasher.finalize());
            format!("{prefix}-{}", &digest[..16])
        });
        Self {
            session_key,
            memory_key,
        }
    }
}

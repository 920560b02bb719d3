//! Change-request host abstraction.
//!
//! Provides the narrow contract the core needs from the version-control
//! host: list what changed, read what was said, fetch file content, and
//! post the answer. The GitHub adapter lives in [`github`]; tests supply
//! mock implementations.

pub mod github;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ChangedFile, Comment, RequestRef};

/// Errors from host API calls.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid event payload: {0}")]
    EventPayload(String),

    #[error("API request failed: {0}")]
    ApiError(String),
}

impl From<crate::env::MissingVar> for HostError {
    fn from(e: crate::env::MissingVar) -> Self {
        HostError::MissingEnvVar(e.0)
    }
}

/// The version-control host, seen through the smallest possible window.
#[async_trait]
pub trait ChangeRequestHost: Send + Sync {
    /// List the files touched by the request, in the host's order.
    async fn list_changed_files(
        &self,
        request: &RequestRef,
    ) -> Result<Vec<ChangedFile>, HostError>;

    /// List the comments already posted on the request.
    async fn list_comments(&self, request: &RequestRef) -> Result<Vec<Comment>, HostError>;

    /// Fetch a file's full content at the request's head commit.
    async fn fetch_content(
        &self,
        request: &RequestRef,
        path: &str,
    ) -> Result<String, HostError>;

    /// Post a new comment on the request.
    async fn post_comment(&self, request: &RequestRef, body: &str) -> Result<(), HostError>;
}

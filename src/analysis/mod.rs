//! Analysis service abstraction.
//!
//! The external conversational agent is a black box behind this trait:
//! one prompt in, one answer out, plus a terminal end-of-session signal.
//! The HTTP adapter lives in [`http`]; tests supply mocks.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::SessionIdentity;

/// Errors from the analysis service.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("analysis service not configured: {0}")]
    NotConfigured(String),

    #[error("analysis request failed: {0}")]
    ApiError(String),

    #[error("analysis service returned no completion")]
    EmptyResponse,
}

/// The conversational analysis service.
///
/// The session identity ties repeated invocations on one change request
/// into a single ongoing conversation on the service side.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Send a prompt within the session and return the answer text.
    async fn invoke(
        &self,
        session: &SessionIdentity,
        prompt: &str,
    ) -> Result<String, AnalysisError>;

    /// Tell the service the session is over. No prompt, no answer.
    async fn end_session(&self, session: &SessionIdentity) -> Result<(), AnalysisError>;
}

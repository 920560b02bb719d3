//! HTTP adapter for an agent-runtime endpoint.
//!
//! Speaks a minimal JSON contract: one POST per invocation carrying the
//! agent identity, the session keys, and the prompt; the endpoint answers
//! with a `completion` string. Ending a session is the same POST with
//! `end_session` set and no input text.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AnalysisError, AnalysisService};
use crate::config::AnalysisConfig;
use crate::models::SessionIdentity;

/// The analysis call is one long blocking round trip; the agent may spend
/// minutes reasoning over a large prompt.
const INVOKE_TIMEOUT: Duration = Duration::from_secs(600);

/// Request body for the agent runtime.
#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    agent_id: &'a str,
    agent_alias_id: &'a str,
    session_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_text: Option<&'a str>,
    end_session: bool,
}

/// Response body from the agent runtime.
#[derive(Debug, Deserialize)]
struct InvokeResponse {
    completion: Option<String>,
}

/// Agent-runtime client.
#[derive(Debug)]
pub struct HttpAnalysisService {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    agent_id: String,
    agent_alias_id: String,
}

impl HttpAnalysisService {
    /// Build a client from the analysis configuration.
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| AnalysisError::NotConfigured("endpoint URL is not set".into()))?;

        let client = reqwest::Client::builder()
            .timeout(INVOKE_TIMEOUT)
            .build()
            .map_err(|e| AnalysisError::ApiError(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            token: config.token.clone(),
            agent_id: config.agent_id.clone(),
            agent_alias_id: config.agent_alias_id.clone(),
        })
    }

    async fn post(&self, request: &InvokeRequest<'_>) -> Result<InvokeResponse, AnalysisError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(ref token) = self.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(AnalysisError::ApiError(format!(
                "agent invocation failed with HTTP {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(format!("invalid agent response: {e}")))
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn invoke(
        &self,
        session: &SessionIdentity,
        prompt: &str,
    ) -> Result<String, AnalysisError> {
        let request = InvokeRequest {
            agent_id: &self.agent_id,
            agent_alias_id: &self.agent_alias_id,
            session_id: &session.session_key,
            memory_id: session.memory_key.as_deref(),
            input_text: Some(prompt),
            end_session: false,
        };

        let response = self.post(&request).await?;
        match response.completion {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(AnalysisError::EmptyResponse),
        }
    }

    async fn end_session(&self, session: &SessionIdentity) -> Result<(), AnalysisError> {
        let request = InvokeRequest {
            agent_id: &self.agent_id,
            agent_alias_id: &self.agent_alias_id,
            session_id: &session.session_key,
            memory_id: session.memory_key.as_deref(),
            input_text: None,
            end_session: true,
        };

        // The completion, if any, is irrelevant for a terminal call.
        self.post(&request).await.map(|_| ())
    }
}

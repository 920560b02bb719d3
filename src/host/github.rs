//! GitHub REST adapter.
//!
//! Implements [`ChangeRequestHost`] against the GitHub v3 API, and loads
//! the trigger event from the payload file GitHub Actions provides. Only
//! `GITHUB_TOKEN` needs to be supplied by the workflow; the remaining
//! variables (`GITHUB_REPOSITORY`, `GITHUB_EVENT_PATH`, `GITHUB_API_URL`)
//! are set by the runner automatically.

use async_trait::async_trait;
use serde::Deserialize;

use super::{ChangeRequestHost, HostError};
use crate::constants;
use crate::env::Env;
use crate::models::{ChangeKind, ChangedFile, Comment, RequestRef};

/// Page size for list endpoints.
const PER_PAGE: usize = 100;

/// GitHub REST client scoped to one repository.
#[derive(Debug)]
pub struct GithubHost {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

/// The parsed trigger payload: the raw action string plus everything the
/// pipeline needs. The action is kept raw here so the caller decides how
/// to treat events we don't handle.
#[derive(Debug, Clone)]
pub struct EventPayload {
    pub action: String,
    pub merged: bool,
    pub request: RequestRef,
}

// Wire types for the fields we actually read.

#[derive(Deserialize)]
struct RawEvent {
    action: String,
    pull_request: RawPullRequest,
}

#[derive(Deserialize)]
struct RawPullRequest {
    id: u64,
    number: u64,
    #[serde(default)]
    merged: bool,
    head: RawHead,
}

#[derive(Deserialize)]
struct RawHead {
    sha: String,
}

#[derive(Deserialize)]
struct RawChangedFile {
    filename: String,
    status: String,
    patch: Option<String>,
}

#[derive(Deserialize)]
struct RawComment {
    user: RawUser,
    body: Option<String>,
}

#[derive(Deserialize)]
struct RawUser {
    login: String,
}

/// Load and parse the trigger event from the environment.
///
/// The repository coordinates come from `GITHUB_REPOSITORY`
/// (`owner/repo`); the event body from the JSON file at
/// `GITHUB_EVENT_PATH`. Events without a `pull_request` object are
/// rejected here; this tool only runs on change-request triggers.
pub async fn load_event(env: &Env) -> Result<EventPayload, HostError> {
    let repository = env.require(constants::ENV_GITHUB_REPOSITORY)?;
    let (owner, repo) = repository.split_once('/').ok_or_else(|| {
        HostError::EventPayload(format!("malformed repository coordinates: {repository:?}"))
    })?;

    let event_path = env.require(constants::ENV_GITHUB_EVENT_PATH)?;
    let raw = tokio::fs::read_to_string(&event_path)
        .await
        .map_err(|e| HostError::EventPayload(format!("cannot read {event_path}: {e}")))?;

    let event: RawEvent = serde_json::from_str(&raw)
        .map_err(|e| HostError::EventPayload(format!("cannot parse event payload: {e}")))?;

    Ok(EventPayload {
        action: event.action,
        merged: event.pull_request.merged,
        request: RequestRef {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number: event.pull_request.number,
            id: event.pull_request.id,
            head_sha: event.pull_request.head.sha,
        },
    })
}

impl GithubHost {
    /// Build a client from the environment.
    pub fn from_env(env: &Env) -> Result<Self, HostError> {
        let token = env.require(constants::ENV_GITHUB_TOKEN)?;
        let api_url = env
            .get(constants::ENV_GITHUB_API_URL)
            .unwrap_or_else(|| "https://api.github.com".to_string());

        let client = reqwest::Client::builder()
            .user_agent(format!(
                "{}/{}",
                constants::APP_NAME,
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| HostError::ApiError(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_url)
    }

    /// GET a JSON endpoint with auth headers.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        accept: &str,
    ) -> Result<T, HostError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", accept)
            .send()
            .await
            .map_err(|e| HostError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(HostError::ApiError(format!(
                "GET {url} failed with HTTP {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| HostError::ApiError(format!("invalid response from {url}: {e}")))
    }

    /// Drain a paginated list endpoint.
    async fn get_paginated<T: serde::de::DeserializeOwned>(
        &self,
        base_url: &str,
    ) -> Result<Vec<T>, HostError> {
        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            let url = format!("{base_url}?per_page={PER_PAGE}&page={page}");
            let batch: Vec<T> = self.get_json(&url, "application/vnd.github+json").await?;
            let batch_len = batch.len();
            items.extend(batch);
            if batch_len < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl ChangeRequestHost for GithubHost {
    async fn list_changed_files(
        &self,
        request: &RequestRef,
    ) -> Result<Vec<ChangedFile>, HostError> {
        let url = self.url(&format!(
            "repos/{}/{}/pulls/{}/files",
            request.owner, request.repo, request.number
        ));
        let raw: Vec<RawChangedFile> = self.get_paginated(&url).await?;

        Ok(raw
            .into_iter()
            .map(|f| {
                let kind: ChangeKind = f.status.parse().unwrap_or(ChangeKind::Other);
                ChangedFile::new(f.filename, kind, f.patch)
            })
            .collect())
    }

    async fn list_comments(&self, request: &RequestRef) -> Result<Vec<Comment>, HostError> {
        // Change-request conversation comments live on the issues endpoint.
        let url = self.url(&format!(
            "repos/{}/{}/issues/{}/comments",
            request.owner, request.repo, request.number
        ));
        let raw: Vec<RawComment> = self.get_paginated(&url).await?;

        Ok(raw
            .into_iter()
            .map(|c| Comment::new(c.user.login, c.body.unwrap_or_default()))
            .collect())
    }

    async fn fetch_content(
        &self,
        request: &RequestRef,
        path: &str,
    ) -> Result<String, HostError> {
        let url = self.url(&format!(
            "repos/{}/{}/contents/{}?ref={}",
            request.owner, request.repo, path, request.head_sha
        ));

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            // The raw media type skips the base64 detour of the JSON form.
            .header("Accept", "application/vnd.github.raw+json")
            .send()
            .await
            .map_err(|e| HostError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(HostError::ApiError(format!(
                "content fetch for {path} failed with HTTP {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| HostError::ApiError(format!("content fetch for {path}: {e}")))
    }

    async fn post_comment(&self, request: &RequestRef, body: &str) -> Result<(), HostError> {
        let url = self.url(&format!(
            "repos/{}/{}/issues/{}/comments",
            request.owner, request.repo, request.number
        ));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .map_err(|e| HostError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(HostError::ApiError(format!(
                "comment creation failed with HTTP {status}: {text}"
            )));
        }

        Ok(())
    }
}

//! Lookup orchestration
//!
//! Fans one HTTP POST per request out to the retrieval server, waits for all
//! of them to settle, and returns one outcome per request, index-aligned
//! with the input. A failed request never aborts its siblings.

use crate::error::RowError;
use crate::schema::{LookupRequest, VerseReference};
use anyhow::{Context, Result};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use url::Url;

/// What one lookup settled as. The key is the reference's identity and ties
/// the outcome back to its originating row.
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Success { key: String, text: String },
    Failure { key: String, error: RowError },
}

impl LookupOutcome {
    pub fn key(&self) -> &str {
        match self {
            LookupOutcome::Success { key, .. } => key,
            LookupOutcome::Failure { key, .. } => key,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success { .. })
    }
}

/// Request body the retrieval server expects.
#[derive(Serialize)]
struct WireRequest<'a> {
    version: &'a str,
    book: &'a str,
    chapter: &'a str,
    verses: &'a [u32],
    source: &'a str,
}

impl<'a> WireRequest<'a> {
    fn from_reference(reference: &'a VerseReference) -> Self {
        WireRequest {
            version: &reference.version,
            book: &reference.book,
            chapter: &reference.chapter,
            verses: &reference.verses,
            source: reference.source.label(),
        }
    }
}

/// Success body: at least a `text` field.
#[derive(Deserialize)]
struct WireResponse {
    text: String,
}

/// Structured error body the server emits on failure.
#[derive(Deserialize)]
struct WireError {
    error: String,
}

/// HTTP client for the retrieval server.
#[derive(Clone)]
pub struct LookupClient {
    http: reqwest::Client,
    base_url: Url,
}

impl LookupClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid endpoint URL: {}", base_url))?;
        let http = reqwest::Client::builder()
            .user_agent("bible-fetcher")
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(LookupClient { http, base_url })
    }

    /// Execute all requests concurrently and wait for every one to settle.
    ///
    /// Outcomes come back in input order: each task is joined in the order it
    /// was spawned, and a task that panics is replaced by a `Failure` carrying
    /// the key captured before dispatch, so no slot is ever lost.
    pub async fn execute(&self, requests: Vec<LookupRequest>) -> Vec<LookupOutcome> {
        let keys: Vec<String> = requests.iter().map(|r| r.key.clone()).collect();

        let tasks: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let client = self.clone();
                tokio::spawn(async move { client.lookup_one(request).await })
            })
            .collect();

        join_all(tasks)
            .await
            .into_iter()
            .zip(keys)
            .map(|(joined, key)| match joined {
                Ok(outcome) => outcome,
                Err(e) => LookupOutcome::Failure {
                    key,
                    error: RowError::Transport {
                        detail: format!("lookup task failed: {}", e),
                    },
                },
            })
            .collect()
    }

    async fn lookup_one(&self, request: LookupRequest) -> LookupOutcome {
        eprintln!("  -> {}", request.key);
        let key = request.key.clone();
        match self.dispatch(&request).await {
            Ok(text) => LookupOutcome::Success { key, text },
            Err(error) => LookupOutcome::Failure { key, error },
        }
    }

    async fn dispatch(&self, request: &LookupRequest) -> Result<String, RowError> {
        let endpoint = self
            .base_url
            .join(request.reference.source.endpoint_path())
            .map_err(|e| RowError::Transport {
                detail: format!("bad endpoint: {}", e),
            })?;

        let body = WireRequest::from_reference(&request.reference);
        let response = self
            .http
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| RowError::Transport {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            // Report the server's own error detail, not just the status.
            let raw = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<WireError>(&raw) {
                Ok(wire) => wire.error,
                Err(_) => raw,
            };
            return Err(RowError::Remote {
                detail: format!("{}: {}", status.as_u16(), detail),
            });
        }

        let payload: WireResponse = response.json().await.map_err(|e| RowError::Transport {
            detail: format!("invalid response body: {}", e),
        })?;
        Ok(payload.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{build_request, Row};

    fn request(book: &str, verse: &str) -> LookupRequest {
        build_request(&Row {
            source: "GPT".into(),
            version: "KJV".into(),
            book: book.into(),
            chapter: "3".into(),
            verse: verse.into(),
        })
        .unwrap()
    }

    #[test]
    fn test_wire_request_carries_label_and_verses() {
        let req = request("John", "16");
        let wire = WireRequest::from_reference(&req.reference);
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["source"], "GPT");
        assert_eq!(json["verses"], serde_json::json!([16]));
        assert_eq!(json["book"], "John");
    }

    #[test]
    fn test_wire_request_empty_verses_means_all() {
        let req = request("John", "");
        let wire = WireRequest::from_reference(&req.reference);
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["verses"], serde_json::json!([]));
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        assert!(LookupClient::new("not a url", 1000).is_err());
    }

    #[tokio::test]
    async fn test_execute_reports_transport_failure_per_request() {
        // Nothing listens here; both lookups must settle as failures.
        let client = LookupClient::new("http://127.0.0.1:9", 500).unwrap();
        let outcomes = client
            .execute(vec![request("John", "16"), request("Luke", "1-2")])
            .await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].key(), "John_3_16_KJV");
        assert_eq!(outcomes[1].key(), "Luke_3_1-2_KJV");
        for outcome in outcomes {
            match outcome {
                LookupOutcome::Failure { error, .. } => assert_eq!(error.kind(), "transport"),
                LookupOutcome::Success { .. } => panic!("expected failure"),
            }
        }
    }
}

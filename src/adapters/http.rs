use crate::domain::model::Candidate;
use crate::domain::ports::{Tagger, Validator};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Semaphore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct TagRequest<'a> {
    text: &'a str,
}

/// One span from the external ML tagger, with a character offset into the
/// input text.
#[derive(Debug, Deserialize)]
struct TaggedSpan {
    word: String,
    start: usize,
    entity_group: String,
}

/// Client for the external ML tagging service. Errors propagate so the
/// caller's fallback path can take over; the concurrency cap bounds how hard
/// we lean on the collaborator.
pub struct RemoteTagger {
    client: Client,
    endpoint: String,
    permits: Semaphore,
}

impl RemoteTagger {
    pub fn new(client: Client, endpoint: String, max_concurrent: usize) -> Self {
        Self {
            client,
            endpoint,
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }
}

#[async_trait]
impl Tagger for RemoteTagger {
    async fn tag(&self, headline: &str) -> Result<Vec<Candidate>> {
        let _permit = self.permits.acquire().await.map_err(|_| {
            crate::utils::error::NewsRankError::ProcessingError {
                message: "tagger semaphore closed".to_string(),
            }
        })?;

        let spans: Vec<TaggedSpan> = self
            .client
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&TagRequest { text: headline })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let candidates = spans
            .into_iter()
            .filter(|span| span.entity_group == "ORG")
            .map(|span| {
                let position = char_offset_to_word_position(headline, span.start);
                Candidate::new(span.word.trim(), position)
            })
            .collect();

        Ok(candidates)
    }
}

/// Converts a character offset into a zero-based word index by counting
/// whitespace-split tokens in the prefix.
fn char_offset_to_word_position(text: &str, char_start: usize) -> usize {
    let prefix: String = text.chars().take(char_start).collect();
    prefix.split_whitespace().count()
}

#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    entity: &'a str,
    context: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    is_company: bool,
}

/// Client for the external contextual validator. Fails open: any transport
/// or decode error is logged and reported as accept, so a flaky collaborator
/// never starves the pipeline of results.
pub struct RemoteValidator {
    client: Client,
    endpoint: String,
    permits: Semaphore,
}

impl RemoteValidator {
    pub fn new(client: Client, endpoint: String, max_concurrent: usize) -> Self {
        Self {
            client,
            endpoint,
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }

    async fn call(&self, entity: &str, headline: &str) -> Result<bool> {
        let _permit = self.permits.acquire().await.map_err(|_| {
            crate::utils::error::NewsRankError::ProcessingError {
                message: "validator semaphore closed".to_string(),
            }
        })?;

        let response: ValidateResponse = self
            .client
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&ValidateRequest {
                entity,
                context: headline,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.is_company)
    }
}

#[async_trait]
impl Validator for RemoteValidator {
    async fn validate(&self, entity: &str, headline: &str) -> bool {
        match self.call(entity, headline).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(
                    "External validator failed for '{}', accepting (fail-open): {}",
                    entity,
                    e
                );
                true
            }
        }
    }
}

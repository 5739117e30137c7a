//! HTTP client for the answer service: one `POST /ask` per question.

use crate::messages::{Answer, AskRequest};

/// Default endpoint of the answer service.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8010/ask";

/// Why a question produced no answer. Every variant is terminal for that question.
#[derive(Debug, thiserror::Error)]
pub enum AskError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("malformed answer body: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Answer service client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    top_k: Option<u32>,
}

impl Client {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            top_k: None,
        }
    }

    /// Ask the service for `top_k` retrieved articles instead of its own default.
    pub fn with_top_k(mut self, top_k: Option<u32>) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `query` and wait for the answer.
    ///
    /// A non-2xx status fails without reading the body. A 2xx body must carry a
    /// string `answer`; `sources` is optional.
    pub async fn ask(&self, query: &str) -> Result<Answer, AskError> {
        let body = AskRequest::new(query, self.top_k);
        log::debug!("POST {} query={:?}", self.endpoint, query);
        let response = self.http.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AskError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let answer = Answer::from_json(&text)?;
        log::debug!("answer received with {} source(s)", answer.sources.len());
        Ok(answer)
    }
}

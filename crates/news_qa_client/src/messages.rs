//! HTTP message types for the answer service. Client ↔ server JSON.

use serde::{Deserialize, Serialize};

/// Client → server: body of `POST /ask`.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl<'a> AskRequest<'a> {
    pub fn new(query: &'a str, top_k: Option<u32>) -> Self {
        Self { query, top_k }
    }
}

/// A cited reference attached to a bot answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

impl Source {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Server → client: success body as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
struct AskResponse {
    answer: String,
    #[serde(default)]
    sources: Option<Vec<Source>>,
}

/// A validated answer: markdown text plus its cited sources, in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<Source>,
}

impl Answer {
    /// Parse a success body. `answer` is required; `sources` may be absent or null.
    /// Anything else (wrong types, half-filled sources) is rejected.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let raw: AskResponse = serde_json::from_str(body)?;
        Ok(Answer {
            answer: raw.answer,
            sources: raw.sources.unwrap_or_default(),
        })
    }
}

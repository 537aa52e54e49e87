use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    StatusCode,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    dimension::{Dimension, DIMENSION_COUNT},
    error::{Error, Result},
    prompt::system_instruction,
};

const MAX_TOKENS: u32 = 500;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").expect("valid integer regex"));

/// Anything that can turn one prompt into one raw model response.
///
/// `bias_mode` selects the system instruction sent alongside the prompt.
#[async_trait]
pub trait Annotator {
    async fn request_annotation(&self, prompt: &str, bias_mode: bool) -> Result<String>;
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub timeout: Option<Duration>,
}

/// OpenAI-style chat-completions client
pub struct ChatClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }
}

/// Request body sent to the chat endpoint
pub fn request_body(model: &str, system: &str, prompt: &str, temperature: f64) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": prompt }
        ],
        "max_tokens": MAX_TOKENS,
        "temperature": temperature
    })
}

/// Pull `choices[0].message.content` out of a chat response
pub fn response_content(resp: &Value) -> Result<String> {
    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| Error::MalformedResponse(resp.to_string()))
}

#[async_trait]
impl Annotator for ChatClient {
    async fn request_annotation(&self, prompt: &str, bias_mode: bool) -> Result<String> {
        let system = system_instruction(bias_mode);
        let body = request_body(&self.config.model, system, prompt, self.config.temperature);
        let session_id = Uuid::new_v4().to_string();

        let resp = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .header("Session-ID", session_id)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await?;
            return Err(Error::RemoteCall {
                status: status.as_u16(),
                body,
            });
        }

        let resp_json: Value = resp.json().await?;
        response_content(&resp_json)
    }
}

/// Scores parsed from a single response, one slot per dimension
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunScores([Option<i64>; DIMENSION_COUNT]);

impl RunScores {
    pub fn get(&self, dim: Dimension) -> Option<i64> {
        self.0[dim.index()]
    }

    pub fn set(&mut self, dim: Dimension, score: i64) {
        self.0[dim.index()] = Some(score);
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

/// Scan a response line by line for `Strength:`, `Specificity:`,
/// `Persuasiveness:` and `Objectivity:` and take the last integer on each
/// matching line.
///
/// A label that never shows up, a matching line without a number and a
/// number outside the dimension's range all leave that dimension empty.
pub fn parse_scores(text: &str) -> RunScores {
    let mut scores = RunScores::default();
    for line in text.lines() {
        let Some(dim) = Dimension::ALL
            .into_iter()
            .find(|d| line.contains(&format!("{}:", d.label())))
        else {
            continue;
        };
        let Some(score) = INTEGER
            .find_iter(line)
            .last()
            .and_then(|m| m.as_str().parse::<i64>().ok())
        else {
            continue;
        };
        if !dim.in_range(score) {
            log::warn!("discarding out-of-range {} score {score}", dim.label());
            continue;
        }
        scores.set(dim, score);
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_score_lines() {
        let s = parse_scores("Strength: 2\nSpecificity: 1\nPersuasiveness: 0\nObjectivity: 1\n");
        assert_eq!(s.get(Dimension::Strength), Some(2));
        assert_eq!(s.get(Dimension::Specificity), Some(1));
        assert_eq!(s.get(Dimension::Persuasiveness), Some(0));
        assert_eq!(s.get(Dimension::Objectivity), Some(1));
    }

    #[test]
    fn missing_label_is_absent_not_error() {
        let s = parse_scores("Here you go:\nStrength: 1\nObjectivity: 0");
        assert_eq!(s.get(Dimension::Strength), Some(1));
        assert_eq!(s.get(Dimension::Specificity), None);
        assert_eq!(s.get(Dimension::Persuasiveness), None);
        assert_eq!(s.get(Dimension::Objectivity), Some(0));
    }

    #[test]
    fn decorated_lines_take_trailing_integer() {
        let s = parse_scores("  - **Strength:** 2\nSpecificity: n/a\n");
        assert_eq!(s.get(Dimension::Strength), Some(2));
        assert_eq!(s.get(Dimension::Specificity), None);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let s = parse_scores("Objectivity: 2\nStrength: 3");
        assert!(s.is_empty());
    }

    #[test]
    fn later_line_overrides_earlier() {
        let s = parse_scores("Strength: 1\nStrength: 2");
        assert_eq!(s.get(Dimension::Strength), Some(2));
    }

    #[test]
    fn body_carries_both_messages_and_limits() {
        let body = request_body("llama3.1", "sys", "prompt", 0.7);
        assert_eq!(body["model"], "llama3.1");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "sys");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "prompt");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["temperature"].to_string(), "0.7");
    }

    #[test]
    fn content_extraction_reports_layout_surprises() {
        let ok = json!({"choices": [{"message": {"content": "Strength: 2"}}]});
        assert_eq!(response_content(&ok).unwrap(), "Strength: 2");

        let bad = json!({"error": "nope"});
        assert!(matches!(response_content(&bad), Err(Error::MalformedResponse(_))));
    }
}

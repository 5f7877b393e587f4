//! Chat completion backend client and error classification
//!
//! One request per user turn: no retries, no streaming. Failures are
//! classified from their text so the CLI can suggest a fix.

use crate::config::BackendConfig;
use crate::error::{FilescopeError, Result};
use crate::llm::history::ChatHistory;
use crate::llm::request::{build_request, ChatRequest, ChatResponse};
use crate::processing::analyzer::AnalysisResult;
use aho_corasick::AhoCorasick;
use log::{debug, info};
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Failure category, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BackendErrorKind {
    QuotaExceeded,
    InvalidCredential,
    RateLimited,
    Connection,
    Other,
}

const ERROR_PATTERNS: &[(&str, BackendErrorKind)] = &[
    ("insufficient_quota", BackendErrorKind::QuotaExceeded),
    ("quota", BackendErrorKind::QuotaExceeded),
    ("billing", BackendErrorKind::QuotaExceeded),
    ("api_key", BackendErrorKind::InvalidCredential),
    ("api key", BackendErrorKind::InvalidCredential),
    ("unauthorized", BackendErrorKind::InvalidCredential),
    ("authentication", BackendErrorKind::InvalidCredential),
    ("rate limit", BackendErrorKind::RateLimited),
    ("rate_limit", BackendErrorKind::RateLimited),
    ("too many requests", BackendErrorKind::RateLimited),
    ("connection", BackendErrorKind::Connection),
    ("timed out", BackendErrorKind::Connection),
    ("dns error", BackendErrorKind::Connection),
];

fn error_matcher() -> &'static AhoCorasick {
    static MATCHER: OnceLock<AhoCorasick> = OnceLock::new();
    MATCHER.get_or_init(|| {
        AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(ERROR_PATTERNS.iter().map(|(pattern, _)| *pattern))
            .expect("Invalid backend error patterns")
    })
}

impl BackendErrorKind {
    /// Highest-priority category whose marker appears in `message`.
    pub fn classify(message: &str) -> Self {
        error_matcher()
            .find_overlapping_iter(message)
            .map(|m| ERROR_PATTERNS[m.pattern().as_usize()].1)
            .min()
            .unwrap_or(BackendErrorKind::Other)
    }

    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            BackendErrorKind::QuotaExceeded => {
                Some("The API quota has been exceeded. Check your plan and billing details.")
            }
            BackendErrorKind::InvalidCredential => Some(
                "The API key was rejected. Check that the configured API key environment variable is set correctly.",
            ),
            BackendErrorKind::RateLimited => {
                Some("Rate limit exceeded. Please wait a moment before trying again.")
            }
            BackendErrorKind::Connection => {
                Some("Connection error. Please check your internet connection.")
            }
            BackendErrorKind::Other => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: BackendErrorKind::classify(&message),
            message,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }

        let mut error = Self::new(message);
        if error.kind == BackendErrorKind::Other && (err.is_connect() || err.is_timeout()) {
            error.kind = BackendErrorKind::Connection;
        }
        error
    }

    /// Text to show the user: the raw failure plus a tailored hint when the
    /// category is recognized.
    pub fn user_message(&self) -> String {
        let mut text = format!("Failed to get a response from the chat backend: {}", self.message);
        if let Some(hint) = self.kind.remediation() {
            text.push_str("\n\n");
            text.push_str(hint);
        }
        text
    }
}

/// Client for an OpenAI-compatible chat completions endpoint. Build one at
/// startup and pass it by reference.
pub struct ChatClient {
    http: Client,
    config: BackendConfig,
    api_key: String,
}

impl ChatClient {
    /// Resolve the API key from the environment variable named in `config`.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            FilescopeError::Configuration(format!(
                "Environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &BackendConfig, api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FilescopeError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: config.clone(),
            api_key: api_key.into(),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Send one user turn, with attached analyses and recent history.
    pub async fn respond(
        &self,
        user_message: &str,
        attachments: &[AnalysisResult],
        history: &ChatHistory,
    ) -> std::result::Result<String, BackendError> {
        let request = build_request(&self.config, user_message, attachments, history);
        info!(
            "Sending chat request to {} ({} messages)",
            request.model,
            request.messages.len()
        );
        self.send(&request).await
    }

    async fn send(&self, request: &ChatRequest) -> std::result::Result<String, BackendError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(BackendError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::new(format!("API error ({}): {}", status, body)));
        }

        let parsed: ChatResponse = response.json().await.map_err(BackendError::from_reqwest)?;
        debug!("Received {} choices", parsed.choices.len());

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::new("Empty response from chat backend"))
    }
}

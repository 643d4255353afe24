//! OpenAI-compatible chat-completions wire protocol.
//!
//! Covers OpenAI, DeepSeek, and OpenRouter: `data: `-framed SSE lines, a
//! `[DONE]` sentinel, and deltas at `choices[0].delta.content`.

use crate::{Fragment, WireProtocol};
use comenius_error::{ComeniusResult, ProviderError, ProviderErrorKind};
use serde_json::{Value, json};

/// Protocol for `/chat/completions` SSE streams.
#[derive(Debug, Clone)]
pub struct OpenAiChatProtocol {
    model: String,
    api_key: String,
    temperature: f64,
    /// -1 omits the limit from the payload
    max_tokens: i64,
    extra_headers: Vec<(&'static str, String)>,
}

impl OpenAiChatProtocol {
    /// Create a protocol with a bearer token and no extra headers.
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        temperature: f64,
        max_tokens: i64,
    ) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            temperature,
            max_tokens,
            extra_headers: Vec::new(),
        }
    }

    /// OpenRouter wants referer/title attribution headers on every call.
    pub fn with_openrouter_headers(mut self) -> Self {
        self.extra_headers = vec![
            ("HTTP-Referer", "https://github.com/crumplecup/comenius".to_string()),
            ("X-Title", "Comenius".to_string()),
        ];
        self
    }
}

impl WireProtocol for OpenAiChatProtocol {
    fn endpoint(&self, base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Authorization", format!("Bearer {}", self.api_key))];
        headers.extend(self.extra_headers.iter().cloned());
        headers
    }

    fn payload(&self, prompt: &str) -> Value {
        let mut payload = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "stream": true,
            "temperature": self.temperature,
        });
        if self.max_tokens != -1 {
            payload["max_tokens"] = json!(self.max_tokens);
        }
        payload
    }

    fn parse_line(&self, line: &str) -> ComeniusResult<Fragment> {
        let mut line = line.trim();
        if line.is_empty() {
            return Ok(Fragment::Skip);
        }
        if let Some(rest) = line.strip_prefix("data:") {
            line = rest.trim_start();
        }
        if line == "[DONE]" {
            return Ok(Fragment::Done);
        }

        let Ok(data) = serde_json::from_str::<Value>(line) else {
            return Ok(Fragment::Skip);
        };

        if let Some(error) = data.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(ProviderError::new(ProviderErrorKind::StreamError(message)).into());
        }

        let delta = data
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("delta"))
            .and_then(|delta| delta.get("content"))
            .and_then(Value::as_str);

        match delta {
            Some(text) if !text.is_empty() => Ok(Fragment::Delta(text.to_string())),
            _ => Ok(Fragment::Skip),
        }
    }
}

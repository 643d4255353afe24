//! Ollama wire protocol.
//!
//! The generate API streams newline-delimited JSON objects with a
//! `response` text field and a final object carrying `done: true`.

use crate::{Fragment, WireProtocol};
use comenius_error::{ComeniusResult, ProviderError, ProviderErrorKind};
use serde_json::{Value, json};

/// Protocol for the Ollama `/api/generate` NDJSON stream.
#[derive(Debug, Clone)]
pub struct OllamaProtocol {
    model: String,
    temperature: f64,
}

impl OllamaProtocol {
    /// Create a protocol for a local model.
    pub fn new(model: impl Into<String>, temperature: f64) -> Self {
        Self {
            model: model.into(),
            temperature,
        }
    }
}

impl WireProtocol for OllamaProtocol {
    fn endpoint(&self, base_url: &str) -> String {
        format!("{}/api/generate", base_url.trim_end_matches('/'))
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn payload(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "prompt": prompt,
            "stream": true,
            "options": {
                "temperature": self.temperature,
            }
        })
    }

    fn parse_line(&self, line: &str) -> ComeniusResult<Fragment> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Fragment::Skip);
        }

        let Ok(data) = serde_json::from_str::<Value>(line) else {
            tracing::debug!(line = %&line[..line.len().min(100)], "Skipping undecodable Ollama frame");
            return Ok(Fragment::Skip);
        };

        if let Some(error) = data.get("error").and_then(Value::as_str) {
            return Err(
                ProviderError::new(ProviderErrorKind::StreamError(error.to_string())).into(),
            );
        }

        if let Some(text) = data.get("response").and_then(Value::as_str) {
            if !text.is_empty() {
                return Ok(Fragment::Delta(text.to_string()));
            }
        }

        if data.get("done").and_then(Value::as_bool) == Some(true) {
            return Ok(Fragment::Done);
        }

        Ok(Fragment::Skip)
    }

    fn health_endpoint(&self, base_url: &str) -> Option<String> {
        Some(format!("{}/api/version", base_url.trim_end_matches('/')))
    }
}

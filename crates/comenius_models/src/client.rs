//! HTTP text source driving a wire protocol.

use crate::{Fragment, WireProtocol};
use async_stream::try_stream;
use async_trait::async_trait;
use comenius_error::{ComeniusResult, HttpError, ProviderError, ProviderErrorKind};
use comenius_interface::{TextSource, TextStream};
use futures_util::StreamExt;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Streams model output over HTTP for any [`WireProtocol`].
///
/// The response body is decoded line by line; each line goes through the
/// protocol, which yields text deltas, an end sentinel, or skips.
#[derive(Clone)]
pub struct HttpTextSource {
    client: Client,
    base_url: String,
    provider: &'static str,
    model: String,
    protocol: Arc<dyn WireProtocol>,
}

impl std::fmt::Debug for HttpTextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTextSource")
            .field("base_url", &self.base_url)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl HttpTextSource {
    /// Create a source for a provider protocol.
    pub fn new(
        provider: &'static str,
        base_url: impl Into<String>,
        model: impl Into<String>,
        protocol: Arc<dyn WireProtocol>,
    ) -> Self {
        let base_url = base_url.into();
        let model = model.into();
        debug!(provider, url = %base_url, model = %model, "Creating text source");
        Self {
            client: Client::new(),
            base_url,
            provider,
            model,
            protocol,
        }
    }

    /// Check that the backend is reachable.
    ///
    /// Providers without a health endpoint pass trivially; Ollama exposes
    /// `/api/version`, which also catches a stopped local server early.
    #[instrument(skip(self), fields(provider = self.provider))]
    pub async fn validate(&self) -> ComeniusResult<()> {
        let Some(url) = self.protocol.health_endpoint(&self.base_url) else {
            return Ok(());
        };

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "Health probe failed");
            ProviderError::new(ProviderErrorKind::ServerUnreachable(self.base_url.clone()))
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(ProviderErrorKind::ApiError { status, message }).into());
        }

        debug!("Backend validated");
        Ok(())
    }
}

#[async_trait]
impl TextSource for HttpTextSource {
    #[instrument(skip(self, prompt), fields(provider = self.provider, model = %self.model, prompt_len = prompt.len()))]
    async fn stream_text(&self, prompt: &str) -> ComeniusResult<TextStream> {
        let url = self.protocol.endpoint(&self.base_url);
        let payload = self.protocol.payload(prompt);

        debug!(url = %url, "Sending generation request");

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload);
        for (name, value) in self.protocol.headers() {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(status, "Backend returned error status");
            return Err(ProviderError::new(ProviderErrorKind::ApiError { status, message }).into());
        }

        let protocol = Arc::clone(&self.protocol);
        let mut body = response.bytes_stream();

        let stream = try_stream! {
            let mut buffer = String::new();
            'outer: while let Some(chunk) = body.next().await {
                let bytes = chunk
                    .map_err(|e| HttpError::new(format!("Stream read failed: {}", e)))?;
                buffer.push_str(&String::from_utf8_lossy(&bytes));

                // Drain complete lines; partial lines wait for more bytes.
                while let Some(newline) = buffer.find('\n') {
                    let line: String = buffer.drain(..=newline).collect();
                    match protocol.parse_line(&line)? {
                        Fragment::Delta(text) => yield text,
                        Fragment::Done => break 'outer,
                        Fragment::Skip => {}
                    }
                }
            }

            // Trailing partial line without a newline terminator.
            if !buffer.trim().is_empty() {
                if let Fragment::Delta(text) = protocol.parse_line(&buffer)? {
                    yield text;
                }
            }
        };

        Ok(Box::pin(stream))
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

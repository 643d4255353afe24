//! Provider configuration types and layered loading.

use crate::{HttpTextSource, OllamaProtocol, OpenAiChatProtocol};
use comenius_error::{ComeniusError, ComeniusResult, ConfigError, ProviderError, ProviderErrorKind};
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Which backend family serves generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama server
    Ollama,
    /// OpenAI chat-completions API
    Openai,
    /// DeepSeek chat-completions API
    Deepseek,
    /// OpenRouter chat-completions gateway
    Openrouter,
}

impl ProviderKind {
    /// Stable lowercase name, matching the configuration keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Openai => "openai",
            Self::Deepseek => "deepseek",
            Self::Openrouter => "openrouter",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = ComeniusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::Openai),
            "deepseek" => Ok(Self::Deepseek),
            "openrouter" => Ok(Self::Openrouter),
            other => Err(
                ProviderError::new(ProviderErrorKind::UnsupportedProvider(other.to_string()))
                    .into(),
            ),
        }
    }
}

/// Connection settings for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ProviderSettings {
    /// API base URL
    base_url: String,
    /// Model identifier
    model: String,
    /// Bearer token; unused by Ollama
    #[serde(default)]
    api_key: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    temperature: f64,
    /// Output token cap; -1 omits the limit from requests
    #[serde(default = "default_max_tokens")]
    max_tokens: i64,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> i64 {
    1024
}

/// Full provider configuration: a default provider plus per-provider blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ProvidersConfig {
    /// Provider used when the caller does not name one
    default_provider: ProviderKind,
    /// Ollama settings
    ollama: ProviderSettings,
    /// OpenAI settings
    openai: ProviderSettings,
    /// DeepSeek settings
    deepseek: ProviderSettings,
    /// OpenRouter settings
    openrouter: ProviderSettings,
}

impl ProvidersConfig {
    /// Load configuration with precedence: env > current dir > home dir >
    /// bundled defaults.
    ///
    /// User config files are optional and silently skipped if absent.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use comenius_models::ProvidersConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ProvidersConfig::load()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> ComeniusResult<Self> {
        debug!("Loading provider configuration");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../comenius.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        // User config from home directory (optional)
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/comenius/comenius.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        // User config from current directory (optional)
        builder = builder.add_source(File::with_name("comenius").required(false));

        // Environment overrides, e.g. COMENIUS__OPENAI__API_KEY
        builder = builder.add_source(
            config::Environment::with_prefix("COMENIUS")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .map_err(|e| {
                ComeniusError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ComeniusError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Settings block for a provider.
    pub fn settings(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Ollama => &self.ollama,
            ProviderKind::Openai => &self.openai,
            ProviderKind::Deepseek => &self.deepseek,
            ProviderKind::Openrouter => &self.openrouter,
        }
    }

    /// Build a text source for the default provider.
    pub fn source(&self) -> ComeniusResult<HttpTextSource> {
        self.source_for(self.default_provider)
    }

    /// Build a text source for a named provider.
    ///
    /// Remote providers fail fast here when no API key is configured,
    /// rather than on the first streamed request.
    #[instrument(skip(self), fields(provider = kind.as_str()))]
    pub fn source_for(&self, kind: ProviderKind) -> ComeniusResult<HttpTextSource> {
        let settings = self.settings(kind);

        if kind != ProviderKind::Ollama && settings.api_key.is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::MissingApiKey(
                kind.as_str().to_string(),
            ))
            .into());
        }

        let chat = |protocol: OpenAiChatProtocol| {
            HttpTextSource::new(
                kind.as_str(),
                settings.base_url.clone(),
                settings.model.clone(),
                Arc::new(protocol),
            )
        };

        let source = match kind {
            ProviderKind::Ollama => HttpTextSource::new(
                kind.as_str(),
                settings.base_url.clone(),
                settings.model.clone(),
                Arc::new(OllamaProtocol::new(
                    settings.model.clone(),
                    settings.temperature,
                )),
            ),
            ProviderKind::Openai | ProviderKind::Deepseek => chat(OpenAiChatProtocol::new(
                settings.model.clone(),
                settings.api_key.clone(),
                settings.temperature,
                settings.max_tokens,
            )),
            ProviderKind::Openrouter => chat(
                OpenAiChatProtocol::new(
                    settings.model.clone(),
                    settings.api_key.clone(),
                    settings.temperature,
                    settings.max_tokens,
                )
                .with_openrouter_headers(),
            ),
        };

        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED: &str = include_str!("../../../comenius.toml");

    fn bundled() -> ProvidersConfig {
        toml::from_str(BUNDLED).unwrap()
    }

    #[test]
    fn bundled_defaults_parse() {
        let config = bundled();
        assert_eq!(*config.default_provider(), ProviderKind::Ollama);
        assert_eq!(config.settings(ProviderKind::Ollama).model(), "deepseek-r1:8b");
        assert_eq!(*config.settings(ProviderKind::Ollama).max_tokens(), -1);
    }

    #[test]
    fn ollama_source_needs_no_key() {
        let source = bundled().source().unwrap();
        assert_eq!(
            comenius_interface::TextSource::provider_name(&source),
            "ollama"
        );
    }

    #[test]
    fn remote_provider_without_key_fails_fast() {
        let err = bundled().source_for(ProviderKind::Deepseek).unwrap_err();
        assert!(format!("{}", err).contains("Missing API key"));
    }

    #[test]
    fn provider_kind_round_trips_from_str() {
        assert_eq!(
            "openrouter".parse::<ProviderKind>().unwrap(),
            ProviderKind::Openrouter
        );
        assert!("acme".parse::<ProviderKind>().is_err());
    }
}

/*!
 * Core translation pipeline.
 *
 * `Translator` wraps a provider behind the `Translate` capability and adds
 * the two concerns every caller needs: a glossary short-circuit (a glossary
 * hit never touches the network) and a fixed delay between provider calls
 * to stay under API rate limits.
 */

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::info;

use crate::app_config::Config;
use crate::errors::{ProviderError, TranslationError};
use crate::glossary::Glossary;
use crate::providers::deepseek::{ChatRequest, DeepSeekClient};
use crate::providers::Translate;

/// Glossary-aware translator used by the whole application
pub struct Translator {
    provider: Arc<dyn Translate>,
    glossary: Glossary,
    request_delay: Duration,
}

impl Translator {
    /// Build a translator from the application configuration
    pub fn new(config: &Config) -> Result<Self, TranslationError> {
        let translation = &config.translation;
        let provider = translation.active_provider().ok_or_else(|| {
            TranslationError::Config(format!(
                "no settings for provider {}",
                translation.provider
            ))
        })?;
        let client = DeepSeekClient::with_retries(
            provider.api_key.clone(),
            provider.endpoint.clone(),
            provider.timeout_secs,
            translation.common.retry_count,
            translation.common.retry_backoff_ms,
        );
        let chat = ChatTranslator {
            client,
            model: provider.model.clone(),
            system_prompt: translation.common.system_prompt.clone(),
            temperature: translation.common.temperature,
        };
        Ok(Translator {
            provider: Arc::new(chat),
            glossary: Glossary::from_config(&config.glossary),
            request_delay: Duration::from_millis(translation.common.rate_limit_delay_ms),
        })
    }

    /// Build a translator from explicit parts (used by tests)
    pub fn with_parts(
        provider: Arc<dyn Translate>,
        glossary: Glossary,
        request_delay: Duration,
    ) -> Self {
        Translator {
            provider,
            glossary,
            request_delay,
        }
    }
}

#[async_trait]
impl Translate for Translator {
    async fn translate(&self, text: &str, language: &str) -> Result<String, TranslationError> {
        if let Some(hit) = self.glossary.lookup(text, language) {
            return Ok(hit);
        }
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
        let translated = self.provider.translate(text, language).await?;
        info!("{} --> {}", text, translated);
        Ok(translated)
    }
}

/// Adapter from the chat-completion client to the `Translate` capability
struct ChatTranslator {
    client: DeepSeekClient,
    model: String,
    system_prompt: String,
    temperature: f32,
}

#[async_trait]
impl Translate for ChatTranslator {
    async fn translate(&self, text: &str, language: &str) -> Result<String, TranslationError> {
        let prompt = self.system_prompt.replace("{language}", language);
        let request = ChatRequest::new(&self.model)
            .add_message("system", prompt)
            .add_message("user", text)
            .temperature(self.temperature);
        let response = self.client.complete(request).await?;
        let content = response.text().ok_or_else(|| {
            TranslationError::Provider(ProviderError::ParseError(
                "chat response contained no choices".to_string(),
            ))
        })?;
        Ok(content.trim().to_string())
    }
}

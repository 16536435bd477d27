/*!
 * Translation provider interfaces and implementations.
 *
 * This module contains the object-safe `Translate` capability plus client
 * implementations for OpenAI-compatible chat-completion APIs and a mock
 * provider for testing.
 */

use async_trait::async_trait;

use crate::errors::TranslationError;

pub mod deepseek;
pub mod mock;

pub use deepseek::DeepSeekClient;
pub use mock::{MockBehavior, MockTranslator};

/// The single capability the rest of the pipeline depends on: turn a piece
/// of text into its translation for one target language.
#[async_trait]
pub trait Translate: Send + Sync {
    async fn translate(&self, text: &str, language: &str) -> Result<String, TranslationError>;
}

/*!
 * Mock translation provider for testing.
 *
 * Deterministic behaviors plus a shared call counter so tests can assert
 * how often (or that never) the provider was reached.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{ProviderError, TranslationError};
use crate::providers::Translate;

/// What the mock does with each request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Return the input unchanged
    Echo,
    /// Uppercase the input
    Uppercase,
    /// Prefix the input with the target language in brackets
    Prefixed,
    /// Fail every call with a connection error
    Failing,
}

/// A test double implementing `Translate`
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    call_count: Arc<AtomicUsize>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        MockTranslator {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    pub fn prefixed() -> Self {
        Self::new(MockBehavior::Prefixed)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of translate calls across all clones of this mock
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translate for MockTranslator {
    async fn translate(&self, text: &str, language: &str) -> Result<String, TranslationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::Echo => Ok(text.to_string()),
            MockBehavior::Uppercase => Ok(text.to_uppercase()),
            MockBehavior::Prefixed => Ok(format!("[{}] {}", language, text)),
            MockBehavior::Failing => Err(TranslationError::Provider(
                ProviderError::ConnectionError("mock provider is configured to fail".to_string()),
            )),
        }
    }
}

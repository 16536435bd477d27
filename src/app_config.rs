/*!
 * Configuration management for the application.
 *
 * The configuration lives in a `conf.json` next to the binary. Every field
 * has a serde default so a partial file (or none at all) still yields a
 * working configuration; `load_or_create` writes the defaults back out on
 * first run so users have something to edit.
 */

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Languages to translate into, in insertion order
    #[serde(default = "default_target_languages")]
    pub target_languages: Vec<String>,

    /// Glossary settings
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Translation provider settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Template classifier settings
    #[serde(default)]
    pub classifier: ClassifierSettings,

    /// Log level for the application
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target_languages: default_target_languages(),
            glossary: GlossaryConfig::default(),
            translation: TranslationConfig::default(),
            classifier: ClassifierSettings::default(),
            log_level: LogLevel::default(),
        }
    }
}

fn default_target_languages() -> Vec<String> {
    vec!["英语".to_string(), "越南语".to_string()]
}

/// Glossary file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossaryConfig {
    /// Directory holding the glossary JSON files
    #[serde(default = "default_glossary_dir")]
    pub dir: PathBuf,

    /// Language -> file name within `dir`
    #[serde(default = "default_glossary_files")]
    pub files: HashMap<String, String>,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        GlossaryConfig {
            dir: default_glossary_dir(),
            files: default_glossary_files(),
        }
    }
}

fn default_glossary_dir() -> PathBuf {
    PathBuf::from("glossary")
}

fn default_glossary_files() -> HashMap<String, String> {
    let mut files = HashMap::new();
    files.insert("英语".to_string(), "glossary_en.json".to_string());
    files.insert("越南语".to_string(), "glossary_vi.json".to_string());
    files
}

/// Available translation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// DeepSeek chat API (default)
    #[default]
    DeepSeek,
    /// OpenAI chat API
    OpenAI,
}

impl fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationProvider::DeepSeek => write!(f, "deepseek"),
            TranslationProvider::OpenAI => write!(f, "openai"),
        }
    }
}

impl FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deepseek" => Ok(TranslationProvider::DeepSeek),
            "openai" => Ok(TranslationProvider::OpenAI),
            other => Err(anyhow!("unknown translation provider: {}", other)),
        }
    }
}

/// Settings for one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which provider these settings belong to
    #[serde(rename = "type")]
    pub provider_type: TranslationProvider,

    /// Model identifier
    #[serde(default)]
    pub model: String,

    /// API key (bearer token)
    #[serde(default)]
    pub api_key: String,

    /// API endpoint base URL
    #[serde(default)]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl ProviderConfig {
    pub fn new(provider_type: TranslationProvider) -> Self {
        let (model, endpoint) = match provider_type {
            TranslationProvider::DeepSeek => ("deepseek-chat", "https://api.deepseek.com"),
            TranslationProvider::OpenAI => ("gpt-4o-mini", "https://api.openai.com/v1"),
        };
        ProviderConfig {
            provider_type,
            model: model.to_string(),
            api_key: String::new(),
            endpoint: endpoint.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Translation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// The active provider
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Settings for each known provider
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// Settings shared by all providers
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            provider: TranslationProvider::default(),
            available_providers: default_available_providers(),
            common: TranslationCommonConfig::default(),
        }
    }
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(TranslationProvider::DeepSeek),
        ProviderConfig::new(TranslationProvider::OpenAI),
    ]
}

impl TranslationConfig {
    /// Settings of the active provider
    pub fn active_provider(&self) -> Option<&ProviderConfig> {
        self.available_providers
            .iter()
            .find(|p| p.provider_type == self.provider)
    }

    pub fn get_model(&self) -> String {
        self.active_provider()
            .map(|p| p.model.clone())
            .unwrap_or_default()
    }

    pub fn get_api_key(&self) -> String {
        self.active_provider()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    pub fn get_endpoint(&self) -> String {
        self.active_provider()
            .map(|p| p.endpoint.clone())
            .unwrap_or_default()
    }

    pub fn get_timeout_secs(&self) -> u64 {
        self.active_provider()
            .map(|p| p.timeout_secs)
            .unwrap_or_else(default_timeout_secs)
    }
}

/// Common translation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationCommonConfig {
    /// System prompt; `{language}` is replaced by the target language
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Delay between provider calls in milliseconds
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Number of attempts for a failing request
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base sleep for the linear retry backoff in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        TranslationCommonConfig {
            system_prompt: default_system_prompt(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

fn default_system_prompt() -> String {
    "你是一名工业领域翻译工作者，请将用户发送的内容翻译成{language}，保持专业术语的准确性。只返回翻译后的文本，不要添加任何解释或注释。".to_string()
}

fn default_rate_limit_delay_ms() -> u64 {
    500
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.5
}

/// Template classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Literal heading of the revision-record table's first cell
    #[serde(default = "default_revision_header")]
    pub revision_header: String,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        ClassifierSettings {
            revision_header: default_revision_header(),
        }
    }
}

fn default_revision_header() -> String {
    "版本".to_string()
}

/// Log levels for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {:?}", path.as_ref()))?;
        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load the configuration, writing the defaults out first if the file
    /// does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Config::default();
            let json = serde_json::to_string_pretty(&config)?;
            std::fs::write(path.as_ref(), json)
                .with_context(|| format!("Failed to write default config {:?}", path.as_ref()))?;
            Ok(config)
        }
    }

    /// Check that the configuration is usable for real translation runs
    pub fn validate(&self) -> Result<()> {
        if self.target_languages.is_empty() {
            return Err(anyhow!("target_languages must not be empty"));
        }
        let provider = self
            .translation
            .active_provider()
            .ok_or_else(|| anyhow!("no settings for provider {}", self.translation.provider))?;
        if provider.model.is_empty() {
            return Err(anyhow!("provider model must not be empty"));
        }
        if provider.api_key.is_empty() {
            return Err(anyhow!(
                "api_key for provider {} is empty",
                provider.provider_type
            ));
        }
        url::Url::parse(&provider.endpoint)
            .map_err(|e| anyhow!("invalid endpoint {}: {}", provider.endpoint, e))?;
        Ok(())
    }
}

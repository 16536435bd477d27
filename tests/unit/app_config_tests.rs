/*!
 * Tests for configuration loading, defaults and validation
 */

use anyhow::Result;
use doctrans::app_config::{Config, TranslationProvider};

use crate::common;

#[test]
fn test_default_config_shouldCarryTemplateDefaults() {
    let config = Config::default();
    assert_eq!(config.target_languages, vec!["英语", "越南语"]);
    assert_eq!(config.translation.provider, TranslationProvider::DeepSeek);
    assert_eq!(config.translation.get_model(), "deepseek-chat");
    assert_eq!(config.translation.get_endpoint(), "https://api.deepseek.com");
    assert_eq!(config.classifier.revision_header, "版本");
    assert!(config
        .translation
        .common
        .system_prompt
        .contains("{language}"));
}

#[test]
fn test_from_partial_json_shouldFillDefaults() -> Result<()> {
    let config: Config = serde_json::from_str("{}")?;
    assert_eq!(config.target_languages, vec!["英语", "越南语"]);
    assert_eq!(config.translation.common.retry_count, 3);
    assert_eq!(config.translation.common.retry_backoff_ms, 1000);
    assert_eq!(config.translation.common.rate_limit_delay_ms, 500);
    Ok(())
}

#[test]
fn test_provider_selection_shouldSwitchActiveSettings() -> Result<()> {
    let json = r#"{"translation": {"provider": "openai"}}"#;
    let config: Config = serde_json::from_str(json)?;
    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.translation.get_model(), "gpt-4o-mini");
    assert_eq!(config.translation.get_endpoint(), "https://api.openai.com/v1");
    Ok(())
}

#[test]
fn test_serde_roundtrip_shouldPreserveConfig() -> Result<()> {
    let mut config = Config::default();
    config.target_languages = vec!["英语".to_string()];
    let json = serde_json::to_string_pretty(&config)?;
    // provider entries serialize their kind under "type"
    assert!(json.contains("\"type\": \"deepseek\""));
    let reparsed: Config = serde_json::from_str(&json)?;
    assert_eq!(reparsed.target_languages, vec!["英语"]);
    assert_eq!(reparsed.translation.get_model(), config.translation.get_model());
    Ok(())
}

#[test]
fn test_validate_withEmptyApiKey_shouldFail() {
    let config = Config::default();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withApiKeyAndEndpoint_shouldPass() {
    let mut config = Config::default();
    for provider in &mut config.translation.available_providers {
        provider.api_key = "sk-test".to_string();
    }
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withBadEndpoint_shouldFail() {
    let mut config = Config::default();
    for provider in &mut config.translation.available_providers {
        provider.api_key = "sk-test".to_string();
        provider.endpoint = "not a url".to_string();
    }
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withNoTargetLanguages_shouldFail() {
    let mut config = Config::default();
    config.target_languages.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.target_languages, vec!["英语", "越南语"]);

    // second load reads the file it just wrote
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.target_languages, config.target_languages);
    Ok(())
}

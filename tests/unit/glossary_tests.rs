/*!
 * Tests for glossary loading, lookup normalization and the translator's
 * glossary short-circuit
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use doctrans::glossary::Glossary;
use doctrans::providers::{MockTranslator, Translate};
use doctrans::translation::Translator;

use crate::common;

fn glossary_with(dir: &std::path::Path, language: &str, file: &str) -> Glossary {
    let mut files = HashMap::new();
    files.insert(language.to_string(), file.to_string());
    Glossary::new(dir.to_path_buf(), files)
}

#[test]
fn test_lookup_withExactTerm_shouldReturnMapping() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "glossary_en.json",
        r#"{"文件编号": "Document No.", "版本": "Version"}"#,
    )?;
    let glossary = glossary_with(temp_dir.path(), "英语", "glossary_en.json");

    assert_eq!(
        glossary.lookup("文件编号", "英语").as_deref(),
        Some("Document No.")
    );
    assert_eq!(glossary.lookup("版本", "英语").as_deref(), Some("Version"));
    assert_eq!(glossary.lookup("未知词", "英语"), None);
    Ok(())
}

#[test]
fn test_lookup_withSpacedQuery_shouldStripAsciiAndFullWidthSpaces() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "glossary_en.json",
        r#"{"文件 编号": "Document No."}"#,
    )?;
    let glossary = glossary_with(temp_dir.path(), "英语", "glossary_en.json");

    // both the stored key and the query are normalized
    assert_eq!(
        glossary.lookup("文件编号", "英语").as_deref(),
        Some("Document No.")
    );
    assert_eq!(
        glossary.lookup("文件\u{3000}编 号", "英语").as_deref(),
        Some("Document No.")
    );
    Ok(())
}

#[test]
fn test_lookup_withMissingFile_shouldReturnNone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let glossary = glossary_with(temp_dir.path(), "英语", "does_not_exist.json");
    assert_eq!(glossary.lookup("文件编号", "英语"), None);
    Ok(())
}

#[test]
fn test_lookup_withMalformedFile_shouldReturnNone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "glossary_en.json",
        "not json at all",
    )?;
    let glossary = glossary_with(temp_dir.path(), "英语", "glossary_en.json");
    assert_eq!(glossary.lookup("文件编号", "英语"), None);
    Ok(())
}

#[test]
fn test_lookup_withUnconfiguredLanguage_shouldReturnNone() {
    let glossary = Glossary::empty();
    assert_eq!(glossary.lookup("文件编号", "法语"), None);
}

#[tokio::test]
async fn test_translator_withGlossaryHit_shouldNotCallProvider() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "glossary_en.json",
        r#"{"文件编号": "Document No."}"#,
    )?;
    let glossary = glossary_with(temp_dir.path(), "英语", "glossary_en.json");
    let mock = MockTranslator::echo();
    let translator = Translator::with_parts(Arc::new(mock.clone()), glossary, Duration::ZERO);

    let out = translator.translate("文件编号", "英语").await?;

    assert_eq!(out, "Document No.");
    assert_eq!(mock.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_translator_withGlossaryMiss_shouldFallBackToProvider() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "glossary_en.json",
        r#"{"文件编号": "Document No."}"#,
    )?;
    let glossary = glossary_with(temp_dir.path(), "英语", "glossary_en.json");
    let mock = MockTranslator::prefixed();
    let translator = Translator::with_parts(Arc::new(mock.clone()), glossary, Duration::ZERO);

    let out = translator.translate("其他文本", "英语").await?;

    assert_eq!(out, "[英语] 其他文本");
    assert_eq!(mock.call_count(), 1);
    Ok(())
}

/*!
 * Tests for file utility functions
 */

use std::fs;
use anyhow::Result;
use doctrans::file_utils::{FileManager, OfficeFileType, OUTPUT_DIR_NAME};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(&temp_dir.path().to_path_buf(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(test_file.to_str().unwrap()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that dir_exists returns false for non-existent directories
#[test]
fn test_dir_exists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("test_subdir");

    FileManager::ensure_dir(&test_subdir)?;

    assert!(test_subdir.exists());
    assert!(test_subdir.is_dir());

    Ok(())
}

/// Test the Word output naming scheme
#[test]
fn test_docx_output_path_withValidInput_shouldUseTimestampedName() {
    let input = std::path::Path::new("/tmp/input/作业指导书.docx");
    let output_dir = std::path::Path::new("/tmp/input/translate_output");

    let output = FileManager::docx_output_path(input, output_dir);
    let name = output.file_name().unwrap().to_str().unwrap();

    assert!(output.starts_with(output_dir));
    assert!(name.starts_with("作业指导书_translate_"));
    assert!(name.ends_with(".docx"));
    // 12-digit timestamp between prefix and extension
    let digits = name
        .trim_start_matches("作业指导书_translate_")
        .trim_end_matches(".docx");
    assert_eq!(digits.len(), 12);
    assert!(digits.chars().all(|c| c.is_ascii_digit()));
}

/// Test the Excel output naming scheme
#[test]
fn test_xlsx_output_path_withTwoLanguages_shouldJoinWithAmpersand() {
    let input = std::path::Path::new("/tmp/input/清单.xlsx");
    let output_dir = std::path::Path::new("/tmp/out");
    let languages = vec!["英语".to_string(), "越南语".to_string()];

    let output = FileManager::xlsx_output_path(input, output_dir, &languages);
    let name = output.file_name().unwrap().to_str().unwrap();

    assert!(name.starts_with("清单_tran_英语&越南语_"));
    assert!(name.ends_with(".xlsx"));
}

/// Test that discovery skips lock files and the output directory
#[test]
fn test_find_office_files_withMixedContent_shouldFilterCorrectly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "a.docx", "x")?;
    common::create_test_file(&dir, "~$a.docx", "x")?;
    common::create_test_file(&dir, "b.xlsx", "x")?;
    common::create_test_file(&dir, "notes.txt", "x")?;
    let output_dir = dir.join(OUTPUT_DIR_NAME);
    fs::create_dir_all(&output_dir)?;
    common::create_test_file(&output_dir, "old_translate.docx", "x")?;

    let docx = FileManager::find_office_files(&dir, OfficeFileType::Docx)?;
    let xlsx = FileManager::find_office_files(&dir, OfficeFileType::Xlsx)?;

    assert_eq!(docx.len(), 1);
    assert!(docx[0].ends_with("a.docx"));
    assert_eq!(xlsx.len(), 1);
    assert!(xlsx[0].ends_with("b.xlsx"));

    Ok(())
}

/// Test that append_to_log_file accumulates timestamped lines
#[test]
fn test_append_to_log_file_withTwoMessages_shouldAppendBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("warning.txt");

    FileManager::append_to_log_file(&log_path, "first message")?;
    FileManager::append_to_log_file(&log_path, "second message")?;

    let content = fs::read_to_string(&log_path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('['));
    assert!(lines[0].ends_with("first message"));
    assert!(lines[1].ends_with("second message"));

    Ok(())
}

/*!
 * File system utilities for the application.
 *
 * Covers input discovery (office files in a folder, skipping editor lock
 * files and our own output directory), timestamped output naming, and the
 * append-only warning log written next to translated files.
 */

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use walkdir::WalkDir;

/// Name of the output directory created inside the input folder
pub const OUTPUT_DIR_NAME: &str = "translate_output";

/// Name of the warning log inside the output directory
pub const WARNING_LOG_NAME: &str = "warning.txt";

/// Timestamp format used in output file names
const FILE_TIMESTAMP_FORMAT: &str = "%y%m%d%H%M%S";

/// Kinds of office files the batch runs operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfficeFileType {
    Docx,
    Xlsx,
}

impl OfficeFileType {
    pub fn extension(&self) -> &'static str {
        match self {
            OfficeFileType::Docx => "docx",
            OfficeFileType::Xlsx => "xlsx",
        }
    }
}

/// Utility struct for file system operations
pub struct FileManager;

impl FileManager {
    /// Check if a file exists
    pub fn file_exists(path: &str) -> bool {
        Path::new(path).is_file()
    }

    /// Check if a directory exists
    pub fn dir_exists(path: &str) -> bool {
        Path::new(path).is_dir()
    }

    /// Create a directory and its parents if missing
    pub fn ensure_dir(path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string(path: &str) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
    }

    /// Write a string to a file, creating it if needed
    pub fn write_to_file(path: &str, content: &str) -> Result<()> {
        fs::write(path, content).with_context(|| format!("Failed to write file {:?}", path))
    }

    /// Find office files of one type directly under `dir`, skipping editor
    /// lock files (`~$...`) and anything inside the output directory.
    pub fn find_office_files(dir: &Path, file_type: OfficeFileType) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).max_depth(1).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let extension_matches = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(file_type.extension()))
                .unwrap_or(false);
            if !extension_matches {
                continue;
            }
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with("~$") {
                continue;
            }
            if path.components().any(|c| c.as_os_str() == OUTPUT_DIR_NAME) {
                continue;
            }
            files.push(path.to_path_buf());
        }
        files.sort();
        Ok(files)
    }

    /// Output path for a translated Word document:
    /// `{output_dir}/{stem}_translate_{timestamp}.docx`
    pub fn docx_output_path(input_file: &Path, output_dir: &Path) -> PathBuf {
        let stem = input_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let timestamp = Local::now().format(FILE_TIMESTAMP_FORMAT);
        output_dir.join(format!("{}_translate_{}.docx", stem, timestamp))
    }

    /// Output path for a translated workbook:
    /// `{output_dir}/{stem}_tran_{lang1&lang2}_{timestamp}.xlsx`
    pub fn xlsx_output_path(input_file: &Path, output_dir: &Path, languages: &[String]) -> PathBuf {
        let stem = input_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("workbook");
        let timestamp = Local::now().format(FILE_TIMESTAMP_FORMAT);
        output_dir.join(format!(
            "{}_tran_{}_{}.xlsx",
            stem,
            languages.join("&"),
            timestamp
        ))
    }

    /// Append a timestamped line to a log file, creating it if needed
    pub fn append_to_log_file(path: &Path, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{}] {}", timestamp, message)
            .with_context(|| format!("Failed to write to log file {:?}", path))?;
        Ok(())
    }
}

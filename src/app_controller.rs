/*!
 * Application controller.
 *
 * Wires configuration, translator and the document/excel pipelines
 * together and drives the batch runs over input folders. Failures are
 * isolated per file: one broken document is logged and the batch moves on.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

use crate::app_config::Config;
use crate::document::classifier::{self, ClassifierConfig, TableBoundaryPolicy};
use crate::document::writer::TranslatedDocument;
use crate::document::{reader, writer, DocumentContent};
use crate::excel;
use crate::file_utils::{FileManager, OfficeFileType, OUTPUT_DIR_NAME, WARNING_LOG_NAME};
use crate::providers::Translate;
use crate::translation::inserter;
use crate::translation::Translator;

/// Main application controller
pub struct Controller {
    config: Config,
    translator: Arc<dyn Translate>,
    classifier: ClassifierConfig,
}

impl Controller {
    /// Create a controller from a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let translator: Arc<dyn Translate> =
            Arc::new(Translator::new(&config).map_err(|e| anyhow!("{}", e))?);
        Ok(Self::with_translator(config, translator))
    }

    /// Create a controller with an injected translator (used by tests)
    pub fn with_translator(config: Config, translator: Arc<dyn Translate>) -> Self {
        let classifier = ClassifierConfig {
            revision_header: config.classifier.revision_header.clone(),
        };
        Controller {
            config,
            translator,
            classifier,
        }
    }

    /// Translate a single piece of text into every target language
    pub async fn translate_text(&self, text: &str) -> Result<()> {
        for language in &self.config.target_languages {
            match self.translator.translate(text, language).await {
                Ok(translated) => info!("{}: {}", language, translated),
                Err(e) => error!("translation to {} failed: {}", language, e),
            }
        }
        Ok(())
    }

    /// Translate every Word document directly under `input_dir`
    pub async fn translate_document_folder(&self, input_dir: &Path) -> Result<()> {
        let (files, output_dir) = self.prepare_batch(input_dir, OfficeFileType::Docx)?;
        if files.is_empty() {
            info!("no .docx files found in {:?}", input_dir);
            return Ok(());
        }
        let progress = batch_progress(files.len());
        for file in &files {
            progress.set_message(display_name(file));
            match self.translate_document_file(file, &output_dir).await {
                Ok(output) => info!("translated {:?} -> {:?}", file, output),
                Err(e) => error!("failed to process {:?}: {}", file, e),
            }
            progress.inc(1);
        }
        progress.finish_with_message("done");
        info!("all files processed, output in {:?}", output_dir);
        Ok(())
    }

    /// Translate every Excel workbook directly under `input_dir`
    pub async fn translate_excel_folder(&self, input_dir: &Path) -> Result<()> {
        let (files, output_dir) = self.prepare_batch(input_dir, OfficeFileType::Xlsx)?;
        if files.is_empty() {
            info!("no .xlsx files found in {:?}", input_dir);
            return Ok(());
        }
        let progress = batch_progress(files.len());
        for file in &files {
            progress.set_message(display_name(file));
            match self.translate_excel_file(file, &output_dir).await {
                Ok(output) => info!("translated {:?} -> {:?}", file, output),
                Err(e) => error!("failed to process {:?}: {}", file, e),
            }
            progress.inc(1);
        }
        progress.finish_with_message("done");
        info!("all files processed, output in {:?}", output_dir);
        Ok(())
    }

    fn prepare_batch(
        &self,
        input_dir: &Path,
        file_type: OfficeFileType,
    ) -> Result<(Vec<PathBuf>, PathBuf)> {
        if !input_dir.is_dir() {
            return Err(anyhow!("input directory {:?} does not exist", input_dir));
        }
        let output_dir = input_dir.join(OUTPUT_DIR_NAME);
        FileManager::ensure_dir(&output_dir)?;
        let files = FileManager::find_office_files(input_dir, file_type)?;
        Ok((files, output_dir))
    }

    /// Run the full read/classify/translate/write pipeline for one document
    pub async fn translate_document_file(
        &self,
        input: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let content = reader::read_document(input).context("reading document")?;
        let DocumentContent {
            body,
            headers,
            footers,
            pictures,
            shapes,
            mut warnings,
        } = content;

        let tagged = classifier::classify(body, &self.classifier);
        let split = classifier::split_cover_body(tagged, &TableBoundaryPolicy);
        if split.body.is_empty() {
            warnings.push(
                "no cover/body boundary table found; whole document treated as cover".to_string(),
            );
        }

        let languages = &self.config.target_languages;
        let translator = self.translator.as_ref();
        let cover = inserter::insert_cover_translations(split.cover, translator, languages).await;
        let body = inserter::insert_paragraph_translations(split.body, translator, languages).await;
        let body = inserter::insert_table_translations(body, translator, languages).await;
        let headers = inserter::insert_section_translations(headers, translator, languages).await;
        let footers = inserter::insert_section_translations(footers, translator, languages).await;

        let translated = TranslatedDocument {
            cover,
            body,
            headers,
            footers,
        };
        let output = FileManager::docx_output_path(input, output_dir);
        writer::write_document(&translated, &output).context("writing document")?;

        self.log_document_warnings(output_dir, input, pictures.len(), shapes.len(), &warnings)?;
        Ok(output)
    }

    /// Translate one workbook with the copy-and-patch pipeline
    pub async fn translate_excel_file(&self, input: &Path, output_dir: &Path) -> Result<PathBuf> {
        let languages = &self.config.target_languages;
        let output = FileManager::xlsx_output_path(input, output_dir, languages);
        let summary =
            excel::translate_file(input, &output, self.translator.as_ref(), languages).await?;
        if summary.inline_strings_skipped > 0 {
            let log_path = output_dir.join(WARNING_LOG_NAME);
            FileManager::append_to_log_file(
                &log_path,
                &format!(
                    "{}: {} inline-string cell(s) left untranslated",
                    display_name(input),
                    summary.inline_strings_skipped
                ),
            )?;
        }
        info!(
            "{}: {} string(s) translated",
            display_name(input),
            summary.strings_translated
        );
        Ok(output)
    }

    fn log_document_warnings(
        &self,
        output_dir: &Path,
        input: &Path,
        picture_count: usize,
        shape_count: usize,
        warnings: &[String],
    ) -> Result<()> {
        if picture_count == 0 && shape_count == 0 && warnings.is_empty() {
            return Ok(());
        }
        let log_path = output_dir.join(WARNING_LOG_NAME);
        let file_name = display_name(input);
        if picture_count > 0 {
            FileManager::append_to_log_file(
                &log_path,
                &format!(
                    "{}: contains {} picture(s) that were not reconstructed",
                    file_name, picture_count
                ),
            )?;
        }
        if shape_count > 0 {
            FileManager::append_to_log_file(
                &log_path,
                &format!(
                    "{}: contains {} shape(s) that were not reconstructed",
                    file_name, shape_count
                ),
            )?;
        }
        for warning in warnings {
            FileManager::append_to_log_file(&log_path, &format!("{}: {}", file_name, warning))?;
        }
        Ok(())
    }
}

fn batch_progress(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    progress
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unnamed>")
        .to_string()
}

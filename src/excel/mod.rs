/*!
 * Excel workbook translation.
 *
 * Workbooks are handled with a copy-and-patch strategy: the source package
 * is copied whole and only `xl/sharedStrings.xml` is rewritten, so cell
 * styling, merges, column widths and formulas survive untouched. Each
 * distinct non-empty shared string gets the translations appended below
 * the original text, one line per target language.
 */

use std::path::Path;

use log::warn;

use crate::document::package::OpcPackage;
use crate::errors::DocumentError;
use crate::providers::Translate;

pub mod reader;
pub mod writer;

pub use reader::read_workbook;

/// A parsed workbook: enough structure to translate and to reason about
/// merges, not a full spreadsheet model.
#[derive(Debug, Clone, Default)]
pub struct WorkbookContent {
    pub sheets: Vec<SheetContent>,
    /// The shared string table in file order
    pub shared_strings: Vec<String>,
}

impl WorkbookContent {
    /// Number of inline-string cells across all sheets (these are not
    /// covered by the shared-strings patch)
    pub fn inline_string_count(&self) -> usize {
        self.sheets
            .iter()
            .flat_map(|s| s.cells.iter())
            .filter(|c| matches!(c.value, CellValue::Inline(_)))
            .count()
    }
}

/// One worksheet
#[derive(Debug, Clone, Default)]
pub struct SheetContent {
    pub name: String,
    pub part_name: String,
    pub cells: Vec<CellContent>,
    pub merges: Vec<MergeRange>,
}

/// One cell with resolved 0-based coordinates
#[derive(Debug, Clone)]
pub struct CellContent {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
    /// The cell lies inside a merged range
    pub is_merged: bool,
    /// The cell is the top-left anchor of its merged range
    pub is_merge_start: bool,
}

/// Cell payload as stored in the file
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Index into the shared string table
    Shared(usize),
    /// Inline string stored in the cell itself
    Inline(String),
    /// Numeric or other raw value
    Raw(String),
    /// Empty cell
    Empty,
}

/// A merged range in 0-based inclusive coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergeRange {
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    pub fn is_anchor(&self, row: u32, col: u32) -> bool {
        row == self.start_row && col == self.start_col
    }
}

/// Outcome summary of one workbook translation
#[derive(Debug, Clone, Default)]
pub struct ExcelSummary {
    /// Shared strings that received translations
    pub strings_translated: usize,
    /// Inline-string cells left untranslated
    pub inline_strings_skipped: usize,
}

/// Translate one workbook file into `output`
pub async fn translate_file(
    input: &Path,
    output: &Path,
    translator: &dyn Translate,
    languages: &[String],
) -> Result<ExcelSummary, DocumentError> {
    let mut package = OpcPackage::open(input)?;
    let content = reader::read_package(&package)?;

    let (strings, translated_count) =
        append_translations(&content.shared_strings, translator, languages).await;
    writer::patch_shared_strings(&mut package, &strings)?;
    package.save(output)?;

    let inline = content.inline_string_count();
    if inline > 0 {
        warn!(
            "{}: {} inline-string cell(s) were left untranslated",
            input.display(),
            inline
        );
    }
    Ok(ExcelSummary {
        strings_translated: translated_count,
        inline_strings_skipped: inline,
    })
}

/// The replace-multi pass: every distinct non-empty string becomes
/// `original\ntranslation…`, one appended line per language. A failed
/// language is skipped for that string and logged.
pub async fn append_translations(
    shared_strings: &[String],
    translator: &dyn Translate,
    languages: &[String],
) -> (Vec<String>, usize) {
    let mut out = Vec::with_capacity(shared_strings.len());
    let mut translated_count = 0;
    for original in shared_strings {
        if original.trim().is_empty() {
            out.push(original.clone());
            continue;
        }
        let mut combined = original.clone();
        let mut appended = false;
        for language in languages {
            match translator.translate(original, language).await {
                Ok(translated) => {
                    combined.push('\n');
                    combined.push_str(&translated);
                    appended = true;
                }
                Err(e) => warn!(
                    "translation to {} failed for {:?}: {}; keeping original only",
                    language, original, e
                ),
            }
        }
        if appended {
            translated_count += 1;
        }
        out.push(combined);
    }
    (out, translated_count)
}

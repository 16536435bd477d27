/*!
 * # doctrans - bilingual office document translation
 *
 * A Rust library for translating Word and Excel documents produced from
 * Chinese manufacturing SOP templates, inserting per-language translations
 * next to the original text while preserving the document layout.
 *
 * ## Features
 *
 * - Read docx files into a position-ordered content model (paragraphs and
 *   tables interleaved exactly as authored)
 * - Classify template regions (top title, preamble, approval table,
 *   revision record, main text) and split cover from body
 * - Insert translated sibling paragraphs per target language, with
 *   glossary short-circuiting and colon-aware preamble handling
 * - Rebuild the docx with merges, page breaks and formatting preserved
 * - Append translations into Excel workbooks without disturbing styling
 * - OpenAI-compatible chat-completion providers (DeepSeek, OpenAI) with
 *   linear-backoff retries
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Word document reading, region classification and writing:
 *   - `document::reader`: docx to content model
 *   - `document::classifier`: region tagging and the cover/body split
 *   - `document::writer`: content model back to docx
 * - `excel`: Excel workbook reading and translation write-back
 * - `translation`: AI-powered translation services:
 *   - `translation::core`: glossary-aware translator pipeline
 *   - `translation::inserter`: sibling insertion passes over the model
 * - `glossary`: per-language terminology tables
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `providers`: Client implementations for chat-completion providers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod excel;
pub mod file_utils;
pub mod glossary;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use document::{ContentNode, DocumentContent, RegionTag};
pub use errors::{AppError, DocumentError, ProviderError, TranslationError};
pub use glossary::Glossary;
pub use providers::Translate;
pub use translation::Translator;

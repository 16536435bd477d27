/*!
 * Translation services: the glossary-aware translator pipeline and the
 * sibling-insertion passes over the document content model.
 */

pub mod core;
pub mod inserter;

pub use self::core::Translator;

/*!
 * Per-language terminology glossaries.
 *
 * Each target language can carry a JSON file mapping source strings to
 * fixed translations. Lookups strip spaces (ASCII and full-width U+3000)
 * from the query so spacing differences in the source document never miss
 * a term. Files are loaded lazily and cached per language; an unreadable
 * file downgrades that language to pure AI translation with one warning.
 */

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::RwLock;

use crate::app_config::GlossaryConfig;

/// Lazily-loaded glossary tables, one per target language.
#[derive(Debug, Default)]
pub struct Glossary {
    dir: PathBuf,
    files: HashMap<String, String>,
    // language -> loaded table; None caches a failed/missing load
    cache: RwLock<HashMap<String, Option<Arc<HashMap<String, String>>>>>,
}

impl Glossary {
    pub fn new(dir: PathBuf, files: HashMap<String, String>) -> Self {
        Glossary {
            dir,
            files,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &GlossaryConfig) -> Self {
        Self::new(config.dir.clone(), config.files.clone())
    }

    /// An empty glossary that never matches (used by tests and plain-text mode)
    pub fn empty() -> Self {
        Glossary::default()
    }

    /// Exact-term lookup after whitespace stripping
    pub fn lookup(&self, text: &str, language: &str) -> Option<String> {
        let table = self.table_for(language)?;
        let key = strip_spaces(text);
        let hit = table.get(&key).cloned();
        if hit.is_some() {
            debug!("glossary hit for {:?} ({})", key, language);
        }
        hit
    }

    fn table_for(&self, language: &str) -> Option<Arc<HashMap<String, String>>> {
        if let Some(cached) = self.cache.read().get(language) {
            return cached.clone();
        }
        let loaded = self.load(language);
        self.cache
            .write()
            .insert(language.to_string(), loaded.clone());
        loaded
    }

    fn load(&self, language: &str) -> Option<Arc<HashMap<String, String>>> {
        let Some(file) = self.files.get(language) else {
            debug!("no glossary configured for language {}", language);
            return None;
        };
        let path = self.dir.join(file);
        let table = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                serde_json::from_str::<HashMap<String, String>>(&json).map_err(|e| e.to_string())
            });
        match table {
            Ok(table) => {
                // normalize keys the same way queries are normalized
                let normalized: HashMap<String, String> = table
                    .into_iter()
                    .map(|(k, v)| (strip_spaces(&k), v))
                    .collect();
                Some(Arc::new(normalized))
            }
            Err(e) => {
                warn!(
                    "glossary for {} unavailable ({}): {}; falling back to AI translation",
                    language,
                    path.display(),
                    e
                );
                None
            }
        }
    }
}

/// Remove ASCII spaces and full-width ideographic spaces
pub fn strip_spaces(text: &str) -> String {
    text.chars()
        .filter(|c| *c != ' ' && *c != '\u{3000}')
        .collect()
}

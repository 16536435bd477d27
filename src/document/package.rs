/*!
 * In-memory OOXML package container.
 *
 * Both docx and xlsx files are zip archives of XML parts. The whole archive
 * is read into a part map so parts can be inspected and replaced, then
 * written back out. Saving copies every untouched part verbatim, which is
 * what keeps styling, images and other parts we do not model intact.
 */

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::DocumentError;

/// An OOXML package held fully in memory as `part name -> bytes`.
#[derive(Debug, Clone, Default)]
pub struct OpcPackage {
    parts: BTreeMap<String, Vec<u8>>,
}

impl OpcPackage {
    /// Create an empty package (used by the writer when building from scratch)
    pub fn new() -> Self {
        OpcPackage::default()
    }

    /// Open a package from a file on disk
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let bytes = fs::read(path)
            .map_err(|e| DocumentError::Package(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&bytes)
    }

    /// Open a package from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = BTreeMap::new();
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.insert(name, data);
        }
        Ok(OpcPackage { parts })
    }

    /// Raw bytes of a part, if present
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(|v| v.as_slice())
    }

    /// A part decoded as UTF-8, or `MissingPart`
    pub fn part_str(&self, name: &str) -> Result<String, DocumentError> {
        let data = self
            .parts
            .get(name)
            .ok_or_else(|| DocumentError::MissingPart(name.to_string()))?;
        Ok(String::from_utf8_lossy(data).into_owned())
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// Insert or replace a part
    pub fn set_part(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.parts.insert(name.into(), data);
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(|k| k.as_str())
    }

    /// Parse the relationships part that belongs to `part_name`
    /// (e.g. `word/document.xml` -> `word/_rels/document.xml.rels`),
    /// returning `rId -> target` with targets relative to the part's folder.
    pub fn relationships(&self, part_name: &str) -> Result<HashMap<String, String>, DocumentError> {
        let rels_name = rels_part_for(part_name);
        let mut map = HashMap::new();
        let Some(data) = self.parts.get(&rels_name) else {
            return Ok(map);
        };
        let xml = String::from_utf8_lossy(data).into_owned();
        let doc = roxmltree::Document::parse(&xml)?;
        for rel in doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "Relationship")
        {
            if let (Some(id), Some(target)) = (rel.attribute("Id"), rel.attribute("Target")) {
                map.insert(id.to_string(), target.to_string());
            }
        }
        Ok(map)
    }

    /// Serialize the package to a zip archive in memory
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, data) in &self.parts {
            writer.start_file(name.as_str(), options)?;
            writer
                .write_all(data)
                .map_err(|e| DocumentError::Save(e.to_string()))?;
        }
        let cursor = writer
            .finish()
            .map_err(|e| DocumentError::Save(e.to_string()))?;
        Ok(cursor.into_inner())
    }

    /// Write the package to a file on disk
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)
            .map_err(|e| DocumentError::Save(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

/// The rels part name for a given part (`_rels/<file>.rels` in the same folder)
fn rels_part_for(part_name: &str) -> String {
    match part_name.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_name),
    }
}

/// Resolve a relationship target against the folder of the source part
/// (`word/document.xml` + `header1.xml` -> `word/header1.xml`).
pub fn resolve_target(part_name: &str, target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        return stripped.to_string();
    }
    match part_name.rsplit_once('/') {
        Some((dir, _)) => format!("{}/{}", dir, target),
        None => target.to_string(),
    }
}

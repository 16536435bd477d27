/*!
 * Excel workbook reader.
 *
 * Parses the workbook sheet list, the shared string table and each sheet's
 * cells and merged ranges. Cell coordinates come from the `r` attribute in
 * A1 notation.
 */

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::Node;

use crate::document::package::{resolve_target, OpcPackage};
use crate::errors::DocumentError;
use crate::excel::{CellContent, CellValue, MergeRange, SheetContent, WorkbookContent};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

static CELL_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)([0-9]+)$").expect("valid cell reference pattern"));

/// Read a workbook file
pub fn read_workbook(path: &Path) -> Result<WorkbookContent, DocumentError> {
    let package = OpcPackage::open(path)?;
    read_package(&package)
}

/// Read an already-opened workbook package
pub fn read_package(package: &OpcPackage) -> Result<WorkbookContent, DocumentError> {
    let shared_strings = read_shared_strings(package)?;

    let workbook_xml = package.part_str(WORKBOOK_PART)?;
    let workbook = roxmltree::Document::parse(&workbook_xml)?;
    let rels = package.relationships(WORKBOOK_PART)?;

    let mut sheets = Vec::new();
    for sheet in workbook
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "sheet")
    {
        let name = attr(sheet, "name").unwrap_or("").to_string();
        let Some(target) = attr(sheet, "id").and_then(|id| rels.get(id)) else {
            continue;
        };
        let part_name = resolve_target(WORKBOOK_PART, target);
        sheets.push(read_sheet(package, name, part_name)?);
    }

    Ok(WorkbookContent {
        sheets,
        shared_strings,
    })
}

fn read_shared_strings(package: &OpcPackage) -> Result<Vec<String>, DocumentError> {
    if !package.has_part(SHARED_STRINGS_PART) {
        return Ok(Vec::new());
    }
    let xml = package.part_str(SHARED_STRINGS_PART)?;
    let doc = roxmltree::Document::parse(&xml)?;
    let mut strings = Vec::new();
    for si in doc
        .root_element()
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "si")
    {
        // rich-text runs concatenate into one string
        let text: String = si
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "t")
            .filter_map(|t| t.text())
            .collect();
        strings.push(text);
    }
    Ok(strings)
}

fn read_sheet(
    package: &OpcPackage,
    name: String,
    part_name: String,
) -> Result<SheetContent, DocumentError> {
    let xml = package.part_str(&part_name)?;
    let doc = roxmltree::Document::parse(&xml)?;

    let merges: Vec<MergeRange> = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "mergeCell")
        .filter_map(|n| attr(n, "ref"))
        .filter_map(parse_merge_range)
        .collect();

    let mut cells = Vec::new();
    for c in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "c")
    {
        let Some((row, col)) = attr(c, "r").and_then(parse_cell_reference) else {
            continue;
        };
        let value = read_cell_value(c);
        let merge = merges.iter().find(|m| m.contains(row, col));
        cells.push(CellContent {
            row,
            col,
            value,
            is_merged: merge.is_some(),
            is_merge_start: merge.map(|m| m.is_anchor(row, col)).unwrap_or(false),
        });
    }

    Ok(SheetContent {
        name,
        part_name,
        cells,
        merges,
    })
}

fn read_cell_value(c: Node) -> CellValue {
    let cell_type = attr(c, "t").unwrap_or("n");
    match cell_type {
        "s" => {
            let index = c
                .children()
                .find(|n| n.is_element() && n.tag_name().name() == "v")
                .and_then(|v| v.text())
                .and_then(|v| v.trim().parse::<usize>().ok());
            match index {
                Some(index) => CellValue::Shared(index),
                None => CellValue::Empty,
            }
        }
        "inlineStr" => {
            let text: String = c
                .descendants()
                .filter(|n| n.is_element() && n.tag_name().name() == "t")
                .filter_map(|t| t.text())
                .collect();
            CellValue::Inline(text)
        }
        _ => {
            let raw = c
                .children()
                .find(|n| n.is_element() && n.tag_name().name() == "v")
                .and_then(|v| v.text())
                .map(|v| v.to_string());
            match raw {
                Some(raw) => CellValue::Raw(raw),
                None => CellValue::Empty,
            }
        }
    }
}

/// `"B3"` -> `(2, 1)` (0-based row, col)
pub fn parse_cell_reference(reference: &str) -> Option<(u32, u32)> {
    let captures = CELL_REFERENCE.captures(reference)?;
    let letters = captures.get(1)?.as_str();
    let digits = captures.get(2)?.as_str();
    let mut col: u32 = 0;
    for ch in letters.chars() {
        col = col * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    let row: u32 = digits.parse().ok()?;
    Some((row.checked_sub(1)?, col.checked_sub(1)?))
}

/// `"A1:C3"` -> inclusive 0-based range
fn parse_merge_range(reference: &str) -> Option<MergeRange> {
    let (start, end) = reference.split_once(':')?;
    let (start_row, start_col) = parse_cell_reference(start)?;
    let (end_row, end_col) = parse_cell_reference(end)?;
    Some(MergeRange {
        start_row,
        start_col,
        end_row,
        end_col,
    })
}

fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

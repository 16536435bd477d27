/*!
 * Common test utilities for the doctrans test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use doctrans::document::package::OpcPackage;
use doctrans::document::{
    CellNode, ContentNode, ParagraphNode, Run, TableNode,
};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A paragraph node with one run carrying the given text
pub fn paragraph(position: usize, element_index: usize, text: &str) -> ContentNode {
    ContentNode::Paragraph(paragraph_node(position, element_index, text))
}

pub fn paragraph_node(position: usize, element_index: usize, text: &str) -> ParagraphNode {
    ParagraphNode {
        position,
        element_index,
        text: text.to_string(),
        runs: vec![Run {
            text: text.to_string(),
            ..Run::default()
        }],
        ..ParagraphNode::default()
    }
}

/// A single-paragraph cell of span 1
pub fn cell(row: usize, col: usize, text: &str) -> CellNode {
    CellNode {
        row,
        col,
        grid_span: 1,
        is_merge_start: false,
        content: vec![paragraph(0, 0, text)],
        ..CellNode::default()
    }
}

/// A merge owner plus its covered placeholder cells
pub fn merged_cells(row: usize, col: usize, span: usize, text: &str) -> Vec<CellNode> {
    let mut cells = vec![CellNode {
        row,
        col,
        grid_span: span,
        is_merge_start: true,
        content: vec![paragraph(0, 0, text)],
        ..CellNode::default()
    }];
    for offset in 1..span {
        cells.push(CellNode {
            row,
            col: col + offset,
            grid_span: span,
            is_merge_start: false,
            content: Vec::new(),
            ..CellNode::default()
        });
    }
    cells
}

/// A rows x cols table of unmerged cells with texts like "r0c1"
pub fn simple_table(position: usize, element_index: usize, rows: usize, cols: usize) -> ContentNode {
    let mut cells = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            cells.push(cell(row, col, &format!("r{}c{}", row, col)));
        }
    }
    ContentNode::Table(TableNode {
        position,
        element_index,
        rows,
        cols,
        cells,
        ..TableNode::default()
    })
}

/// A 1x1 table, the title shape used by some cover templates
pub fn title_table(position: usize, element_index: usize, text: &str) -> ContentNode {
    ContentNode::Table(TableNode {
        position,
        element_index,
        rows: 1,
        cols: 1,
        cells: vec![cell(0, 0, text)],
        ..TableNode::default()
    })
}

/// The revision-record shape: header row "版本 | 说明", then a body row
/// merged across both columns holding `body_text`
pub fn revision_table(position: usize, element_index: usize, body_text: &str) -> ContentNode {
    let mut cells = vec![cell(0, 0, "版本"), cell(0, 1, "说明")];
    cells.extend(merged_cells(1, 0, 2, body_text));
    ContentNode::Table(TableNode {
        position,
        element_index,
        rows: 2,
        cols: 2,
        cells,
        ..TableNode::default()
    })
}

/// Build a minimal but well-formed xlsx package: one sheet whose first row
/// references the given shared strings left to right, plus an A2:B2 merge
/// whose anchor references string 0 again.
pub fn build_test_workbook(shared: &[&str]) -> OpcPackage {
    let mut package = OpcPackage::new();

    package.set_part(
        "[Content_Types].xml",
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#.to_vec(),
    );
    package.set_part(
        "_rels/.rels",
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_vec(),
    );
    package.set_part(
        "xl/workbook.xml",
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_vec(),
    );
    package.set_part(
        "xl/_rels/workbook.xml.rels",
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_vec(),
    );

    let mut first_row = String::new();
    for (index, _) in shared.iter().enumerate() {
        let column = char::from(b'A' + index as u8);
        first_row.push_str(&format!(r#"<c r="{}1" t="s"><v>{}</v></c>"#, column, index));
    }
    let sheet = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1">{}</row><row r="2"><c r="A2" t="s"><v>0</v></c></row></sheetData><mergeCells count="1"><mergeCell ref="A2:B2"/></mergeCells></worksheet>"#,
        first_row
    );
    package.set_part("xl/worksheets/sheet1.xml", sheet.into_bytes());

    let mut items = String::new();
    for text in shared {
        items.push_str(&format!(r#"<si><t xml:space="preserve">{}</t></si>"#, text));
    }
    let sst = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{1}</sst>"#,
        shared.len(),
        items
    );
    package.set_part("xl/sharedStrings.xml", sst.into_bytes());
    package
}

/*!
 * Word document reader.
 *
 * Parses `word/document.xml` (plus header/footer parts) into the content
 * model. Paragraphs and tables are enumerated separately so each keeps its
 * per-kind element index, then merged by sibling position, which yields the
 * exact interleaved order of the source file.
 */

use std::path::Path;

use log::warn;
use roxmltree::Node;

use crate::document::package::{resolve_target, OpcPackage};
use crate::document::{
    Alignment, CellNode, ContentNode, DocumentContent, HeaderFooterSection, ParagraphFormat,
    ParagraphNode, PictureRef, Run, RunFormat, ShapeRef, TableNode,
};
use crate::errors::DocumentError;

const DOCUMENT_PART: &str = "word/document.xml";
const SETTINGS_PART: &str = "word/settings.xml";

/// Read a docx file into the content model
pub fn read_document(path: &Path) -> Result<DocumentContent, DocumentError> {
    let package = OpcPackage::open(path)?;
    read_package(&package)
}

/// Read an already-opened package into the content model
pub fn read_package(package: &OpcPackage) -> Result<DocumentContent, DocumentError> {
    let mut reader = DocumentReader::default();
    reader.read(package)
}

#[derive(Default)]
struct DocumentReader {
    warnings: Vec<String>,
}

impl DocumentReader {
    fn read(&mut self, package: &OpcPackage) -> Result<DocumentContent, DocumentError> {
        let xml = package.part_str(DOCUMENT_PART)?;
        let doc = roxmltree::Document::parse(&xml)?;
        let body = doc
            .root_element()
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == "body")
            .ok_or_else(|| DocumentError::Xml("document has no w:body".to_string()))?;

        let nodes = self.read_block(body);
        let (headers, footers) = self.read_sections(package, &doc)?;
        let pictures = collect_pictures(&doc);
        let shapes = collect_shapes(&doc);

        Ok(DocumentContent {
            body: nodes,
            headers,
            footers,
            pictures,
            shapes,
            warnings: std::mem::take(&mut self.warnings),
        })
    }

    /// Read the block content of a container (body, table cell, header or
    /// footer root) preserving the authored interleaving of paragraphs and
    /// tables.
    fn read_block(&mut self, container: Node) -> Vec<ContentNode> {
        let elements: Vec<Node> = container.children().filter(|c| c.is_element()).collect();

        let mut nodes = Vec::new();
        let mut paragraph_index = 0;
        let mut table_index = 0;
        for (position, element) in elements.iter().enumerate() {
            match element.tag_name().name() {
                "p" => {
                    nodes.push(ContentNode::Paragraph(read_paragraph(
                        position,
                        paragraph_index,
                        *element,
                    )));
                    paragraph_index += 1;
                }
                "tbl" => {
                    nodes.push(ContentNode::Table(self.read_table(
                        position,
                        table_index,
                        *element,
                    )));
                    table_index += 1;
                }
                _ => {}
            }
        }
        // Separate per-kind enumeration above, ordered stream out: the sort
        // restores the sibling interleaving.
        nodes.sort_by_key(|n| n.position());
        nodes
    }

    fn read_table(&mut self, position: usize, element_index: usize, tbl: Node) -> TableNode {
        let grid_widths: Vec<u32> = find_child(tbl, "tblGrid")
            .map(|grid| {
                grid.children()
                    .filter(|c| c.is_element() && c.tag_name().name() == "gridCol")
                    .filter_map(|c| attr(c, "w").and_then(|w| w.parse().ok()))
                    .collect()
            })
            .unwrap_or_default();

        let alignment = find_child(tbl, "tblPr")
            .and_then(|pr| find_child(pr, "jc"))
            .and_then(|jc| attr(jc, "val"))
            .and_then(Alignment::from_jc)
            .unwrap_or(Alignment::Center);

        let rows: Vec<Node> = tbl
            .children()
            .filter(|c| c.is_element() && c.tag_name().name() == "tr")
            .collect();

        let mut cols = grid_widths.len();
        let mut cells = Vec::new();
        for (row_index, tr) in rows.iter().enumerate() {
            if let Some(tr_pr) = find_child(*tr, "trPr") {
                for skew in ["gridBefore", "gridAfter"] {
                    let skipped = find_child(tr_pr, skew)
                        .and_then(|n| attr(n, "val"))
                        .and_then(|v| v.parse::<usize>().ok())
                        .unwrap_or(0);
                    if skipped > 0 {
                        self.warnings.push(format!(
                            "table {} row {} skips {} grid column(s) ({}); cell addresses may shift",
                            element_index, row_index, skipped, skew
                        ));
                    }
                }
            }

            let mut col = 0;
            for tc in tr
                .children()
                .filter(|c| c.is_element() && c.tag_name().name() == "tc")
            {
                let tc_pr = find_child(tc, "tcPr");
                let grid_span = tc_pr
                    .and_then(|pr| find_child(pr, "gridSpan"))
                    .and_then(|n| attr(n, "val"))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(1)
                    .max(1);
                let explicit_width = tc_pr
                    .and_then(|pr| find_child(pr, "tcW"))
                    .filter(|w| attr(*w, "type").is_none_or(|t| t == "dxa"))
                    .and_then(|w| attr(w, "w"))
                    .and_then(|w| w.parse::<u32>().ok());
                let width = explicit_width.or_else(|| span_width(&grid_widths, col, grid_span));

                cells.push(CellNode {
                    row: row_index,
                    col,
                    width,
                    grid_span,
                    is_merge_start: grid_span > 1,
                    tag: Default::default(),
                    content: self.read_block(tc),
                });
                // The file stores no cells for covered grid slots; emit
                // placeholders so every (row, col) address exists.
                for offset in 1..grid_span {
                    cells.push(CellNode {
                        row: row_index,
                        col: col + offset,
                        width: grid_widths.get(col + offset).copied(),
                        grid_span,
                        is_merge_start: false,
                        tag: Default::default(),
                        content: Vec::new(),
                    });
                }
                col += grid_span;
            }
            if cols == 0 {
                cols = col;
            } else if col != cols {
                self.warnings.push(format!(
                    "table {} row {} covers {} grid column(s), expected {}",
                    element_index, row_index, col, cols
                ));
            }
        }

        TableNode {
            position,
            element_index,
            tag: Default::default(),
            rows: rows.len(),
            cols,
            alignment,
            grid_widths,
            cells,
        }
    }

    fn read_sections(
        &mut self,
        package: &OpcPackage,
        doc: &roxmltree::Document,
    ) -> Result<(Vec<HeaderFooterSection>, Vec<HeaderFooterSection>), DocumentError> {
        let rels = package.relationships(DOCUMENT_PART)?;
        let even_and_odd = package
            .part_str(SETTINGS_PART)
            .ok()
            .and_then(|xml| {
                roxmltree::Document::parse(&xml).ok().map(|settings| {
                    settings
                        .descendants()
                        .any(|n| n.is_element() && n.tag_name().name() == "evenAndOddHeaders")
                })
            })
            .unwrap_or(false);

        let section_nodes: Vec<Node> = doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "sectPr")
            .collect();
        if section_nodes.len() > 1 {
            self.warnings.push(format!(
                "document has {} sections; only the first section's headers and footers are reconstructed",
                section_nodes.len()
            ));
        }

        let mut headers = Vec::new();
        let mut footers = Vec::new();
        for (section_index, sect_pr) in section_nodes.iter().enumerate() {
            let different_first_page = find_child(*sect_pr, "titlePg").is_some();
            headers.push(self.read_references(
                package,
                &rels,
                *sect_pr,
                "headerReference",
                section_index,
                different_first_page,
                even_and_odd,
            )?);
            footers.push(self.read_references(
                package,
                &rels,
                *sect_pr,
                "footerReference",
                section_index,
                different_first_page,
                even_and_odd,
            )?);
        }
        Ok((headers, footers))
    }

    #[allow(clippy::too_many_arguments)]
    fn read_references(
        &mut self,
        package: &OpcPackage,
        rels: &std::collections::HashMap<String, String>,
        sect_pr: Node,
        reference_name: &str,
        section_index: usize,
        different_first_page: bool,
        different_odd_and_even: bool,
    ) -> Result<HeaderFooterSection, DocumentError> {
        let mut section = HeaderFooterSection {
            section_index,
            linked_to_previous: true,
            different_first_page,
            different_odd_and_even,
            ..HeaderFooterSection::default()
        };
        for reference in sect_pr
            .children()
            .filter(|c| c.is_element() && c.tag_name().name() == reference_name)
        {
            let Some(rel_id) = attr(reference, "id") else {
                continue;
            };
            let Some(target) = rels.get(rel_id) else {
                self.warnings
                    .push(format!("unresolved relationship {} in section {}", rel_id, section_index));
                continue;
            };
            let part_name = resolve_target(DOCUMENT_PART, target);
            let xml = package.part_str(&part_name)?;
            let part_doc = roxmltree::Document::parse(&xml)?;
            let content = self.read_block(part_doc.root_element());

            section.linked_to_previous = false;
            match attr(reference, "type").unwrap_or("default") {
                "first" => section.first_page = content,
                "even" => section.even_page = content,
                _ => section.default_page = content,
            }
        }
        Ok(section)
    }
}

fn read_paragraph(position: usize, element_index: usize, p: Node) -> ParagraphNode {
    let format = find_child(p, "pPr")
        .map(read_paragraph_format)
        .unwrap_or_default();

    let mut runs = Vec::new();
    let mut text = String::new();
    for r in p
        .children()
        .filter(|c| c.is_element() && c.tag_name().name() == "r")
    {
        let run_format = find_child(r, "rPr").map(read_run_format).unwrap_or_default();
        let mut run_text = String::new();
        for piece in r.descendants().filter(|n| n.is_element()) {
            match piece.tag_name().name() {
                "t" => run_text.push_str(piece.text().unwrap_or("")),
                "tab" => run_text.push('\t'),
                _ => {}
            }
        }
        text.push_str(&run_text);
        runs.push(Run {
            text: run_text,
            format: run_format,
        });
    }

    ParagraphNode {
        position,
        element_index,
        tag: Default::default(),
        text,
        format,
        runs,
        language: None,
    }
}

fn read_paragraph_format(p_pr: Node) -> ParagraphFormat {
    let mut format = ParagraphFormat {
        style: find_child(p_pr, "pStyle")
            .and_then(|n| attr(n, "val"))
            .map(|v| v.to_string()),
        alignment: find_child(p_pr, "jc")
            .and_then(|n| attr(n, "val"))
            .and_then(Alignment::from_jc),
        ..ParagraphFormat::default()
    };
    if let Some(spacing) = find_child(p_pr, "spacing") {
        format.space_before = attr(spacing, "before").and_then(|v| v.parse().ok());
        format.space_after = attr(spacing, "after").and_then(|v| v.parse().ok());
        format.line_spacing = attr(spacing, "line").and_then(|v| v.parse().ok());
        format.line_rule = attr(spacing, "lineRule").map(|v| v.to_string());
    }
    if let Some(ind) = find_child(p_pr, "ind") {
        format.first_line_indent = attr(ind, "firstLine")
            .and_then(|v| v.parse::<i32>().ok())
            .or_else(|| {
                attr(ind, "hanging")
                    .and_then(|v| v.parse::<i32>().ok())
                    .map(|v| -v)
            });
        format.left_indent = attr(ind, "left")
            .or_else(|| attr(ind, "start"))
            .and_then(|v| v.parse().ok());
    }
    format
}

fn read_run_format(r_pr: Node) -> RunFormat {
    RunFormat {
        bold: toggle(r_pr, "b"),
        italic: toggle(r_pr, "i"),
        underline: find_child(r_pr, "u")
            .map(|u| attr(u, "val").is_none_or(|v| v != "none")),
        size_pt: find_child(r_pr, "sz")
            .and_then(|n| attr(n, "val"))
            .and_then(|v| v.parse::<f32>().ok())
            .map(|half_points| half_points / 2.0),
        font_name: find_child(r_pr, "rFonts")
            .and_then(|n| attr(n, "ascii"))
            .map(|v| v.to_string()),
        east_asian_font: find_child(r_pr, "rFonts")
            .and_then(|n| attr(n, "eastAsia"))
            .map(|v| v.to_string()),
        color: find_child(r_pr, "color")
            .and_then(|n| attr(n, "val"))
            .filter(|v| *v != "auto")
            .map(|v| v.to_string()),
    }
}

/// On/off run property: present means on unless val says otherwise
fn toggle(r_pr: Node, name: &str) -> Option<bool> {
    find_child(r_pr, name).map(|n| attr(n, "val").is_none_or(|v| v != "false" && v != "0"))
}

fn span_width(grid_widths: &[u32], col: usize, grid_span: usize) -> Option<u32> {
    let slice = grid_widths.get(col..col + grid_span)?;
    Some(slice.iter().sum())
}

/// Inline pictures in the main document part. Fallback branches of
/// mc:AlternateContent are skipped so a picture is not counted twice.
fn collect_pictures(doc: &roxmltree::Document) -> Vec<PictureRef> {
    let mut pictures = Vec::new();
    for drawing in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "drawing")
        .filter(|n| !inside_fallback(*n))
    {
        let name = drawing
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "docPr")
            .and_then(|n| attr(n, "name"))
            .unwrap_or("")
            .to_string();
        let rel_id = drawing
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "blip")
            .and_then(|n| attr(n, "embed"))
            .unwrap_or("")
            .to_string();
        pictures.push(PictureRef {
            index: pictures.len(),
            rel_id,
            name,
        });
    }
    pictures
}

/// Legacy VML shapes outside AlternateContent fallbacks
fn collect_shapes(doc: &roxmltree::Document) -> Vec<ShapeRef> {
    let mut shapes = Vec::new();
    for shape in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "shape")
        .filter(|n| !inside_fallback(*n))
    {
        shapes.push(ShapeRef {
            index: shapes.len(),
            id: attr(shape, "id").unwrap_or("").to_string(),
            name: attr(shape, "alt").unwrap_or("").to_string(),
        });
    }
    if !shapes.is_empty() {
        warn!("document contains {} legacy shape(s) that will not be reconstructed", shapes.len());
    }
    shapes
}

fn inside_fallback(node: Node) -> bool {
    node.ancestors()
        .any(|a| a.is_element() && a.tag_name().name() == "Fallback")
}

fn find_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

/// Attribute lookup by local name, ignoring the namespace prefix
/// (`w:val` and plain `val` both match).
fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

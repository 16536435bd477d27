/*!
 * Word document writer.
 *
 * Replays the translation-augmented content model into a brand-new docx
 * package: document part, styles, settings, header and footer parts,
 * content types and relationships. Every top-level node is serialized into
 * its own buffer so one bad node is logged and skipped instead of killing
 * the whole save.
 */

use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use log::error;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::document::package::OpcPackage;
use crate::document::{
    CellNode, ContentNode, HeaderFooterSection, ParagraphNode, Run, TableNode,
};
use crate::errors::DocumentError;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

// A4 portrait in twips (1 cm = 567 twips)
const PAGE_WIDTH: u32 = 11906;
const PAGE_HEIGHT: u32 = 16838;
const MARGIN_TOP: u32 = 1134;
const MARGIN_BOTTOM: u32 = 624;
const MARGIN_LEFT: u32 = 1134;
const MARGIN_RIGHT: u32 = 1134;
const HEADER_DISTANCE: u32 = 851;
const FOOTER_DISTANCE: u32 = 992;

// Template row height, 1.3 cm
const ROW_HEIGHT: u32 = 737;

const FALLBACK_LATIN_FONT: &str = "Times New Roman";
const FALLBACK_EAST_ASIAN_FONT: &str = "宋体";

/// The final content handed to the writer: cover and body streams plus the
/// header/footer sections to reconstruct.
#[derive(Debug, Clone, Default)]
pub struct TranslatedDocument {
    pub cover: Vec<ContentNode>,
    pub body: Vec<ContentNode>,
    pub headers: Vec<HeaderFooterSection>,
    pub footers: Vec<HeaderFooterSection>,
}

/// Build the package and write it to disk
pub fn write_document(doc: &TranslatedDocument, path: &Path) -> Result<(), DocumentError> {
    build_package(doc)?.save(path)
}

/// Build a complete docx package in memory
pub fn build_package(doc: &TranslatedDocument) -> Result<OpcPackage, DocumentError> {
    let header_parts = plan_parts(doc.headers.first(), "header");
    let footer_parts = plan_parts(doc.footers.first(), "footer");
    let title_page = doc
        .headers
        .first()
        .map(|s| s.different_first_page)
        .or_else(|| doc.footers.first().map(|s| s.different_first_page))
        .unwrap_or(false);
    let even_and_odd = doc
        .headers
        .iter()
        .chain(doc.footers.iter())
        .any(|s| s.different_odd_and_even);

    let mut package = OpcPackage::new();
    package.set_part(
        "[Content_Types].xml",
        content_types_xml(&header_parts, &footer_parts).into_bytes(),
    );
    package.set_part("_rels/.rels", ROOT_RELS.as_bytes().to_vec());
    package.set_part(
        "word/_rels/document.xml.rels",
        document_rels_xml(&header_parts, &footer_parts).into_bytes(),
    );
    package.set_part("word/styles.xml", STYLES_XML.as_bytes().to_vec());
    package.set_part("word/settings.xml", settings_xml(even_and_odd).into_bytes());
    package.set_part(
        "word/document.xml",
        document_xml(doc, &header_parts, &footer_parts, title_page)?,
    );
    for part in header_parts.iter().chain(footer_parts.iter()) {
        package.set_part(
            format!("word/{}", part.file_name),
            render_part(&part.root_tag(), &part.content)?,
        );
    }
    Ok(package)
}

/// One header or footer part scheduled for emission
struct SectionPart {
    kind: &'static str,
    reference_type: &'static str,
    file_name: String,
    rel_id: String,
    content: Vec<ContentNode>,
}

impl SectionPart {
    fn root_tag(&self) -> String {
        if self.kind == "header" {
            "w:hdr".to_string()
        } else {
            "w:ftr".to_string()
        }
    }
}

fn plan_parts(section: Option<&HeaderFooterSection>, kind: &'static str) -> Vec<SectionPart> {
    let Some(section) = section else {
        return Vec::new();
    };
    // Relationship ids: rId1 styles, rId2 settings, headers from rId3,
    // footers from rId13. The ranges never collide for three page kinds.
    let rel_base = if kind == "header" { 3 } else { 13 };
    let mut parts = Vec::new();
    let mut schedule = |reference_type: &'static str, content: &Vec<ContentNode>| {
        if content.is_empty() {
            return;
        }
        let ordinal = parts.len() + 1;
        parts.push(SectionPart {
            kind,
            reference_type,
            file_name: format!("{}{}.xml", kind, ordinal),
            rel_id: format!("rId{}", rel_base + parts.len()),
            content: content.clone(),
        });
    };
    schedule("default", &section.default_page);
    if section.different_first_page {
        schedule("first", &section.first_page);
    }
    if section.different_odd_and_even {
        schedule("even", &section.even_page);
    }
    parts
}

fn document_xml(
    doc: &TranslatedDocument,
    header_parts: &[SectionPart],
    footer_parts: &[SectionPart],
    title_page: bool,
) -> Result<Vec<u8>, DocumentError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(elem(
        "w:document",
        &[("xmlns:w", W_NS), ("xmlns:r", R_NS)],
    )))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    // Cover flows naturally; every body table starts on a fresh page.
    write_raw(&mut writer, &render_block(&doc.cover, false))?;
    write_raw(&mut writer, &render_block(&doc.body, true))?;

    writer.write_event(Event::Start(BytesStart::new("w:sectPr")))?;
    for part in header_parts.iter().chain(footer_parts.iter()) {
        let name = format!("w:{}Reference", part.kind);
        writer.write_event(Event::Empty(elem(
            &name,
            &[("w:type", part.reference_type), ("r:id", part.rel_id.as_str())],
        )))?;
    }
    writer.write_event(Event::Empty(elem(
        "w:pgSz",
        &[
            ("w:w", &PAGE_WIDTH.to_string()),
            ("w:h", &PAGE_HEIGHT.to_string()),
        ],
    )))?;
    writer.write_event(Event::Empty(elem(
        "w:pgMar",
        &[
            ("w:top", &MARGIN_TOP.to_string()),
            ("w:right", &MARGIN_RIGHT.to_string()),
            ("w:bottom", &MARGIN_BOTTOM.to_string()),
            ("w:left", &MARGIN_LEFT.to_string()),
            ("w:header", &HEADER_DISTANCE.to_string()),
            ("w:footer", &FOOTER_DISTANCE.to_string()),
            ("w:gutter", "0"),
        ],
    )))?;
    if title_page {
        writer.write_event(Event::Empty(BytesStart::new("w:titlePg")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:sectPr")))?;

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;
    Ok(writer.into_inner().into_inner())
}

fn render_part(root_tag: &str, nodes: &[ContentNode]) -> Result<Vec<u8>, DocumentError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(elem(
        root_tag,
        &[("xmlns:w", W_NS), ("xmlns:r", R_NS)],
    )))?;
    write_raw(&mut writer, &render_block(nodes, false))?;
    writer.write_event(Event::End(BytesEnd::new(root_tag)))?;
    Ok(writer.into_inner().into_inner())
}

/// Serialize each node into its own buffer; a failing node is logged and
/// dropped so the rest of the document still saves.
fn render_block(nodes: &[ContentNode], page_breaks: bool) -> Vec<u8> {
    let mut out = Vec::new();
    for node in nodes {
        match render_node(node, page_breaks) {
            Ok(bytes) => out.extend_from_slice(&bytes),
            Err(e) => error!(
                "skipping unwritable node at position {}: {}",
                node.position(),
                e
            ),
        }
    }
    out
}

fn render_node(node: &ContentNode, page_breaks: bool) -> Result<Vec<u8>, quick_xml::Error> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    match node {
        ContentNode::Paragraph(p) => write_paragraph(&mut writer, p)?,
        ContentNode::Table(t) => {
            if page_breaks {
                write_page_break(&mut writer)?;
            }
            write_table(&mut writer, t)?;
        }
    }
    Ok(writer.into_inner().into_inner())
}

fn write_page_break<W: Write>(writer: &mut Writer<W>) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    writer.write_event(Event::Empty(elem("w:br", &[("w:type", "page")])))?;
    writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn write_paragraph<W: Write>(
    writer: &mut Writer<W>,
    paragraph: &ParagraphNode,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;
    let format = &paragraph.format;
    if let Some(style) = &format.style {
        writer.write_event(Event::Empty(elem("w:pStyle", &[("w:val", style)])))?;
    }
    if let Some(alignment) = format.alignment {
        writer.write_event(Event::Empty(elem("w:jc", &[("w:val", alignment.jc_value())])))?;
    }
    // space-after defaults to zero; the application default drifts away
    // from the template otherwise
    let mut spacing = elem("w:spacing", &[]);
    if let Some(before) = format.space_before {
        spacing.push_attribute(("w:before", before.to_string().as_str()));
    }
    spacing.push_attribute(("w:after", format.space_after.unwrap_or(0).to_string().as_str()));
    if let Some(line) = format.line_spacing {
        spacing.push_attribute(("w:line", line.to_string().as_str()));
        let rule = format.line_rule.as_deref().unwrap_or("auto");
        spacing.push_attribute(("w:lineRule", rule));
    }
    writer.write_event(Event::Empty(spacing))?;
    if format.first_line_indent.is_some() || format.left_indent.is_some() {
        let mut ind = elem("w:ind", &[]);
        if let Some(left) = format.left_indent {
            ind.push_attribute(("w:left", left.to_string().as_str()));
        }
        match format.first_line_indent {
            Some(first) if first >= 0 => {
                ind.push_attribute(("w:firstLine", first.to_string().as_str()));
            }
            Some(hanging) => {
                ind.push_attribute(("w:hanging", (-hanging).to_string().as_str()));
            }
            None => {}
        }
        writer.write_event(Event::Empty(ind))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;

    for run in &paragraph.runs {
        write_run(writer, run)?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn write_run<W: Write>(writer: &mut Writer<W>, run: &Run) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
    let (latin, east_asian) = effective_fonts(run);
    writer.write_event(Event::Empty(elem(
        "w:rFonts",
        &[("w:ascii", latin.as_str()), ("w:hAnsi", latin.as_str()), ("w:eastAsia", east_asian.as_str())],
    )))?;
    if run.format.bold == Some(true) {
        writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
    }
    if run.format.italic == Some(true) {
        writer.write_event(Event::Empty(BytesStart::new("w:i")))?;
    }
    if run.format.underline == Some(true) {
        writer.write_event(Event::Empty(elem("w:u", &[("w:val", "single")])))?;
    }
    if let Some(color) = &run.format.color {
        writer.write_event(Event::Empty(elem("w:color", &[("w:val", color)])))?;
    }
    if let Some(size_pt) = run.format.size_pt {
        let half_points = ((size_pt * 2.0).round() as u32).to_string();
        writer.write_event(Event::Empty(elem("w:sz", &[("w:val", half_points.as_str())])))?;
        writer.write_event(Event::Empty(elem("w:szCs", &[("w:val", half_points.as_str())])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
    writer.write_event(Event::Start(elem("w:t", &[("xml:space", "preserve")])))?;
    writer.write_event(Event::Text(BytesText::new(&run.text)))?;
    writer.write_event(Event::End(BytesEnd::new("w:t")))?;
    writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    Ok(())
}

/// Font resolution: recorded fonts win; otherwise non-whitespace text gets
/// the Western/CJK pair and whitespace-only runs get the CJK font in both
/// slots.
fn effective_fonts(run: &Run) -> (String, String) {
    let latin = run.format.font_name.clone().unwrap_or_else(|| {
        if run.text.trim().is_empty() {
            FALLBACK_EAST_ASIAN_FONT.to_string()
        } else {
            FALLBACK_LATIN_FONT.to_string()
        }
    });
    let east_asian = run
        .format
        .east_asian_font
        .clone()
        .or_else(|| run.format.font_name.clone())
        .unwrap_or_else(|| FALLBACK_EAST_ASIAN_FONT.to_string());
    (latin, east_asian)
}

fn write_table<W: Write>(writer: &mut Writer<W>, table: &TableNode) -> Result<(), quick_xml::Error> {
    let grid = table_grid(table);

    writer.write_event(Event::Start(BytesStart::new("w:tbl")))?;
    writer.write_event(Event::Start(BytesStart::new("w:tblPr")))?;
    let total: u32 = grid.iter().sum();
    writer.write_event(Event::Empty(elem(
        "w:tblW",
        &[("w:w", &total.to_string()), ("w:type", "dxa")],
    )))?;
    writer.write_event(Event::Empty(elem(
        "w:jc",
        &[("w:val", table.alignment.jc_value())],
    )))?;
    // fixed layout = autofit disabled
    writer.write_event(Event::Empty(elem("w:tblLayout", &[("w:type", "fixed")])))?;
    writer.write_event(Event::Start(BytesStart::new("w:tblBorders")))?;
    for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        let name = format!("w:{}", side);
        writer.write_event(Event::Empty(elem(
            &name,
            &[("w:val", "single"), ("w:sz", "4"), ("w:space", "0"), ("w:color", "auto")],
        )))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tblBorders")))?;
    writer.write_event(Event::End(BytesEnd::new("w:tblPr")))?;

    writer.write_event(Event::Start(BytesStart::new("w:tblGrid")))?;
    for width in &grid {
        writer.write_event(Event::Empty(elem("w:gridCol", &[("w:w", &width.to_string())])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tblGrid")))?;

    for row in 0..table.rows {
        writer.write_event(Event::Start(BytesStart::new("w:tr")))?;
        writer.write_event(Event::Start(BytesStart::new("w:trPr")))?;
        writer.write_event(Event::Empty(elem(
            "w:trHeight",
            &[("w:val", &ROW_HEIGHT.to_string())],
        )))?;
        writer.write_event(Event::End(BytesEnd::new("w:trPr")))?;
        // Owners and unmerged cells only; a gridSpan on the owner re-covers
        // the placeholder slots.
        for cell in table.cells.iter().filter(|c| c.row == row && c.is_renderable()) {
            write_cell(writer, cell)?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:tr")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tbl")))?;
    Ok(())
}

fn write_cell<W: Write>(writer: &mut Writer<W>, cell: &CellNode) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("w:tc")))?;
    writer.write_event(Event::Start(BytesStart::new("w:tcPr")))?;
    if let Some(width) = cell.width {
        writer.write_event(Event::Empty(elem(
            "w:tcW",
            &[("w:w", &width.to_string()), ("w:type", "dxa")],
        )))?;
    }
    if cell.grid_span > 1 {
        writer.write_event(Event::Empty(elem(
            "w:gridSpan",
            &[("w:val", &cell.grid_span.to_string())],
        )))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tcPr")))?;

    let mut ends_with_paragraph = false;
    for node in &cell.content {
        match node {
            ContentNode::Paragraph(p) => {
                write_paragraph(writer, p)?;
                ends_with_paragraph = true;
            }
            ContentNode::Table(t) => {
                write_table(writer, t)?;
                ends_with_paragraph = false;
            }
        }
    }
    // a table cell must end with a paragraph
    if !ends_with_paragraph {
        writer.write_event(Event::Empty(BytesStart::new("w:p")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tc")))?;
    Ok(())
}

/// Declared grid widths, or widths recovered from the first row's cells, or
/// an even division of the printable width as a last resort.
fn table_grid(table: &TableNode) -> Vec<u32> {
    if table.grid_widths.len() == table.cols && !table.grid_widths.is_empty() {
        return table.grid_widths.clone();
    }
    if table.cols == 0 {
        return Vec::new();
    }
    let printable = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let fallback = printable / table.cols as u32;
    let mut grid = vec![fallback; table.cols];
    for cell in table.cells.iter().filter(|c| c.row == 0 && c.grid_span == 1) {
        if let (Some(width), Some(slot)) = (cell.width, grid.get_mut(cell.col)) {
            *slot = width;
        }
    }
    grid
}

fn write_raw<W: Write>(writer: &mut Writer<W>, bytes: &[u8]) -> Result<(), quick_xml::Error> {
    writer
        .get_mut()
        .write_all(bytes)
        .map_err(|e| quick_xml::Error::Io(Arc::new(e)))
}

fn elem(name: &str, attrs: &[(&str, &str)]) -> BytesStart<'static> {
    let mut element = BytesStart::new(name.to_string());
    for (key, value) in attrs {
        element.push_attribute((*key, *value));
    }
    element
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Times New Roman" w:hAnsi="Times New Roman" w:eastAsia="宋体"/><w:sz w:val="21"/><w:szCs w:val="21"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="0"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style></w:styles>"#;

fn settings_xml(even_and_odd: bool) -> String {
    let flag = if even_and_odd { "<w:evenAndOddHeaders/>" } else { "" };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{}</w:settings>"#,
        flag
    )
}

fn content_types_xml(header_parts: &[SectionPart], footer_parts: &[SectionPart]) -> String {
    let mut overrides = String::new();
    for part in header_parts.iter().chain(footer_parts.iter()) {
        overrides.push_str(&format!(
            r#"<Override PartName="/word/{}" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.{}+xml"/>"#,
            part.file_name, part.kind
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/>{}</Types>"#,
        overrides
    )
}

fn document_rels_xml(header_parts: &[SectionPart], footer_parts: &[SectionPart]) -> String {
    let mut relationships = String::from(
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/>"#,
    );
    for part in header_parts.iter().chain(footer_parts.iter()) {
        relationships.push_str(&format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/{}" Target="{}"/>"#,
            part.rel_id, part.kind, part.file_name
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        relationships
    )
}

/*!
 * Word document handling: content model, package access, reading,
 * region classification and writing.
 *
 * The content model keeps every node's original sibling position so the
 * interleaved paragraph/table order of the source document can always be
 * reconstructed, and keeps a per-kind element index (paragraphs and tables
 * counted separately) because the template rules address tables by that
 * index.
 */

pub mod classifier;
pub mod package;
pub mod reader;
pub mod writer;

pub use package::OpcPackage;
pub use writer::TranslatedDocument;

/// Template region assigned by the classifier. A node gets at most one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionTag {
    /// Not part of any recognized template region
    #[default]
    None,
    /// Document title at the top of the cover
    TopTitle,
    /// Key-value front-matter lines between title and first table
    Preamble,
    /// Approval/signature table
    Approve,
    /// Revision-record table
    RevisionRecord,
    /// Cell holding the actual document body
    MainText,
}

/// Paragraph alignment, mapped from and to the `w:jc` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn from_jc(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }

    pub fn jc_value(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

/// Paragraph-level formatting snapshot.
///
/// Spacing values are in twentieths of a point (twips), matching the file
/// format. `first_line_indent` is negative for hanging indents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphFormat {
    pub style: Option<String>,
    pub alignment: Option<Alignment>,
    pub space_before: Option<u32>,
    pub space_after: Option<u32>,
    pub line_spacing: Option<u32>,
    pub line_rule: Option<String>,
    pub first_line_indent: Option<i32>,
    pub left_indent: Option<i32>,
}

/// Run-level formatting snapshot. `size_pt` is in points (`w:sz` stores
/// half-points; the conversion is exact for the half-point grid Word uses).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunFormat {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub size_pt: Option<f32>,
    pub font_name: Option<String>,
    pub east_asian_font: Option<String>,
    pub color: Option<String>,
}

/// A formatted run of text inside a paragraph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub format: RunFormat,
}

/// A paragraph with its position among the container's element children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphNode {
    /// Index among all element siblings of the container
    pub position: usize,
    /// Index among paragraphs only
    pub element_index: usize,
    pub tag: RegionTag,
    /// Concatenated run text
    pub text: String,
    pub format: ParagraphFormat,
    pub runs: Vec<Run>,
    /// Target language of an inserted translation sibling, `None` for
    /// original content
    pub language: Option<String>,
}

/// One grid slot of a table. Horizontal merges are represented by an owner
/// cell (`is_merge_start` with `grid_span > 1`) followed by placeholder
/// cells for the covered slots, so every `(row, col)` address exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellNode {
    pub row: usize,
    pub col: usize,
    /// Preferred width in twips, if the file records one
    pub width: Option<u32>,
    /// Number of grid columns this cell's merge group spans
    pub grid_span: usize,
    /// True only on the owner cell of a multi-column merge
    pub is_merge_start: bool,
    pub tag: RegionTag,
    /// Nested block content: paragraphs and nested tables
    pub content: Vec<ContentNode>,
}

impl CellNode {
    /// Whether the writer emits this cell (owners and unmerged cells;
    /// placeholders are skipped and re-covered by `gridSpan`).
    pub fn is_renderable(&self) -> bool {
        self.grid_span <= 1 || self.is_merge_start
    }

    /// Concatenated text of the cell's paragraphs, used for template
    /// pattern matching.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.content {
            if let ContentNode::Paragraph(p) = node {
                out.push_str(&p.text);
            }
        }
        out
    }
}

/// A table with its sibling position, grid geometry and row-major cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TableNode {
    /// Index among all element siblings of the container
    pub position: usize,
    /// Index among tables only
    pub element_index: usize,
    pub tag: RegionTag,
    pub rows: usize,
    pub cols: usize,
    pub alignment: Alignment,
    /// Declared grid column widths in twips
    pub grid_widths: Vec<u32>,
    /// Row-major, one entry per grid slot including merge placeholders
    pub cells: Vec<CellNode>,
}

impl Default for TableNode {
    fn default() -> Self {
        TableNode {
            position: 0,
            element_index: 0,
            tag: RegionTag::None,
            rows: 0,
            cols: 0,
            alignment: Alignment::Center,
            grid_widths: Vec::new(),
            cells: Vec::new(),
        }
    }
}

impl TableNode {
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellNode> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut CellNode> {
        self.cells.iter_mut().find(|c| c.row == row && c.col == col)
    }
}

/// A block-level node: the unit the classifier and inserter operate on.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    Paragraph(ParagraphNode),
    Table(TableNode),
}

impl ContentNode {
    /// Sibling position in the originating container
    pub fn position(&self) -> usize {
        match self {
            ContentNode::Paragraph(p) => p.position,
            ContentNode::Table(t) => t.position,
        }
    }

    /// Per-kind index (paragraphs and tables counted separately)
    pub fn element_index(&self) -> usize {
        match self {
            ContentNode::Paragraph(p) => p.element_index,
            ContentNode::Table(t) => t.element_index,
        }
    }

    pub fn tag(&self) -> RegionTag {
        match self {
            ContentNode::Paragraph(p) => p.tag,
            ContentNode::Table(t) => t.tag,
        }
    }

    pub fn set_tag(&mut self, tag: RegionTag) {
        match self {
            ContentNode::Paragraph(p) => p.tag = tag,
            ContentNode::Table(t) => t.tag = tag,
        }
    }

    pub fn is_paragraph(&self) -> bool {
        matches!(self, ContentNode::Paragraph(_))
    }

    pub fn is_table(&self) -> bool {
        matches!(self, ContentNode::Table(_))
    }

    pub fn as_paragraph(&self) -> Option<&ParagraphNode> {
        match self {
            ContentNode::Paragraph(p) => Some(p),
            ContentNode::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableNode> {
        match self {
            ContentNode::Table(t) => Some(t),
            ContentNode::Paragraph(_) => None,
        }
    }
}

/// Header or footer content for one document section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFooterSection {
    pub section_index: usize,
    /// No references of this kind in the section; content is inherited
    pub linked_to_previous: bool,
    pub different_first_page: bool,
    pub different_odd_and_even: bool,
    pub first_page: Vec<ContentNode>,
    pub default_page: Vec<ContentNode>,
    pub even_page: Vec<ContentNode>,
}

/// An inline picture found in the document; not reconstructed on write,
/// only counted for the warning log.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureRef {
    pub index: usize,
    pub rel_id: String,
    pub name: String,
}

/// A legacy drawing shape found in the document; same treatment as pictures.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRef {
    pub index: usize,
    pub id: String,
    pub name: String,
}

/// Everything the reader extracts from a docx file.
#[derive(Debug, Clone, Default)]
pub struct DocumentContent {
    pub body: Vec<ContentNode>,
    pub headers: Vec<HeaderFooterSection>,
    pub footers: Vec<HeaderFooterSection>,
    pub pictures: Vec<PictureRef>,
    pub shapes: Vec<ShapeRef>,
    /// Structural oddities noticed while reading, surfaced in warning.txt
    pub warnings: Vec<String>,
}

/// Result of the cover/body split.
#[derive(Debug, Clone, Default)]
pub struct SplitDocument {
    pub cover: Vec<ContentNode>,
    pub body: Vec<ContentNode>,
}

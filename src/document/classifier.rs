/*!
 * Template region classification and the cover/body split.
 *
 * The SOP template puts a title at the top, key-value preamble lines under
 * it, an approval table, then a revision-record table whose full-width
 * merged cell holds the actual document body. Each pass takes ownership of
 * the node list and returns it tagged; passes are deterministic, so running
 * the chain twice yields identical tags.
 */

use log::warn;

use crate::document::{ContentNode, RegionTag, SplitDocument};

/// Classifier knobs that vary per template family.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Literal heading of a revision-record table's first cell
    pub revision_header: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            revision_header: "版本".to_string(),
        }
    }
}

/// Run all tagging passes in template order
pub fn classify(nodes: Vec<ContentNode>, config: &ClassifierConfig) -> Vec<ContentNode> {
    let nodes = flag_title(nodes);
    let nodes = flag_preamble(nodes);
    let nodes = flag_approve_table(nodes);
    flag_main_text(nodes, config)
}

/// Tag the document title: the first paragraph with non-empty text or the
/// first single-cell table, whichever comes first in sibling order.
pub fn flag_title(mut nodes: Vec<ContentNode>) -> Vec<ContentNode> {
    for node in nodes.iter_mut() {
        match node {
            ContentNode::Paragraph(p) if !p.text.trim().is_empty() => {
                p.tag = RegionTag::TopTitle;
                break;
            }
            ContentNode::Table(t) if t.rows == 1 && t.cols == 1 => {
                t.tag = RegionTag::TopTitle;
                break;
            }
            _ => {}
        }
    }
    nodes
}

/// Tag preamble lines: every non-empty paragraph strictly between the title
/// and the first table that follows it.
pub fn flag_preamble(mut nodes: Vec<ContentNode>) -> Vec<ContentNode> {
    let Some(title_index) = nodes.iter().position(|n| n.tag() == RegionTag::TopTitle) else {
        return nodes;
    };
    let Some(table_index) = nodes
        .iter()
        .enumerate()
        .skip(title_index + 1)
        .find(|(_, n)| n.is_table())
        .map(|(i, _)| i)
    else {
        return nodes;
    };
    for node in &mut nodes[title_index + 1..table_index] {
        if let ContentNode::Paragraph(p) = node {
            if !p.text.trim().is_empty() && p.tag == RegionTag::None {
                p.tag = RegionTag::Preamble;
            }
        }
    }
    nodes
}

/// Tag the approval table: the table with element index 0, unless it was
/// already claimed as the title.
pub fn flag_approve_table(mut nodes: Vec<ContentNode>) -> Vec<ContentNode> {
    for node in nodes.iter_mut() {
        if let ContentNode::Table(t) = node {
            if t.element_index == 0 && t.tag == RegionTag::None {
                t.tag = RegionTag::Approve;
            }
        }
    }
    nodes
}

/// Tag the revision-record table (table element index 1 whose first cell
/// heading matches the configured literal) and, inside it, the full-width
/// merged cell that holds the document body.
pub fn flag_main_text(mut nodes: Vec<ContentNode>, config: &ClassifierConfig) -> Vec<ContentNode> {
    for node in nodes.iter_mut() {
        let ContentNode::Table(t) = node else {
            continue;
        };
        if t.element_index != 1 {
            continue;
        }
        let heading_matches = t
            .cell(0, 0)
            .map(|cell| cell.text().trim() == config.revision_header)
            .unwrap_or(false);
        if !heading_matches {
            continue;
        }
        if t.tag == RegionTag::None {
            t.tag = RegionTag::RevisionRecord;
        }
        let cols = t.cols;
        for cell in t.cells.iter_mut() {
            if cell.is_merge_start && cell.grid_span == cols && cols > 1 {
                cell.tag = RegionTag::MainText;
            }
        }
    }
    nodes
}

/// Decides where the cover ends and the body begins.
pub trait SplitPolicy {
    /// True if `node` is the first node of the body
    fn is_boundary(&self, node: &ContentNode, title_was_table: bool) -> bool;
}

/// Default policy: the body starts at the first table after the title,
/// which is the table with element index 0, or index 1 when the title
/// itself was a table.
pub struct TableBoundaryPolicy;

impl SplitPolicy for TableBoundaryPolicy {
    fn is_boundary(&self, node: &ContentNode, title_was_table: bool) -> bool {
        let boundary_index = usize::from(title_was_table);
        matches!(node, ContentNode::Table(t) if t.element_index == boundary_index)
    }
}

/// Split the tagged node list into cover and body. When no boundary is
/// found the whole document is kept as cover so nothing is lost.
pub fn split_cover_body(nodes: Vec<ContentNode>, policy: &dyn SplitPolicy) -> SplitDocument {
    let title_was_table = nodes
        .iter()
        .find(|n| n.tag() == RegionTag::TopTitle)
        .map(|n| n.is_table())
        .unwrap_or(false);

    let boundary = nodes
        .iter()
        .position(|n| policy.is_boundary(n, title_was_table));
    match boundary {
        Some(index) => {
            let mut cover = nodes;
            let body = cover.split_off(index);
            SplitDocument { cover, body }
        }
        None => {
            warn!("no cover/body boundary table found; treating the whole document as cover");
            SplitDocument {
                cover: nodes,
                body: Vec::new(),
            }
        }
    }
}

/*!
 * Sibling-insertion passes over the document content model.
 *
 * Each pass takes ownership of a node list and returns it with one
 * translated sibling appended after every text-bearing original, per
 * target language in order. A failed translation suppresses only that
 * sibling; originals always survive, so a document with a dead provider
 * still round-trips its content.
 */

use futures::future::BoxFuture;
use futures::FutureExt;
use log::warn;

use crate::document::{ContentNode, HeaderFooterSection, ParagraphNode, RegionTag, Run};
use crate::providers::Translate;

/// Append translated sibling paragraphs after every non-empty paragraph.
/// Tables are passed through untouched (see `insert_table_translations`).
pub async fn insert_paragraph_translations(
    nodes: Vec<ContentNode>,
    translator: &dyn Translate,
    languages: &[String],
) -> Vec<ContentNode> {
    let mut out = Vec::with_capacity(nodes.len() * (languages.len() + 1));
    for node in nodes {
        let siblings = match &node {
            ContentNode::Paragraph(p) if !p.text.trim().is_empty() => {
                plain_siblings(p, translator, languages).await
            }
            _ => Vec::new(),
        };
        out.push(node);
        out.extend(siblings);
    }
    out
}

/// Translate table content in place: for every merge owner or unmerged
/// cell, run the paragraph pass and recurse into nested tables. Covered
/// merge placeholders are never touched.
pub fn insert_table_translations<'a>(
    nodes: Vec<ContentNode>,
    translator: &'a dyn Translate,
    languages: &'a [String],
) -> BoxFuture<'a, Vec<ContentNode>> {
    async move {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                ContentNode::Table(mut table) => {
                    for cell in table.cells.iter_mut() {
                        if !cell.is_renderable() {
                            continue;
                        }
                        let content = std::mem::take(&mut cell.content);
                        let content =
                            insert_paragraph_translations(content, translator, languages).await;
                        cell.content =
                            insert_table_translations(content, translator, languages).await;
                    }
                    out.push(ContentNode::Table(table));
                }
                other => out.push(other),
            }
        }
        out
    }
    .boxed()
}

/// Cover pass: title and preamble get special handling, the remainder is
/// translated like any other block.
///
/// The cover is processed as three segments: everything up to and
/// including the title, the preamble lines, and the rest. Preamble lines
/// are label:value pairs; the two halves are translated independently and
/// rejoined with a full-width colon so document numbers survive verbatim.
pub async fn insert_cover_translations(
    nodes: Vec<ContentNode>,
    translator: &dyn Translate,
    languages: &[String],
) -> Vec<ContentNode> {
    let mut title_end = 0;
    let mut preamble_end = 0;
    for (index, node) in nodes.iter().enumerate() {
        match node.tag() {
            RegionTag::TopTitle => title_end = index + 1,
            RegionTag::Preamble => preamble_end = index + 1,
            _ => {}
        }
    }
    let preamble_end = preamble_end.max(title_end);

    let mut rest = nodes;
    let tail = rest.split_off(preamble_end);
    let preamble = rest.split_off(title_end);
    let head = rest;

    let head = insert_paragraph_translations(head, translator, languages).await;
    let mut out = insert_table_translations(head, translator, languages).await;

    for node in preamble {
        let siblings = match &node {
            ContentNode::Paragraph(p)
                if p.tag == RegionTag::Preamble && !p.text.trim().is_empty() =>
            {
                preamble_siblings(p, translator, languages).await
            }
            ContentNode::Paragraph(p) if !p.text.trim().is_empty() => {
                plain_siblings(p, translator, languages).await
            }
            _ => Vec::new(),
        };
        out.push(node);
        out.extend(siblings);
    }

    let tail = insert_paragraph_translations(tail, translator, languages).await;
    out.extend(insert_table_translations(tail, translator, languages).await);
    out
}

/// Translate the content lists of every header or footer section
pub async fn insert_section_translations(
    sections: Vec<HeaderFooterSection>,
    translator: &dyn Translate,
    languages: &[String],
) -> Vec<HeaderFooterSection> {
    let mut out = Vec::with_capacity(sections.len());
    for mut section in sections {
        for content in [
            &mut section.first_page,
            &mut section.default_page,
            &mut section.even_page,
        ] {
            let nodes = std::mem::take(content);
            let nodes = insert_paragraph_translations(nodes, translator, languages).await;
            *content = insert_table_translations(nodes, translator, languages).await;
        }
        out.push(section);
    }
    out
}

async fn plain_siblings(
    paragraph: &ParagraphNode,
    translator: &dyn Translate,
    languages: &[String],
) -> Vec<ContentNode> {
    let mut siblings = Vec::new();
    for language in languages {
        match translator.translate(&paragraph.text, language).await {
            Ok(translated) => {
                siblings.push(ContentNode::Paragraph(translated_sibling(
                    paragraph, translated, language,
                )));
            }
            Err(e) => warn!(
                "translation to {} failed for {:?}: {}; keeping original only",
                language,
                preview(&paragraph.text),
                e
            ),
        }
    }
    siblings
}

async fn preamble_siblings(
    paragraph: &ParagraphNode,
    translator: &dyn Translate,
    languages: &[String],
) -> Vec<ContentNode> {
    let Some((label, value)) = split_once_colon(&paragraph.text) else {
        // no colon; treat the whole line as translatable text
        return plain_siblings(paragraph, translator, languages).await;
    };
    let mut siblings = Vec::new();
    for language in languages {
        let translated_label = translator.translate(label, language).await;
        let translated_value = translator.translate(value, language).await;
        match (translated_label, translated_value) {
            (Ok(label), Ok(value)) => {
                let text = format!("{}：{}", label, value);
                siblings.push(ContentNode::Paragraph(translated_sibling(
                    paragraph, text, language,
                )));
            }
            (label, value) => {
                for result in [label, value] {
                    if let Err(e) = result {
                        warn!(
                            "translation to {} failed for preamble {:?}: {}; keeping original only",
                            language,
                            preview(&paragraph.text),
                            e
                        );
                    }
                }
            }
        }
    }
    siblings
}

/// A translated sibling shares position, element index, tag and formats
/// with its original; only text and language differ. The first run's
/// format carries over so the translation renders in the same style.
fn translated_sibling(original: &ParagraphNode, text: String, language: &str) -> ParagraphNode {
    let run_format = original
        .runs
        .first()
        .map(|r| r.format.clone())
        .unwrap_or_default();
    ParagraphNode {
        position: original.position,
        element_index: original.element_index,
        tag: original.tag,
        text: text.clone(),
        format: original.format.clone(),
        runs: vec![Run {
            text,
            format: run_format,
        }],
        language: Some(language.to_string()),
    }
}

/// Split on the earliest colon, half-width or full-width. Returns the text
/// before it and after it, separator excluded.
fn split_once_colon(text: &str) -> Option<(&str, &str)> {
    let half = text.find(':');
    let full = text.find('：');
    let (index, len) = match (half, full) {
        (Some(h), Some(f)) if h < f => (h, 1),
        (_, Some(f)) => (f, '：'.len_utf8()),
        (Some(h), None) => (h, 1),
        (None, None) => return None,
    };
    Some((&text[..index], &text[index + len..]))
}

fn preview(text: &str) -> String {
    const MAX: usize = 32;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(MAX).collect();
        format!("{}…", truncated)
    }
}

/*!
 * Tests for the translation sibling-insertion passes
 */

use doctrans::document::{ContentNode, HeaderFooterSection, RegionTag};
use doctrans::providers::MockTranslator;
use doctrans::translation::inserter::{
    insert_cover_translations, insert_paragraph_translations, insert_section_translations,
    insert_table_translations,
};

use crate::common;

fn languages(langs: &[&str]) -> Vec<String> {
    langs.iter().map(|l| l.to_string()).collect()
}

#[tokio::test]
async fn test_insert_paragraph_translations_withTwoLanguages_shouldInsertSiblingsInOrder() {
    let mock = MockTranslator::prefixed();
    let langs = languages(&["英语", "越南语"]);
    let nodes = vec![common::paragraph(0, 0, "你好")];

    let out = insert_paragraph_translations(nodes, &mock, &langs).await;

    assert_eq!(out.len(), 3);
    let original = out[0].as_paragraph().unwrap();
    let english = out[1].as_paragraph().unwrap();
    let vietnamese = out[2].as_paragraph().unwrap();
    assert_eq!(original.language, None);
    assert_eq!(english.text, "[英语] 你好");
    assert_eq!(english.language.as_deref(), Some("英语"));
    assert_eq!(vietnamese.text, "[越南语] 你好");
    // siblings share position and formatting identity with the original
    assert_eq!(english.position, original.position);
    assert_eq!(english.element_index, original.element_index);
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_insert_paragraph_translations_withEmptyParagraph_shouldNotInsert() {
    let mock = MockTranslator::prefixed();
    let langs = languages(&["英语"]);
    let nodes = vec![common::paragraph(0, 0, "  \t ")];

    let out = insert_paragraph_translations(nodes, &mock, &langs).await;

    assert_eq!(out.len(), 1);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_insert_paragraph_translations_withFailingProvider_shouldKeepOriginals() {
    let mock = MockTranslator::failing();
    let langs = languages(&["英语"]);
    let nodes: Vec<ContentNode> = (0..5)
        .map(|i| common::paragraph(i, i, &format!("第{}段", i)))
        .collect();

    let out = insert_paragraph_translations(nodes, &mock, &langs).await;

    assert_eq!(out.len(), 5);
    for node in &out {
        assert_eq!(node.as_paragraph().unwrap().language, None);
    }
    assert_eq!(mock.call_count(), 5);
}

#[tokio::test]
async fn test_insert_cover_translations_withPreambleColon_shouldSplitAndRejoin() {
    let mock = MockTranslator::uppercase();
    let langs = languages(&["英语"]);
    let mut title = common::paragraph(0, 0, "title");
    title.set_tag(RegionTag::TopTitle);
    let mut preamble = common::paragraph(1, 1, "文件编号：c2gm-013-000");
    preamble.set_tag(RegionTag::Preamble);

    let out = insert_cover_translations(vec![title, preamble], &mock, &langs).await;

    assert_eq!(out.len(), 4);
    assert_eq!(out[1].as_paragraph().unwrap().text, "TITLE");
    // label and value are translated independently; the label here has no
    // letters to uppercase, the value does, and the joiner is full-width
    let sibling = out[3].as_paragraph().unwrap();
    assert_eq!(sibling.text, "文件编号：C2GM-013-000");
    assert_eq!(sibling.tag, RegionTag::Preamble);
    // one call for the title, one per preamble half
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_insert_cover_translations_withHalfWidthColon_shouldJoinWithFullWidth() {
    let mock = MockTranslator::uppercase();
    let langs = languages(&["英语"]);
    let mut preamble = common::paragraph(0, 0, "doc no:abc");
    preamble.set_tag(RegionTag::Preamble);

    let out = insert_cover_translations(vec![preamble], &mock, &langs).await;

    assert_eq!(out.len(), 2);
    assert_eq!(out[1].as_paragraph().unwrap().text, "DOC NO：ABC");
}

#[tokio::test]
async fn test_insert_cover_translations_withColonlessPreamble_shouldTranslateWholeLine() {
    let mock = MockTranslator::uppercase();
    let langs = languages(&["英语"]);
    let mut preamble = common::paragraph(0, 0, "plain line");
    preamble.set_tag(RegionTag::Preamble);

    let out = insert_cover_translations(vec![preamble], &mock, &langs).await;

    assert_eq!(out.len(), 2);
    assert_eq!(out[1].as_paragraph().unwrap().text, "PLAIN LINE");
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_insert_table_translations_withMergedRow_shouldTranslateOwnerOnly() {
    let mock = MockTranslator::prefixed();
    let langs = languages(&["英语"]);
    let nodes = vec![common::revision_table(0, 0, "正文内容")];

    let out = insert_table_translations(nodes, &mock, &langs).await;

    let table = out[0].as_table().unwrap();
    let owner = table.cell(1, 0).unwrap();
    assert!(owner.is_merge_start);
    assert_eq!(owner.content.len(), 2);
    assert_eq!(
        owner.content[1].as_paragraph().unwrap().text,
        "[英语] 正文内容"
    );
    // the covered placeholder stays empty
    assert!(table.cell(1, 1).unwrap().content.is_empty());
    // header cells translated once each plus the merged body cell
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_insert_table_translations_withNestedTable_shouldRecurse() {
    let mock = MockTranslator::prefixed();
    let langs = languages(&["英语"]);

    let mut outer = match common::simple_table(0, 0, 1, 1) {
        ContentNode::Table(t) => t,
        _ => unreachable!(),
    };
    outer.cells[0].content = vec![common::simple_table(0, 0, 1, 1)];

    let out = insert_table_translations(vec![ContentNode::Table(outer)], &mock, &langs).await;

    let outer = out[0].as_table().unwrap();
    let inner = outer.cells[0].content[0].as_table().unwrap();
    assert_eq!(inner.cells[0].content.len(), 2);
    assert_eq!(
        inner.cells[0].content[1].as_paragraph().unwrap().text,
        "[英语] r0c0"
    );
}

#[tokio::test]
async fn test_insert_section_translations_withHeaderContent_shouldTranslateAllPageKinds() {
    let mock = MockTranslator::prefixed();
    let langs = languages(&["英语"]);
    let section = HeaderFooterSection {
        different_first_page: true,
        first_page: vec![common::paragraph(0, 0, "首页页眉")],
        default_page: vec![common::paragraph(0, 0, "页眉")],
        ..HeaderFooterSection::default()
    };

    let out = insert_section_translations(vec![section], &mock, &langs).await;

    assert_eq!(out[0].first_page.len(), 2);
    assert_eq!(out[0].default_page.len(), 2);
    assert_eq!(
        out[0].default_page[1].as_paragraph().unwrap().text,
        "[英语] 页眉"
    );
}

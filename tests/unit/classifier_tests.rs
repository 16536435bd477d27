/*!
 * Tests for the region classifier and the cover/body split
 */

use doctrans::document::classifier::{
    classify, flag_title, split_cover_body, ClassifierConfig, TableBoundaryPolicy,
};
use doctrans::document::{ContentNode, RegionTag};

use crate::common;

/// A typical cover: title paragraph, preamble lines, approval table,
/// revision table with a merged body cell
fn template_nodes() -> Vec<ContentNode> {
    vec![
        common::paragraph(0, 0, "作业指导书"),
        common::paragraph(1, 1, "文件编号：C2GM-013-000"),
        common::paragraph(2, 2, "   "),
        common::paragraph(3, 3, "版本号：A0"),
        common::simple_table(4, 0, 2, 2),
        common::revision_table(5, 1, "正文内容"),
    ]
}

#[test]
fn test_flag_title_withLeadingEmptyParagraphs_shouldTagFirstNonEmpty() {
    let nodes = vec![
        common::paragraph(0, 0, ""),
        common::paragraph(1, 1, "  \t "),
        common::paragraph(2, 2, "标题"),
        common::paragraph(3, 3, "其他"),
    ];
    let tagged = flag_title(nodes);
    assert_eq!(tagged[0].tag(), RegionTag::None);
    assert_eq!(tagged[1].tag(), RegionTag::None);
    assert_eq!(tagged[2].tag(), RegionTag::TopTitle);
    assert_eq!(tagged[3].tag(), RegionTag::None);
}

#[test]
fn test_flag_title_withSingleCellTableFirst_shouldTagTable() {
    let nodes = vec![
        common::title_table(0, 0, "标题"),
        common::paragraph(1, 0, "后面的段落"),
    ];
    let tagged = flag_title(nodes);
    assert_eq!(tagged[0].tag(), RegionTag::TopTitle);
    assert_eq!(tagged[1].tag(), RegionTag::None);
}

#[test]
fn test_flag_title_withMultiCellTableBeforeTitle_shouldSkipIt() {
    // a 2x2 table is not a title shape; scanning continues past it
    let nodes = vec![
        common::simple_table(0, 0, 2, 2),
        common::paragraph(1, 0, "标题"),
    ];
    let tagged = flag_title(nodes);
    assert_eq!(tagged[0].tag(), RegionTag::None);
    assert_eq!(tagged[1].tag(), RegionTag::TopTitle);
}

#[test]
fn test_classify_withStandardTemplate_shouldTagAllRegions() {
    let tagged = classify(template_nodes(), &ClassifierConfig::default());

    assert_eq!(tagged[0].tag(), RegionTag::TopTitle);
    assert_eq!(tagged[1].tag(), RegionTag::Preamble);
    // whitespace-only line is not preamble
    assert_eq!(tagged[2].tag(), RegionTag::None);
    assert_eq!(tagged[3].tag(), RegionTag::Preamble);
    assert_eq!(tagged[4].tag(), RegionTag::Approve);
    assert_eq!(tagged[5].tag(), RegionTag::RevisionRecord);

    let revision = tagged[5].as_table().unwrap();
    let owner = revision.cell(1, 0).unwrap();
    assert_eq!(owner.tag, RegionTag::MainText);
    assert!(owner.is_merge_start);
    // the covered placeholder is not tagged
    assert_eq!(revision.cell(1, 1).unwrap().tag, RegionTag::None);
}

#[test]
fn test_classify_withCustomRevisionHeader_shouldMatchConfiguredLiteral() {
    let config = ClassifierConfig {
        revision_header: "Rev".to_string(),
    };
    let tagged = classify(template_nodes(), &config);
    // "版本" no longer matches, so the table keeps no revision tag
    assert_eq!(tagged[5].tag(), RegionTag::None);
}

#[test]
fn test_classify_withSameInputTwice_shouldBeDeterministic() {
    let once = classify(template_nodes(), &ClassifierConfig::default());
    let twice = classify(once.clone(), &ClassifierConfig::default());
    assert_eq!(once, twice);
}

#[test]
fn test_split_cover_body_withParagraphTitle_shouldBreakAtFirstTable() {
    let tagged = classify(template_nodes(), &ClassifierConfig::default());
    let split = split_cover_body(tagged, &TableBoundaryPolicy);
    assert_eq!(split.cover.len(), 4);
    assert_eq!(split.body.len(), 2);
    assert!(split.body[0].is_table());
    assert_eq!(split.body[0].element_index(), 0);
}

#[test]
fn test_split_cover_body_withTableTitle_shouldBreakAtSecondTable() {
    let nodes = vec![
        common::title_table(0, 0, "标题"),
        common::paragraph(1, 0, "文件编号：X"),
        common::simple_table(2, 1, 3, 2),
        common::paragraph(3, 1, "后记"),
    ];
    let tagged = classify(nodes, &ClassifierConfig::default());
    assert_eq!(tagged[0].tag(), RegionTag::TopTitle);

    let split = split_cover_body(tagged, &TableBoundaryPolicy);
    assert_eq!(split.cover.len(), 2);
    assert_eq!(split.body.len(), 2);
    assert_eq!(split.body[0].element_index(), 1);
}

#[test]
fn test_split_cover_body_withNoTables_shouldDegradeToCoverOnly() {
    let nodes = vec![
        common::paragraph(0, 0, "标题"),
        common::paragraph(1, 1, "正文"),
    ];
    let tagged = classify(nodes, &ClassifierConfig::default());
    let split = split_cover_body(tagged, &TableBoundaryPolicy);
    assert_eq!(split.cover.len(), 2);
    assert!(split.body.is_empty());
}

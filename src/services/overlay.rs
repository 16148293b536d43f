//! 页面标注解析 - 业务能力层
//!
//! 只负责"某一页该画什么"：片段颜色和提取高亮。
//! 所有函数都是纯函数，每渲染一页就会调用一次。

use std::collections::BTreeSet;

use crate::models::{CreditorRecord, DocumentResult, Segment};

/// 片段调色板（以 #7B6CFF 为主色的紫色系）
pub const SEGMENT_PALETTE: [&str; 15] = [
    "rgba(123, 108, 255, 0.7)",
    "rgba(157, 143, 255, 0.7)",
    "rgba(90, 77, 255, 0.7)",
    "rgba(168, 85, 247, 0.7)",
    "rgba(139, 92, 246, 0.7)",
    "rgba(99, 102, 241, 0.7)",
    "rgba(79, 70, 229, 0.7)",
    "rgba(196, 181, 253, 0.7)",
    "rgba(124, 58, 237, 0.7)",
    "rgba(109, 40, 217, 0.7)",
    "rgba(147, 51, 234, 0.7)",
    "rgba(167, 139, 250, 0.7)",
    "rgba(88, 28, 135, 0.7)",
    "rgba(192, 132, 252, 0.7)",
    "rgba(74, 61, 255, 0.7)",
];

/// 提取高亮颜色
pub const HIGHLIGHT_COLOR: &str = "rgba(250, 204, 21, 0.2)";

/// 第 `index` 个片段的颜色：`palette[index % len]`，调色板为空时没有颜色
pub fn segment_color<C>(palette: &[C], index: usize) -> Option<&C> {
    if palette.is_empty() {
        None
    } else {
        palette.get(index % palette.len())
    }
}

/// 第一个包含 `page` 的片段的颜色
pub fn color_for_page<'p, C>(segments: &[Segment], palette: &'p [C], page: u32) -> Option<&'p C> {
    segments
        .iter()
        .position(|segment| segment.contains(page))
        .and_then(|index| segment_color(palette, index))
}

pub fn is_highlighted(highlight_pages: &BTreeSet<u32>, page: u32) -> bool {
    highlight_pages.contains(&page)
}

/// 所有记录来源页的去重并集
pub fn highlight_pages(records: &[CreditorRecord]) -> BTreeSet<u32> {
    records
        .iter()
        .flat_map(|record| record.source_pages().iter().copied())
        .collect()
}

/// 标注模式，对应不同的步骤视图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    /// 不画标注（OCR、比对视图）
    Plain,
    /// 片段着色
    Segments,
    /// 提取来源页高亮
    Highlights,
}

/// 单页标注
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAnnotation {
    /// 1 开始
    pub page: u32,
    pub segment_color: Option<String>,
    pub highlighted: bool,
}

/// 片段图例
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentLegendEntry {
    /// 1 开始
    pub number: usize,
    pub color: Option<String>,
    pub pages: Vec<u32>,
}

impl SegmentLegendEntry {
    /// 例如 `"Segment 2: Pages 3, 5"`
    pub fn label(&self) -> String {
        format!(
            "Segment {}: Pages {}",
            self.number,
            crate::models::record::join_pages(&self.pages)
        )
    }
}

/// 片段标注解析器
///
/// 持有调色板；其余状态都由调用方传入。
#[derive(Debug, Clone)]
pub struct SegmentOverlayResolver {
    palette: Vec<String>,
}

impl Default for SegmentOverlayResolver {
    fn default() -> Self {
        Self::with_palette(SEGMENT_PALETTE.iter().map(|c| c.to_string()).collect())
    }
}

impl SegmentOverlayResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义调色板
    pub fn with_palette(palette: Vec<String>) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn color_for_page(&self, segments: &[Segment], page: u32) -> Option<&str> {
        color_for_page(segments, &self.palette, page).map(String::as_str)
    }

    /// 为文档的每一页（1..=页数）生成标注
    pub fn annotate_pages(&self, document: &DocumentResult, mode: OverlayMode) -> Vec<PageAnnotation> {
        let highlights = match mode {
            OverlayMode::Highlights => highlight_pages(&document.extracted_creditors),
            _ => BTreeSet::new(),
        };

        (1..=document.page_count())
            .map(|page| PageAnnotation {
                page,
                segment_color: match mode {
                    OverlayMode::Segments => self
                        .color_for_page(&document.segments, page)
                        .map(str::to_string),
                    _ => None,
                },
                highlighted: is_highlighted(&highlights, page),
            })
            .collect()
    }

    pub fn segment_legend(&self, document: &DocumentResult) -> Vec<SegmentLegendEntry> {
        document
            .segments
            .iter()
            .enumerate()
            .map(|(index, segment)| SegmentLegendEntry {
                number: index + 1,
                color: segment_color(&self.palette, index).cloned(),
                pages: segment.pages.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segments(pages: &[&[u32]]) -> Vec<Segment> {
        pages
            .iter()
            .map(|p| Segment {
                pages: p.to_vec(),
                ..Segment::default()
            })
            .collect()
    }

    #[test]
    fn first_segment_containing_page_wins() {
        let segs = segments(&[&[1, 2], &[2, 3], &[5]]);
        let palette = ["red", "green", "blue"];
        assert_eq!(color_for_page(&segs, &palette, 1), Some(&"red"));
        assert_eq!(color_for_page(&segs, &palette, 2), Some(&"red"));
        assert_eq!(color_for_page(&segs, &palette, 3), Some(&"green"));
        assert_eq!(color_for_page(&segs, &palette, 5), Some(&"blue"));
        assert_eq!(color_for_page(&segs, &palette, 4), None);
    }

    #[test]
    fn colors_wrap_around_palette() {
        let segs = segments(&[&[1], &[2], &[3], &[4]]);
        let palette = ["a", "b"];
        let colors: Vec<_> = (1..=4)
            .map(|p| color_for_page(&segs, &palette, p).copied())
            .collect();
        assert_eq!(colors, vec![Some("a"), Some("b"), Some("a"), Some("b")]);
    }

    #[test]
    fn total_for_empty_inputs() {
        let empty_palette: [&str; 0] = [];
        assert_eq!(color_for_page(&[], &SEGMENT_PALETTE, 1), None);
        assert_eq!(color_for_page(&segments(&[&[1]]), &empty_palette, 1), None);
        assert_eq!(color_for_page(&segments(&[&[1]]), &SEGMENT_PALETTE, 0), None);
        assert!(!is_highlighted(&BTreeSet::new(), 1));
        assert!(highlight_pages(&[]).is_empty());
    }

    #[test]
    fn highlight_union_ignores_duplicates() {
        let records: Vec<CreditorRecord> = serde_json::from_value(json!([
            { "source_pages": [1, 4] },
            { "source_pages": [4, 4, 6] },
            {}
        ]))
        .unwrap();
        let pages = highlight_pages(&records);
        assert_eq!(pages.len(), 3);
        for page in 1..=7 {
            assert_eq!(is_highlighted(&pages, page), [1, 4, 6].contains(&page));
        }
    }

    #[test]
    fn annotate_pages_per_mode() {
        let doc: DocumentResult = serde_json::from_value(json!({
            "filename": "a.pdf",
            "ocr": { "pages": 3 },
            "segments": [{ "pages": [1] }, { "pages": [2, 3] }],
            "extracted_creditors": [{ "source_pages": [3] }]
        }))
        .unwrap();
        let resolver = SegmentOverlayResolver::with_palette(vec!["x".into(), "y".into()]);

        let seg = resolver.annotate_pages(&doc, OverlayMode::Segments);
        assert_eq!(
            seg.iter().map(|a| a.segment_color.as_deref()).collect::<Vec<_>>(),
            vec![Some("x"), Some("y"), Some("y")]
        );
        assert!(seg.iter().all(|a| !a.highlighted));

        let hl = resolver.annotate_pages(&doc, OverlayMode::Highlights);
        assert_eq!(
            hl.iter().map(|a| a.highlighted).collect::<Vec<_>>(),
            vec![false, false, true]
        );
        assert!(hl.iter().all(|a| a.segment_color.is_none()));

        let plain = resolver.annotate_pages(&doc, OverlayMode::Plain);
        assert_eq!(plain.len(), 3);
        assert!(plain.iter().all(|a| a.segment_color.is_none() && !a.highlighted));
    }

    #[test]
    fn legend_numbers_segments_from_one() {
        let doc = DocumentResult {
            filename: "a.pdf".into(),
            segments: segments(&[&[1, 2], &[4]]),
            ..DocumentResult::default()
        };
        let legend = SegmentOverlayResolver::default().segment_legend(&doc);
        assert_eq!(legend[0].label(), "Segment 1: Pages 1, 2");
        assert_eq!(legend[1].label(), "Segment 2: Pages 4");
        assert_eq!(legend[1].color.as_deref(), Some(SEGMENT_PALETTE[1]));
    }
}

use serde::{Deserialize, Serialize};

use crate::models::record::{join_pages, CreditorRecord};
use crate::utils::truncate_text;

/// 片段预览显示的最大字符数
pub const SEGMENT_PREVIEW_CHARS: usize = 50;

/// OCR 摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrSummary {
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub tables: u32,
    #[serde(default)]
    pub page_previews: Vec<String>,
}

/// 片段：被判定为同一份子文档的一组页（不一定相邻）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// 页码，1 开始，按出现顺序
    pub pages: Vec<u32>,
    #[serde(default)]
    pub text_length: usize,
    #[serde(default)]
    pub text_preview: String,
}

impl Segment {
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    pub fn pages_label(&self) -> String {
        join_pages(&self.pages)
    }

    /// 预览文本，截断到 50 个字符
    pub fn preview(&self) -> String {
        truncate_text(&self.text_preview, SEGMENT_PREVIEW_CHARS)
    }
}

/// 单个文档的流水线输出
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub filename: String,
    #[serde(default)]
    pub ocr: Option<OcrSummary>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub extracted_creditors: Vec<CreditorRecord>,
}

impl DocumentResult {
    /// OCR 页数，没有 OCR 结果时为 0
    pub fn ocr_page_count(&self) -> u32 {
        self.ocr.as_ref().map_or(0, |ocr| ocr.pages)
    }

    /// 可渲染的页数
    ///
    /// 优先用 OCR 页数；没有 OCR 时取片段和来源页里出现的最大页码。
    pub fn page_count(&self) -> u32 {
        let referenced = self
            .segments
            .iter()
            .flat_map(|s| s.pages.iter().copied())
            .chain(
                self.extracted_creditors
                    .iter()
                    .flat_map(|c| c.source_pages().iter().copied()),
            )
            .max()
            .unwrap_or(0);
        match self.ocr_page_count() {
            0 => referenced,
            pages => pages,
        }
    }
}

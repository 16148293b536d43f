use serde::{Deserialize, Serialize};

use crate::models::comparison::ComparisonSummary;
use crate::models::document::DocumentResult;
use crate::models::record::CreditorRecord;

/// 提取阶段的输出
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub folder: String,
    #[serde(default)]
    pub documents: Vec<DocumentResult>,
    #[serde(default)]
    pub all_raw_creditors: Vec<CreditorRecord>,
    /// 去重后的提取结果
    #[serde(default)]
    pub final_creditors: Vec<CreditorRecord>,
}

/// 一次完整运行的结果（`POST /compare/{folder}` 的响应）
///
/// 生成后不可修改，新的运行整体替换它。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub extraction: ExtractionResult,
    #[serde(default)]
    pub ground_truth: Vec<CreditorRecord>,
    #[serde(default)]
    pub comparison: ComparisonSummary,
}

impl RunResult {
    pub fn folder(&self) -> &str {
        &self.extraction.folder
    }

    pub fn documents(&self) -> &[DocumentResult] {
        &self.extraction.documents
    }

    /// 按文件名查找文档
    pub fn find_document(&self, filename: &str) -> Option<&DocumentResult> {
        self.extraction
            .documents
            .iter()
            .find(|doc| doc.filename == filename)
    }
}

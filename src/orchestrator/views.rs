//! 视图模型 - 编排层
//!
//! 从 `Dashboard` 只读地构建四个步骤视图和结果面板需要的数据。
//! 这里不改任何状态；同一份状态重复构建得到同样的视图。

use crate::models::{
    ComparisonRow, CreditorRecord, DocumentResult, MatchStatus, RunResult, GROUND_TRUTH_FILENAME,
};
use crate::orchestrator::dashboard::Dashboard;
use crate::services::{
    OverlayMode, PageAnnotation, PipelineStep, SegmentLegendEntry, StepIndicator,
};

/// 文档下拉框的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOption {
    pub filename: String,
    /// 例如 `"a.pdf (3 pages)"`
    pub label: String,
    pub selected: bool,
}

/// PDF 面板：地址 + 每页标注
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfPanel {
    pub pdf_url: String,
    pub annotations: Vec<PageAnnotation>,
    pub legend: Vec<SegmentLegendEntry>,
}

/// 比对表中提取一侧的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonLine {
    pub gt_idx: usize,
    pub status: MatchStatus,
    pub ground_truth_name: String,
    pub ground_truth_amount: String,
    /// 没有对应提取记录时为 `None`（显示为 `—`）
    pub extracted_name: Option<String>,
    pub extracted_amount: String,
}

impl From<&ComparisonRow> for ComparisonLine {
    fn from(row: &ComparisonRow) -> Self {
        Self {
            gt_idx: row.gt_idx,
            status: row.status,
            ground_truth_name: row.ground_truth_name().to_string(),
            ground_truth_amount: row.ground_truth_amount_label(),
            extracted_name: row.ext_name.clone().filter(|name| !name.trim().is_empty()),
            extracted_amount: row.extracted_amount_label(),
        }
    }
}

/// 名称 + 金额
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLine {
    pub name: String,
    pub amount: String,
}

impl From<&CreditorRecord> for RecordLine {
    fn from(record: &CreditorRecord) -> Self {
        Self {
            name: record.display_name().to_string(),
            amount: record.amount_label(),
        }
    }
}

/// 第 4 步的比对视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonView {
    pub ground_truth: Vec<RecordLine>,
    /// 去重后的提取记录条数
    pub extracted_count: usize,
    pub rows: Vec<ComparisonLine>,
    pub extra_rows: Vec<RecordLine>,
    pub ground_truth_pdf_url: String,
}

/// 当前步骤的视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub step: PipelineStep,
    pub documents: Vec<DocumentOption>,
    /// 选中文档的 PDF 面板；没有选中文档时为 `None`
    pub panel: Option<PdfPanel>,
    /// 只在第 4 步出现
    pub comparison: Option<ComparisonView>,
}

/// 汇总卡片，数值原样来自后端
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCards {
    pub match_rate: f64,
    pub exact: usize,
    pub partial: usize,
    pub missing: usize,
}

impl SummaryCards {
    pub fn match_rate_label(&self) -> String {
        format!("{}%", self.match_rate)
    }
}

/// "Document Details" 中的一个片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentLine {
    pub number: usize,
    pub pages: String,
    pub preview: String,
}

/// "Document Details" 中的一条提取记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditorLine {
    pub name: String,
    pub reference: String,
    pub pages: String,
    pub amount: String,
}

/// "Document Details" 中的一个文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDetail {
    pub filename: String,
    /// 例如 `"3 pages, 2 segments, 1 creditors"`
    pub summary: String,
    pub expanded: bool,
    pub segments: Vec<SegmentLine>,
    pub creditors: Vec<CreditorLine>,
}

/// 文件夹侧栏的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub name: String,
    pub summary: String,
    pub selected: bool,
}

fn option_label(step: PipelineStep, document: &DocumentResult) -> String {
    match step {
        PipelineStep::Ocr => format!("{} ({} pages)", document.filename, document.ocr_page_count()),
        PipelineStep::Segments => {
            format!("{} ({} segments)", document.filename, document.segments.len())
        }
        PipelineStep::Extract => format!(
            "{} ({} creditors)",
            document.filename,
            document.extracted_creditors.len()
        ),
        PipelineStep::Compare => document.filename.clone(),
    }
}

fn overlay_mode(step: PipelineStep) -> OverlayMode {
    match step {
        PipelineStep::Segments => OverlayMode::Segments,
        PipelineStep::Extract => OverlayMode::Highlights,
        PipelineStep::Ocr | PipelineStep::Compare => OverlayMode::Plain,
    }
}

impl Dashboard {
    /// 结果所属的文件夹：优先用当前选中的文件夹
    fn view_folder<'a>(&'a self, result: &'a RunResult) -> &'a str {
        self.selection()
            .selected_folder()
            .unwrap_or_else(|| result.folder())
    }

    pub fn step_indicators(&self) -> Vec<StepIndicator> {
        self.runs().steps().step_indicators()
    }

    pub fn folder_entries(&self) -> Vec<FolderEntry> {
        let selected = self.selection().selected_folder();
        self.folders()
            .iter()
            .map(|folder| FolderEntry {
                name: folder.name.clone(),
                summary: folder.summary_label(),
                selected: selected == Some(folder.name.as_str()),
            })
            .collect()
    }

    /// 当前查看步骤的视图；没有运行结果时为 `None`
    pub fn current_view(&self) -> Option<StepView> {
        self.step_view(self.runs().steps().viewed_step())
    }

    /// 指定步骤的视图；没有运行结果或步骤未完成时为 `None`
    pub fn step_view(&self, step: PipelineStep) -> Option<StepView> {
        let result = self.result()?;
        if !self.runs().steps().is_completed(step) {
            return None;
        }
        Some(self.build_step_view(step, result))
    }

    fn build_step_view(&self, step: PipelineStep, result: &RunResult) -> StepView {
        let selected = self.selection().selected_document();
        let documents = result
            .documents()
            .iter()
            .map(|doc| DocumentOption {
                filename: doc.filename.clone(),
                label: option_label(step, doc),
                selected: selected == Some(doc.filename.as_str()),
            })
            .collect();

        let folder = self.view_folder(result);
        let panel = selected.and_then(|filename| {
            let document = result.find_document(filename);
            let mode = overlay_mode(step);
            match (mode, document) {
                // 片段和高亮视图必须找到文档，否则不显示
                (OverlayMode::Segments | OverlayMode::Highlights, None) => None,
                _ => Some(PdfPanel {
                    pdf_url: self.api().pdf_url(folder, filename),
                    annotations: document
                        .map(|doc| self.overlay().annotate_pages(doc, mode))
                        .unwrap_or_default(),
                    legend: match (mode, document) {
                        (OverlayMode::Segments, Some(doc)) => self.overlay().segment_legend(doc),
                        _ => Vec::new(),
                    },
                }),
            }
        });

        let comparison = (step == PipelineStep::Compare).then(|| ComparisonView {
            ground_truth: result.ground_truth.iter().map(RecordLine::from).collect(),
            extracted_count: result.extraction.final_creditors.len(),
            rows: result.comparison.rows.iter().map(ComparisonLine::from).collect(),
            extra_rows: result
                .comparison
                .extra_rows
                .iter()
                .map(RecordLine::from)
                .collect(),
            ground_truth_pdf_url: self.api().pdf_url(folder, GROUND_TRUTH_FILENAME),
        });

        StepView {
            step,
            documents,
            panel,
            comparison,
        }
    }

    pub fn summary_cards(&self) -> Option<SummaryCards> {
        let comparison = &self.result()?.comparison;
        Some(SummaryCards {
            match_rate: comparison.match_rate,
            exact: comparison.exact_match,
            partial: comparison.partial_matches(),
            missing: comparison.missing,
        })
    }

    pub fn document_details(&self) -> Vec<DocumentDetail> {
        let Some(result) = self.result() else {
            return Vec::new();
        };
        result
            .documents()
            .iter()
            .map(|doc| DocumentDetail {
                filename: doc.filename.clone(),
                summary: format!(
                    "{} pages, {} segments, {} creditors",
                    doc.ocr_page_count(),
                    doc.segments.len(),
                    doc.extracted_creditors.len()
                ),
                expanded: self.selection().is_expanded(&doc.filename),
                segments: doc
                    .segments
                    .iter()
                    .enumerate()
                    .map(|(index, segment)| SegmentLine {
                        number: index + 1,
                        pages: segment.pages_label(),
                        preview: segment.preview(),
                    })
                    .collect(),
                creditors: doc
                    .extracted_creditors
                    .iter()
                    .map(|record| CreditorLine {
                        name: record.display_name().to_string(),
                        reference: record.reference().to_string(),
                        pages: record.pages_label(),
                        amount: record.amount_label(),
                    })
                    .collect(),
            })
            .collect()
    }
}

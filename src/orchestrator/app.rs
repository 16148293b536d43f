//! 命令行驱动 - 编排层
//!
//! ## 职责
//!
//! 没有界面时用同一个 `Dashboard` 走完整个流程：
//!
//! 1. **初始化**：报告文件、后端客户端、文件夹列表
//! 2. **上传**：`UPLOAD_DIR` 下的所有 PDF（可选），成功后自动选中新文件夹
//! 3. **运行**：对 `TARGET_FOLDER`（或刚上传的文件夹）运行流水线
//! 4. **输出**：步骤栏、汇总卡片、各步骤视图、文档详情，最后追加运行报告
//!
//! 后端报错不会让程序异常退出，只记录错误；配置错误和本地文件错误才会。

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::clients::PipelineClient;
use crate::config::Config;
use crate::models::load_pdf_batch;
use crate::orchestrator::dashboard::Dashboard;
use crate::orchestrator::views::{StepView, SummaryCards};
use crate::services::PipelineStep;
use crate::utils::logging::{append_run_report, init_log_file, log_startup, print_final_stats};
use crate::workflow::RunCompletion;

/// 应用主结构
pub struct App {
    config: Config,
    dashboard: Dashboard,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;

        let client = PipelineClient::new(&config)?;
        log_startup(&config, client.base_url());

        let mut dashboard = Dashboard::new(Arc::new(client));
        if let Err(failure) = dashboard.refresh_folders().await {
            warn!("⚠️ 无法获取文件夹列表: {}", failure);
        }

        Ok(Self { config, dashboard })
    }

    /// 使用已经构建好的看板（测试时注入假后端）
    pub fn with_dashboard(config: Config, dashboard: Dashboard) -> Self {
        Self { config, dashboard }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// 运行应用主逻辑
    pub async fn run(mut self) -> Result<()> {
        log_folders(&self.dashboard);

        if let Some(upload_dir) = self.config.upload_dir.clone() {
            self.upload_from(&upload_dir).await?;
        }

        if let Some(folder) = self.config.target_folder.clone() {
            self.dashboard.select_folder(folder);
        }

        let Some(folder) = self.dashboard.selection().selected_folder().map(str::to_string) else {
            info!("💡 未指定文件夹（TARGET_FOLDER），不运行流水线");
            return Ok(());
        };

        match self.dashboard.run_selected().await {
            Some(RunCompletion::Succeeded(result)) => {
                self.log_result_views();
                append_run_report(&self.config.output_log_file, &result)?;
                print_final_stats(&result, &self.config.output_log_file);
            }
            Some(RunCompletion::Failed(failure)) => {
                error!("❌ 文件夹 {} 运行失败: {}", folder, failure);
            }
            Some(RunCompletion::Superseded) | None => {}
        }

        Ok(())
    }

    /// 上传文件夹中的所有 PDF
    async fn upload_from(&mut self, upload_dir: &str) -> Result<()> {
        info!("\n📁 正在扫描待上传的 PDF: {}", upload_dir);
        let files = load_pdf_batch(upload_dir).await?;

        if !self.dashboard.choose_files(files) {
            warn!("⚠️ 没有找到待上传的PDF文件，跳过上传");
            return Ok(());
        }

        match self.dashboard.upload_files().await {
            Some(Ok(receipt)) => info!("📂 已选中文件夹: {}", receipt.folder_name),
            Some(Err(failure)) => error!("❌ {}", failure),
            None => {}
        }
        Ok(())
    }

    fn log_result_views(&mut self) {
        log_step_bar(&self.dashboard);
        if let Some(cards) = self.dashboard.summary_cards() {
            log_summary_cards(&cards);
        }

        // 每个视图都用第一个文档做示例
        let first_document = self
            .dashboard
            .result()
            .and_then(|result| result.documents().first())
            .map(|doc| doc.filename.clone());
        if let Some(filename) = first_document {
            self.dashboard.select_document(filename);
        }

        for step in PipelineStep::ALL {
            if self.dashboard.select_view(step) {
                if let Some(view) = self.dashboard.current_view() {
                    log_step_view(&view);
                }
            }
        }

        log_document_details(&self.dashboard);
    }
}

// ========== 日志辅助函数 ==========

fn log_folders(dashboard: &Dashboard) {
    let entries = dashboard.folder_entries();
    info!("✓ 找到 {} 个文件夹", entries.len());
    for entry in entries {
        info!("  📂 {} ({})", entry.name, entry.summary);
    }
}

fn log_step_bar(dashboard: &Dashboard) {
    let bar = dashboard
        .step_indicators()
        .iter()
        .map(|indicator| {
            let mark = if indicator.completed { "✓" } else { "·" };
            format!("{} {}", mark, indicator.step.label())
        })
        .collect::<Vec<_>>()
        .join(" → ");
    info!("\n{}", bar);
}

fn log_summary_cards(cards: &SummaryCards) {
    info!("{}", "─".repeat(60));
    info!("🎯 Match Rate: {}", cards.match_rate_label());
    info!("✅ Exact Matches: {}", cards.exact);
    info!("🟡 Partial Matches: {}", cards.partial);
    info!("❌ Missing: {}", cards.missing);
    info!("{}", "─".repeat(60));
}

fn log_step_view(view: &StepView) {
    info!("\n{}", "=".repeat(60));
    info!("📑 {}", view.step);
    info!("{}", "=".repeat(60));
    for option in &view.documents {
        info!("  {} {}", if option.selected { "▶" } else { " " }, option.label);
    }

    if let Some(panel) = &view.panel {
        info!("  📄 {}", panel.pdf_url);
        for entry in &panel.legend {
            info!("  🎨 {}", entry.label());
        }
        let highlighted = panel
            .annotations
            .iter()
            .filter(|a| a.highlighted)
            .map(|a| a.page.to_string())
            .collect::<Vec<_>>();
        if !highlighted.is_empty() {
            info!("  🖍️ 高亮页: {}", highlighted.join(", "));
        }
    }

    if let Some(comparison) = &view.comparison {
        info!(
            "  Ground Truth ({} rows) / Extracted ({} rows)",
            comparison.ground_truth.len(),
            comparison.extracted_count
        );
        for row in &comparison.rows {
            info!(
                "  #{:<3} {:<12} {} ({}) -> {} ({})",
                row.gt_idx,
                row.status.as_str(),
                row.ground_truth_name,
                row.ground_truth_amount,
                row.extracted_name.as_deref().unwrap_or("—"),
                row.extracted_amount
            );
        }
        if !comparison.extra_rows.is_empty() {
            info!("  Extra Rows ({})", comparison.extra_rows.len());
            for extra in &comparison.extra_rows {
                info!("    {} {}", extra.name, extra.amount);
            }
        }
        info!("  📄 Ground Truth PDF: {}", comparison.ground_truth_pdf_url);
    }
}

fn log_document_details(dashboard: &Dashboard) {
    info!("\n📚 Document Details");
    for detail in dashboard.document_details() {
        info!("  {} - {}", detail.filename, detail.summary);
        for segment in &detail.segments {
            info!(
                "    Segment {}: Pages {} | {}",
                segment.number, segment.pages, segment.preview
            );
        }
        for creditor in &detail.creditors {
            info!(
                "    {} | {} | Pages: {} | {}",
                creditor.name, creditor.reference, creditor.pages, creditor.amount
            );
        }
    }
}

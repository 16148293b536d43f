//! 仪表盘 - 编排层
//!
//! ## 职责
//!
//! 所有界面状态的唯一持有者：文件夹列表、选择状态、上传状态、
//! 运行状态和消息栏。界面事件都通过这里的方法进入。
//!
//! ## 消息栏
//!
//! 只有一个消息位置，新的成功消息或错误消息直接覆盖旧消息；
//! 重新选择文件、开始上传、开始运行都会先清空它。
//!
//! ## 异步操作
//!
//! 上传和运行都拆成 begin / finish 两步。事件循环可以在请求进行中
//! 继续处理别的事件；`upload_files` / `run_selected` 是顺序执行的便捷版本。

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::PipelineApi;
use crate::error::{AppResult, Failure};
use crate::models::{Folder, RunResult, UploadFile, UploadReceipt};
use crate::services::{PipelineStep, SegmentOverlayResolver, SelectionStore};
use crate::workflow::{
    Notice, RunCompletion, RunCoordinator, RunTicket, UploadBatch, UploadCoordinator,
};

pub struct Dashboard {
    api: Arc<dyn PipelineApi>,
    folders: Vec<Folder>,
    selection: SelectionStore,
    uploads: UploadCoordinator,
    runs: RunCoordinator,
    overlay: SegmentOverlayResolver,
    notice: Option<Notice>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn PipelineApi>) -> Self {
        Self::with_overlay(api, SegmentOverlayResolver::default())
    }

    /// 使用自定义调色板
    pub fn with_overlay(api: Arc<dyn PipelineApi>, overlay: SegmentOverlayResolver) -> Self {
        Self {
            api,
            folders: Vec::new(),
            selection: SelectionStore::new(),
            uploads: UploadCoordinator::new(),
            runs: RunCoordinator::new(),
            overlay,
            notice: None,
        }
    }

    // ========== 只读访问 ==========

    pub fn api(&self) -> &dyn PipelineApi {
        self.api.as_ref()
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn uploads(&self) -> &UploadCoordinator {
        &self.uploads
    }

    pub fn runs(&self) -> &RunCoordinator {
        &self.runs
    }

    pub fn overlay(&self) -> &SegmentOverlayResolver {
        &self.overlay
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn result(&self) -> Option<&RunResult> {
        self.runs.result()
    }

    /// 选中了文件夹且没有运行在进行中
    pub fn can_run(&self) -> bool {
        self.selection.selected_folder().is_some() && !self.runs.is_running()
    }

    // ========== 文件夹 ==========

    /// 重新获取文件夹列表
    ///
    /// 失败时写入消息栏，原列表保持不变；成功时只清除错误消息。
    pub async fn refresh_folders(&mut self) -> Result<&[Folder], Failure> {
        let outcome = self.api.list_folders().await;
        self.apply_folders(outcome)?;
        Ok(&self.folders)
    }

    fn apply_folders(&mut self, outcome: AppResult<Vec<Folder>>) -> Result<(), Failure> {
        match outcome {
            Ok(folders) => {
                debug!("文件夹列表已刷新: {} 个", folders.len());
                self.folders = folders;
                if self.notice.as_ref().is_some_and(Notice::is_error) {
                    self.notice = None;
                }
                Ok(())
            }
            Err(err) => {
                let failure = Failure::from(&err);
                warn!("⚠️ 获取文件夹列表失败: {}", failure);
                self.notice = Some(Notice::Error(failure.clone()));
                Err(failure)
            }
        }
    }

    /// 选择文件夹；换了文件夹时丢弃运行结果和文档选择
    pub fn select_folder(&mut self, name: impl Into<String>) -> bool {
        let changed = self.selection.select_folder(name);
        if changed {
            self.runs.reset();
        }
        changed
    }

    // ========== 上传 ==========

    pub fn choose_files(&mut self, files: Vec<UploadFile>) -> bool {
        let accepted = self.uploads.choose_files(files);
        if accepted {
            self.notice = None;
        }
        accepted
    }

    pub fn clear_files(&mut self) -> bool {
        let cleared = self.uploads.clear();
        if cleared {
            self.notice = None;
        }
        cleared
    }

    pub fn begin_upload(&mut self) -> Option<UploadBatch> {
        let batch = self.uploads.begin_upload()?;
        self.notice = None;
        Some(batch)
    }

    /// 结束上传
    ///
    /// 成功后刷新文件夹列表并自动选中新文件夹。
    /// 刷新失败时消息栏显示刷新错误，但回执照常返回。
    pub async fn finish_upload(
        &mut self,
        batch: &UploadBatch,
        outcome: AppResult<UploadReceipt>,
    ) -> Result<UploadReceipt, Failure> {
        let finished = self.uploads.finish_upload(batch, outcome);
        self.notice = self.uploads.message().cloned();

        let receipt = finished?;
        let listing = self.api.list_folders().await;
        // 列表刷新失败不影响上传本身
        let _ = self.apply_folders(listing);
        self.select_folder(receipt.folder_name.clone());
        Ok(receipt)
    }

    /// 上传已选文件；没有可上传的文件时返回 `None`
    pub async fn upload_files(&mut self) -> Option<Result<UploadReceipt, Failure>> {
        let batch = self.begin_upload()?;
        let outcome = self.api.upload(&batch.files).await;
        Some(self.finish_upload(&batch, outcome).await)
    }

    // ========== 运行 ==========

    /// 对选中的文件夹开始运行；没有选中文件夹时返回 `None`
    pub fn begin_run(&mut self) -> Option<RunTicket> {
        let folder = self.selection.selected_folder()?.to_string();
        self.notice = None;
        self.selection.clear_document();
        Some(self.runs.start(folder))
    }

    pub fn finish_run(&mut self, ticket: &RunTicket, outcome: AppResult<RunResult>) -> RunCompletion {
        let completion = self.runs.complete(ticket, outcome);
        match &completion {
            RunCompletion::Failed(failure) => {
                self.notice = Some(Notice::Error(failure.clone()));
            }
            RunCompletion::Succeeded(result) => {
                info!(
                    "📊 {}: {} 个文档, {} 条提取记录",
                    result.folder(),
                    result.documents().len(),
                    result.extraction.final_creditors.len()
                );
            }
            RunCompletion::Superseded => {}
        }
        completion
    }

    /// 运行选中的文件夹（begin + 请求 + finish）
    pub async fn run_selected(&mut self) -> Option<RunCompletion> {
        let ticket = self.begin_run()?;
        let outcome = self.api.compare(&ticket.folder).await;
        Some(self.finish_run(&ticket, outcome))
    }

    // ========== 视图选择 ==========

    /// 切换步骤视图；没有运行结果或步骤未完成时不做任何事
    pub fn select_view(&mut self, step: PipelineStep) -> bool {
        if self.runs.result().is_none() {
            return false;
        }
        self.runs.select_view(step)
    }

    pub fn select_view_number(&mut self, n: u8) -> bool {
        PipelineStep::from_number(n).is_some_and(|step| self.select_view(step))
    }

    pub fn select_document(&mut self, filename: impl Into<String>) {
        self.selection.select_document(filename);
    }

    /// 切换"Document Details"中某个文档的展开状态
    pub fn toggle_document_details(&mut self, filename: &str) -> bool {
        self.selection.toggle_expanded(filename)
    }
}

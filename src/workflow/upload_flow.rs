//! 上传流程 - 流程层
//!
//! 状态机：Idle → FilesChosen → Uploading → Succeeded | Failed
//!
//! 失败后保留已选文件（可以直接重试），`clear()` 回到 Idle。

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::PipelineApi;
use crate::error::{AppResult, Failure};
use crate::models::upload::is_ground_truth_name;
use crate::models::{UploadFile, UploadReceipt};
use crate::workflow::notice::Notice;

/// 上传状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    FilesChosen,
    Uploading,
    Succeeded,
    /// 上传失败，已选文件仍然保留
    Failed,
}

/// 正在上传的一批文件
#[derive(Debug, Clone)]
pub struct UploadBatch {
    pub files: Arc<[UploadFile]>,
    pub includes_ground_truth: bool,
}

/// 上传协调器
#[derive(Debug)]
pub struct UploadCoordinator {
    state: UploadState,
    files: Arc<[UploadFile]>,
    message: Option<Notice>,
}

impl Default for UploadCoordinator {
    fn default() -> Self {
        Self {
            state: UploadState::Idle,
            files: Arc::from(Vec::new()),
            message: None,
        }
    }
}

impl UploadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    pub fn message(&self) -> Option<&Notice> {
        self.message.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.state == UploadState::Uploading
    }

    /// 批次中是否有基准清单文件（大小写不敏感）
    pub fn classify_ground_truth(files: &[UploadFile]) -> bool {
        files.iter().any(|file| is_ground_truth_name(&file.name))
    }

    /// 选择文件
    ///
    /// 空批次或正在上传时忽略；否则替换已选文件并清除旧消息。
    pub fn choose_files(&mut self, files: Vec<UploadFile>) -> bool {
        if files.is_empty() || self.is_uploading() {
            return false;
        }
        self.files = Arc::from(files);
        self.message = None;
        self.state = UploadState::FilesChosen;
        true
    }

    /// 丢弃已选文件和消息；正在上传时忽略
    pub fn clear(&mut self) -> bool {
        if self.is_uploading() {
            return false;
        }
        *self = Self::default();
        true
    }

    /// 开始上传，返回要发送的批次
    ///
    /// 没有已选文件或已经在上传时返回 `None`。
    pub fn begin_upload(&mut self) -> Option<UploadBatch> {
        if self.files.is_empty() || self.is_uploading() {
            return None;
        }
        self.state = UploadState::Uploading;
        self.message = None;
        Some(UploadBatch {
            files: Arc::clone(&self.files),
            includes_ground_truth: Self::classify_ground_truth(&self.files),
        })
    }

    /// 结束上传
    ///
    /// 成功时清空已选文件并返回回执，调用方据此选中新文件夹。
    pub fn finish_upload(
        &mut self,
        batch: &UploadBatch,
        outcome: AppResult<UploadReceipt>,
    ) -> Result<UploadReceipt, Failure> {
        match outcome {
            Ok(receipt) => {
                let message = success_message(&receipt, batch.includes_ground_truth);
                info!("✓ {}", message);
                self.files = Arc::from(Vec::new());
                self.message = Some(Notice::Success(message));
                self.state = UploadState::Succeeded;
                Ok(receipt)
            }
            Err(err) => {
                let failure = Failure::from(&err);
                warn!("⚠️ 上传失败: {}", failure);
                self.message = Some(Notice::Error(failure.clone()));
                self.state = UploadState::Failed;
                Err(failure)
            }
        }
    }

    /// 上传已选文件（begin + 请求 + finish）
    pub async fn upload(
        &mut self,
        api: &dyn PipelineApi,
    ) -> Option<Result<UploadReceipt, Failure>> {
        let batch = self.begin_upload()?;
        let outcome = api.upload(&batch.files).await;
        Some(self.finish_upload(&batch, outcome))
    }
}

/// 例如 `Successfully uploaded 2 file(s) to folder "batch_1" (includes ground truth)`
pub fn success_message(receipt: &UploadReceipt, includes_ground_truth: bool) -> String {
    format!(
        "Successfully uploaded {} file(s) to folder \"{}\"{}",
        receipt.count,
        receipt.folder_name,
        if includes_ground_truth {
            " (includes ground truth)"
        } else {
            ""
        }
    )
}

//! 运行流程 - 流程层
//!
//! 状态机：Idle → Running → Succeeded | Failed，任何状态都可以重新 `start`。
//!
//! 每次 `start` 和 `reset` 都会让代数加一。响应回来时交还 `RunTicket`，
//! 代数不是最新的就丢弃，所以先发出的慢请求不会覆盖后发出的运行结果，
//! 也不会把结果写到已经切换走的文件夹下。

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::clients::PipelineApi;
use crate::error::{AppResult, Failure};
use crate::models::RunResult;
use crate::services::{PipelineStep, StepGateController};
use crate::workflow::run_ticket::RunTicket;

/// 运行状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// 交还响应后的结果
#[derive(Debug, Clone, PartialEq)]
pub enum RunCompletion {
    Succeeded(Arc<RunResult>),
    Failed(Failure),
    /// 响应已过期，状态未改变
    Superseded,
}

#[derive(Debug, Default)]
pub struct RunCoordinator {
    generation: u64,
    state: RunState,
    folder: Option<String>,
    result: Option<Arc<RunResult>>,
    failure: Option<Failure>,
    steps: StepGateController,
}

impl RunCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 当前（或最近一次）运行的文件夹
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn result(&self) -> Option<&RunResult> {
        self.result.as_deref()
    }

    pub fn shared_result(&self) -> Option<Arc<RunResult>> {
        self.result.clone()
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn steps(&self) -> &StepGateController {
        &self.steps
    }

    /// 切换查看的步骤，规则见 [`StepGateController::select_view`]
    pub fn select_view(&mut self, step: PipelineStep) -> bool {
        self.steps.select_view(step)
    }

    pub fn is_current(&self, ticket: &RunTicket) -> bool {
        ticket.generation == self.generation
    }

    /// 开始新的运行
    ///
    /// 旧结果和旧错误立即清空，步骤门控回到初始状态。
    pub fn start(&mut self, folder: impl Into<String>) -> RunTicket {
        self.generation += 1;
        let ticket = RunTicket::new(self.generation, folder.into());
        info!("▶️ 开始运行 {}", ticket);

        self.state = RunState::Running;
        self.folder = Some(ticket.folder.clone());
        self.result = None;
        self.failure = None;
        self.steps.start_run();
        ticket
    }

    /// 交还响应
    pub fn complete(&mut self, ticket: &RunTicket, outcome: AppResult<RunResult>) -> RunCompletion {
        if !self.is_current(ticket) {
            debug!(
                "丢弃过期响应 {}（当前代数 {}）",
                ticket, self.generation
            );
            return RunCompletion::Superseded;
        }

        match outcome {
            Ok(result) => {
                let result = Arc::new(result);
                info!(
                    "✅ 运行完成 {}: {} 个文档, 匹配率 {}%",
                    ticket,
                    result.documents().len(),
                    result.comparison.match_rate
                );
                self.state = RunState::Succeeded;
                self.result = Some(Arc::clone(&result));
                self.steps.on_run_succeeded();
                RunCompletion::Succeeded(result)
            }
            Err(err) => {
                let failure = Failure::from(&err);
                error!("❌ 运行失败 {}: {}", ticket, failure);
                self.state = RunState::Failed;
                self.failure = Some(failure.clone());
                RunCompletion::Failed(failure)
            }
        }
    }

    /// 丢弃当前结果（切换文件夹时调用）
    ///
    /// 代数同样加一，正在进行的请求回来时会被当作过期响应。
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = RunState::Idle;
        self.folder = None;
        self.result = None;
        self.failure = None;
        self.steps.start_run();
    }

    /// 运行整个流水线（start + 请求 + complete）
    pub async fn run(&mut self, api: &dyn PipelineApi, folder: &str) -> RunCompletion {
        let ticket = self.start(folder);
        let outcome = api.compare(&ticket.folder).await;
        self.complete(&ticket, outcome)
    }
}

//! 步骤门控 - 业务能力层
//!
//! 记录运行进行到哪一步、当前查看的是哪一步。
//! 后端一次返回四个阶段的结果，所以完成步骤只会从 0 直接跳到 4。

use tracing::debug;

/// 流水线步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStep {
    Ocr = 1,
    Segments = 2,
    Extract = 3,
    Compare = 4,
}

impl PipelineStep {
    pub const ALL: [PipelineStep; 4] = [
        PipelineStep::Ocr,
        PipelineStep::Segments,
        PipelineStep::Extract,
        PipelineStep::Compare,
    ];

    /// 步骤编号（1–4）
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(PipelineStep::Ocr),
            2 => Some(PipelineStep::Segments),
            3 => Some(PipelineStep::Extract),
            4 => Some(PipelineStep::Compare),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PipelineStep::Ocr => "OCR",
            PipelineStep::Segments => "Segments",
            PipelineStep::Extract => "Extract",
            PipelineStep::Compare => "Compare",
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

/// 步骤栏上的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepIndicator {
    pub step: PipelineStep,
    pub completed: bool,
    pub active: bool,
    pub selectable: bool,
}

/// 步骤门控
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepGateController {
    /// 0 表示尚未完成任何步骤
    completed_step: u8,
    viewed_step: PipelineStep,
}

impl Default for StepGateController {
    fn default() -> Self {
        Self {
            completed_step: 0,
            viewed_step: PipelineStep::Ocr,
        }
    }
}

impl StepGateController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed_step(&self) -> u8 {
        self.completed_step
    }

    pub fn viewed_step(&self) -> PipelineStep {
        self.viewed_step
    }

    /// 开始新的运行（包括重试）：回到初始状态
    pub fn start_run(&mut self) {
        self.completed_step = 0;
        self.viewed_step = PipelineStep::Ocr;
    }

    /// 运行成功：四个步骤同时完成
    pub fn on_run_succeeded(&mut self) {
        self.completed_step = PipelineStep::Compare.number();
    }

    pub fn is_completed(&self, step: PipelineStep) -> bool {
        step.number() <= self.completed_step
    }

    /// 切换查看的步骤；步骤尚未完成时不做任何事
    pub fn select_view(&mut self, step: PipelineStep) -> bool {
        if !self.is_completed(step) {
            debug!("步骤 {} 尚未完成，忽略切换", step);
            return false;
        }
        self.viewed_step = step;
        true
    }

    /// 按编号切换；编号不在 1–4 时不做任何事
    pub fn select_view_number(&mut self, n: u8) -> bool {
        PipelineStep::from_number(n).is_some_and(|step| self.select_view(step))
    }

    pub fn step_indicators(&self) -> Vec<StepIndicator> {
        PipelineStep::ALL
            .iter()
            .map(|&step| {
                let completed = self.is_completed(step);
                StepIndicator {
                    step,
                    completed,
                    active: completed && step == self.viewed_step,
                    selectable: completed,
                }
            })
            .collect()
    }
}

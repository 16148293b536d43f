//! # Creditor Dashboard
//!
//! 债权人提取流水线（OCR → 分段 → 提取 → 比对）的客户端编排层
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 与流水线服务通信，只暴露能力
//! - `PipelineApi` - 列目录 / 上传 / 比对 / PDF 地址
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 纯状态与纯函数
//! - `StepGateController` - 哪些步骤可以查看
//! - `SelectionStore` - 当前文件夹 / 当前文档
//! - `SegmentOverlayResolver` - 每页的片段颜色和提取高亮
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 上传和运行的状态机
//! - `RunTicket` - 运行凭证（代数 + 文件夹），用来丢弃过期响应
//! - `UploadCoordinator` / `RunCoordinator`
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/dashboard` - 全部状态的唯一持有者
//! - `orchestrator/views` - 只读视图模型
//! - `orchestrator/app` - 命令行驱动
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{PipelineApi, PipelineClient};
pub use config::Config;
pub use error::{AppError, AppResult, ErrorKind, Failure};
pub use models::{DocumentResult, RunResult};
pub use orchestrator::{App, Dashboard};
pub use services::{PipelineStep, SegmentOverlayResolver, SelectionStore, StepGateController};
pub use workflow::{RunCoordinator, RunTicket, UploadCoordinator};

//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 持有全部界面状态，把界面事件分派给流程层，并构建只读视图。
//!
//! ## 模块划分
//!
//! ### `dashboard` - 看板状态
//! - 文件夹列表、选择状态、上传 / 运行协调器、消息栏
//! - 上传成功后刷新列表并选中新文件夹
//! - 切换文件夹时丢弃旧的运行结果
//!
//! ### `views` - 视图模型
//! - 步骤栏、汇总卡片、四个步骤视图、文档详情
//! - 每页标注交给 `SegmentOverlayResolver`
//!
//! ### `app` - 命令行驱动
//! - 初始化、可选上传、可选运行、输出报告
//!
//! ## 层次关系
//!
//! ```text
//! app (命令行驱动)
//!     ↓
//! dashboard + views (状态持有者 / 只读视图)
//!     ↓
//! workflow::{UploadCoordinator, RunCoordinator}
//!     ↓
//! services (step_gate / selection / overlay)
//!     ↓
//! clients::PipelineApi (后端)
//! ```

pub mod app;
pub mod dashboard;
pub mod views;

pub use app::App;
pub use dashboard::Dashboard;
pub use views::{
    ComparisonLine, ComparisonView, CreditorLine, DocumentDetail, DocumentOption, FolderEntry,
    PdfPanel, RecordLine, SegmentLine, StepView, SummaryCards,
};

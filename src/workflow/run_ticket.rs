//! 运行凭证
//!
//! 封装"这次响应属于哪个文件夹的第几次运行"这一信息

use std::fmt::Display;

/// 运行凭证
///
/// `start` 时发出，响应回来时交还给协调器；代数不是最新的响应会被丢弃。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTicket {
    /// 运行代数（单调递增）
    pub generation: u64,

    /// 文件夹名称
    pub folder: String,
}

impl RunTicket {
    pub fn new(generation: u64, folder: String) -> Self {
        Self { generation, folder }
    }
}

impl Display for RunTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[运行 #{} 文件夹 {}]", self.generation, self.folder)
    }
}

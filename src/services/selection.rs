//! 选择状态 - 业务能力层
//!
//! 四个步骤视图共用的"当前文件夹 / 当前文档"。
//! 不校验文档是否属于当前运行结果，找不到时由视图层显示为空。

use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    selected_folder: Option<String>,
    selected_document: Option<String>,
    /// "Document Details" 中展开的文档
    expanded_documents: BTreeSet<String>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_folder(&self) -> Option<&str> {
        self.selected_folder.as_deref()
    }

    pub fn selected_document(&self) -> Option<&str> {
        self.selected_document.as_deref()
    }

    /// 选择文件夹
    ///
    /// 返回是否换了文件夹；换了文件夹时清空文档选择。
    /// 调用方必须在同一步里丢弃旧的运行结果。
    pub fn select_folder(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.selected_folder.as_deref() == Some(name.as_str()) {
            return false;
        }
        debug!("选择文件夹: {}", name);
        self.selected_folder = Some(name);
        self.clear_document();
        true
    }

    /// 选择文档；空字符串等同于取消选择
    pub fn select_document(&mut self, filename: impl Into<String>) {
        let filename = filename.into();
        if filename.is_empty() {
            self.selected_document = None;
        } else {
            self.selected_document = Some(filename);
        }
    }

    /// 清空文档选择和展开状态
    pub fn clear_document(&mut self) {
        self.selected_document = None;
        self.expanded_documents.clear();
    }

    /// 切换文档详情的展开状态，返回切换后是否展开
    pub fn toggle_expanded(&mut self, filename: &str) -> bool {
        if self.expanded_documents.remove(filename) {
            false
        } else {
            self.expanded_documents.insert(filename.to_string());
            true
        }
    }

    pub fn is_expanded(&self, filename: &str) -> bool {
        self.expanded_documents.contains(filename)
    }
}

/// 基准清单文件名（大小写不敏感）
pub const GROUND_TRUTH_FILENAME: &str = "creditors_list.pdf";

/// 一个待上传的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// 是否是基准清单文件
    pub fn is_ground_truth(&self) -> bool {
        is_ground_truth_name(&self.name)
    }

    /// 以 MB 显示的大小，保留两位
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.bytes.len() as f64 / 1024.0 / 1024.0)
    }
}

pub fn is_ground_truth_name(name: &str) -> bool {
    name.eq_ignore_ascii_case(GROUND_TRUTH_FILENAME)
}

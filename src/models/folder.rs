use serde::{Deserialize, Serialize};

/// 已上传文件所在的文件夹
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub pdf_count: usize,
    #[serde(default)]
    pub has_ground_truth: bool,
}

impl Folder {
    /// 例如 `"4 PDFs ✓ GT"`
    pub fn summary_label(&self) -> String {
        if self.has_ground_truth {
            format!("{} PDFs ✓ GT", self.pdf_count)
        } else {
            format!("{} PDFs", self.pdf_count)
        }
    }
}

/// `GET /folders` 的响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderListing {
    #[serde(default)]
    pub folders: Vec<Folder>,
}

/// `POST /upload` 的响应
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    pub folder_name: String,
    pub count: usize,
}

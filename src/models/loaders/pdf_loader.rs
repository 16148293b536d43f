use crate::error::AppError;
use crate::models::upload::UploadFile;
use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 读取单个 PDF 文件为待上传文件
pub async fn load_pdf_file(pdf_file_path: &Path) -> Result<UploadFile> {
    let bytes = fs::read(pdf_file_path)
        .await
        .map_err(|source| AppError::File {
            path: pdf_file_path.display().to_string(),
            source,
        })?;

    let name = pdf_file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("无法获取文件名: {}", pdf_file_path.display()))?;

    Ok(UploadFile::new(name, bytes))
}

/// 从文件夹中加载所有 PDF 文件（按文件名排序）
pub async fn load_pdf_batch(folder_path: &str) -> Result<Vec<UploadFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut pdf_paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_pdf = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            pdf_paths.push(path);
        }
    }

    if pdf_paths.is_empty() {
        tracing::warn!("在文件夹 {} 中没有找到 PDF 文件", folder_path);
        return Ok(Vec::new());
    }

    pdf_paths.sort();
    let files = try_join_all(pdf_paths.iter().map(|path| load_pdf_file(path))).await?;

    for file in &files {
        tracing::info!(
            "正在加载: {} ({}){}",
            file.name,
            file.size_label(),
            if file.is_ground_truth() { " ✓ GT" } else { "" }
        );
    }

    Ok(files)
}
